//! Report wrapper pairing a normalized record with what produced it

use crate::input::descriptor::FileDescriptor;
use crate::input::file_detector::AnalysisStrategy;
use crate::normalize::NormalizedMetadata;
use chrono::{DateTime, Utc};

/// One analyzed file, ready for a formatter.
#[derive(Debug, Clone)]
pub struct MetadataReport {
    pub file_name: String,
    pub strategy: AnalysisStrategy,
    pub generated_at: DateTime<Utc>,
    pub metadata: NormalizedMetadata,
}

impl MetadataReport {
    pub fn new(descriptor: &FileDescriptor, strategy: AnalysisStrategy, metadata: NormalizedMetadata) -> Self {
        Self {
            file_name: descriptor.name.clone(),
            strategy,
            generated_at: Utc::now(),
            metadata,
        }
    }

    /// Sentinel-valued fields are counted as missing.
    pub fn populated_field_count(&self) -> usize {
        self.metadata
            .categories()
            .flat_map(|(_, fields)| fields.values())
            .filter(|value| value.has_content())
            .count()
    }
}
