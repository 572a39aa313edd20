//! Analysis manager: routes a file to its strategy and normalizes the result

use crate::config::{AnalysisConfig, Config};
use crate::error::{Result, MetascopeError};
use crate::extract::Extractors;
use crate::input::descriptor::FileDescriptor;
use crate::input::file_detector::{self, AnalysisStrategy, GenericKind};
use crate::normalize::generic::{self, GenericContent};
use crate::normalize::{self, audio, document, image, pdf, NormalizedMetadata};
use log::{debug, info, warn};

pub struct AnalysisManager {
    extractors: Extractors,
    config: AnalysisConfig,
}

impl AnalysisManager {
    pub fn new(config: &Config) -> Self {
        Self {
            extractors: Extractors::new(config.pdf.clone()),
            config: config.analysis.clone(),
        }
    }

    pub fn with_extractors(extractors: Extractors, config: AnalysisConfig) -> Self {
        Self { extractors, config }
    }

    /// Analyze one file. Strategy failures come back as error fragments in
    /// the record, so this never fails.
    pub async fn analyze(&self, descriptor: &FileDescriptor) -> NormalizedMetadata {
        let strategy = file_detector::classify(descriptor);
        info!("Analyzing {} with the {} strategy", descriptor.name, strategy);

        let extension = descriptor.extension();
        if !extension.is_empty() && !file_detector::is_advertised_type(&extension) {
            warn!("Extension .{} is not in the advertised type list", extension);
        }

        let result = match strategy {
            AnalysisStrategy::Image => self.analyze_image(descriptor).await,
            AnalysisStrategy::Pdf => self.analyze_pdf(descriptor).await,
            AnalysisStrategy::Audio => self.analyze_audio(descriptor).await,
            AnalysisStrategy::Document => self.analyze_document(descriptor).await,
            AnalysisStrategy::Generic(kind) => Ok(self.analyze_generic(descriptor, kind).await),
        };

        let metadata = match result {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("{} analysis of {} failed: {}", strategy, descriptor.name, e);
                normalize::failure_fragment(descriptor, strategy, &e)
            }
        };

        let metadata = metadata.finish();
        debug!("Produced {} fields for {}", metadata.field_count(), descriptor.name);
        metadata
    }

    async fn analyze_image(&self, descriptor: &FileDescriptor) -> Result<NormalizedMetadata> {
        let bytes = descriptor.read_all().await?;
        let tags = self.extractors.image.read_tags(&bytes)?;
        if tags.is_empty() {
            return Err(MetascopeError::NoMetadataFound(
                "tag reader returned an empty result".to_string(),
            ));
        }
        Ok(image::normalize_image(descriptor, &tags))
    }

    async fn analyze_pdf(&self, descriptor: &FileDescriptor) -> Result<NormalizedMetadata> {
        let bytes = descriptor.read_all().await?;
        let document = self.extractors.pdf.load(&bytes)?;
        Ok(pdf::normalize_pdf(
            descriptor,
            document.as_ref(),
            self.config.text_preview_chars,
        ))
    }

    async fn analyze_audio(&self, descriptor: &FileDescriptor) -> Result<NormalizedMetadata> {
        let bytes = descriptor.read_all().await?;
        let probe = self.extractors.audio.read(&bytes)?;
        Ok(audio::normalize_audio(descriptor, &probe))
    }

    async fn analyze_document(&self, descriptor: &FileDescriptor) -> Result<NormalizedMetadata> {
        if descriptor.extension() == "docx" {
            let bytes = descriptor.read_all().await?;
            let docx = self.extractors.docx.extract_raw_text(&bytes)?;
            for message in &docx.messages {
                debug!("DOCX reader: {}", message);
            }
            return Ok(document::normalize_docx(descriptor, &docx, &self.config));
        }

        let text = descriptor.read_text().await?;
        Ok(document::normalize_text(descriptor, &text, &self.config))
    }

    async fn analyze_generic(&self, descriptor: &FileDescriptor, kind: GenericKind) -> NormalizedMetadata {
        let content = if generic::within_sniff_limit(descriptor.size, &self.config) {
            let sniffed = match descriptor.read_prefix(self.config.sniff_limit_bytes).await {
                Ok(bytes) => generic::sniff_text(&bytes, self.config.sniff_window_bytes),
                Err(e) => Err(e),
            };
            if let Err(e) = &sniffed {
                debug!("Content sniff rejected {}: {}", descriptor.name, e);
            }
            GenericContent::Sniffed(sniffed)
        } else {
            debug!(
                "Skipping content sniff for {} ({} bytes over the limit)",
                descriptor.name,
                descriptor.size - self.config.sniff_limit_bytes
            );
            GenericContent::TooLarge
        };

        generic::normalize_generic(descriptor, kind, content, &self.config)
    }
}

impl Default for AnalysisManager {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
