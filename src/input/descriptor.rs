//! File descriptors: name, declared type, size and byte access

use crate::error::{Result, MetascopeError};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Where the bytes of a file come from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    /// Declared media type; empty when unknown.
    pub mime_type: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    source: ContentSource,
}

impl FileDescriptor {
    /// Describe an in-memory file. The size is taken from the buffer.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            last_modified: None,
            source: ContentSource::Memory(bytes.into()),
        }
    }

    /// Describe a file on disk. The declared type is sniffed from magic bytes.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path).await.map_err(|e| {
            MetascopeError::InvalidInput(format!("Cannot open {}: {}", path.display(), e))
        })?;
        if !meta.is_file() {
            return Err(MetascopeError::InvalidInput(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mime_type = infer::get_from_path(path)?
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            mime_type,
            size: meta.len(),
            last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
            source: ContentSource::Path(path.to_path_buf()),
        })
    }

    /// Describe a file whose metadata is known up front.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        last_modified: Option<DateTime<Utc>>,
        source: ContentSource,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            last_modified,
            source,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Lower-cased text after the last dot of the name. A name without a
    /// dot is its own extension (`Makefile` gives `makefile`).
    pub fn extension(&self) -> String {
        self.name.rsplit('.').next().unwrap_or_default().to_lowercase()
    }

    pub async fn read_all(&self) -> Result<Vec<u8>> {
        match &self.source {
            ContentSource::Path(path) => Ok(fs::read(path).await?),
            ContentSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }

    /// Read at most `limit` bytes from the start of the file.
    pub async fn read_prefix(&self, limit: u64) -> Result<Vec<u8>> {
        match &self.source {
            ContentSource::Path(path) => {
                let file = fs::File::open(path).await?;
                let mut buf = Vec::new();
                file.take(limit).read_to_end(&mut buf).await?;
                Ok(buf)
            }
            ContentSource::Memory(bytes) => {
                let end = bytes.len().min(usize::try_from(limit).unwrap_or(usize::MAX));
                Ok(bytes[..end].to_vec())
            }
        }
    }

    pub async fn read_text(&self) -> Result<String> {
        let bytes = self.read_all().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
