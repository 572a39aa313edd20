//! Input processing module
//! Handles file description, type detection, and the analysis pipeline

pub mod descriptor;
pub mod file_detector;
pub mod manager;

pub use descriptor::{ContentSource, FileDescriptor};
pub use file_detector::{classify, AnalysisStrategy, GenericKind};
pub use manager::AnalysisManager;
