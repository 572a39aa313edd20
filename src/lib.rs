//! File metadata inspector library

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod input;
pub mod normalize;
pub mod output;

pub use config::Config;
pub use error::{MetascopeError, Result};
pub use input::{AnalysisManager, FileDescriptor};
pub use normalize::NormalizedMetadata;
