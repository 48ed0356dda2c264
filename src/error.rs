//! Error types surfaced by build sessions

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while scanning sources or assembling a build
#[derive(Debug, Error)]
pub enum Error {
    /// Feature metadata could not be fetched from the catalog
    #[error("Catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// A source unit carried a live stream instead of buffered contents
    #[error("Streaming contents are not supported: {}", path.display())]
    StreamUnsupported { path: PathBuf },

    /// The catalog build service failed
    #[error("Catalog build failed: {reason}")]
    BuildFailure { reason: String },

    /// A strict session completed without seeing any source unit
    #[error("No source files were processed")]
    NoSources,

    /// Invalid or unreadable configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a tolerant session may log this error and keep going
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::CatalogUnavailable { .. })
    }
}
