use super::types::{BuildRequest, FeatureDescriptor};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a catalog service implementation
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to launch catalog program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog program exited with {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },

    #[error("Invalid catalog metadata: {message}")]
    InvalidMetadata { message: String },

    #[error("Failed to encode build request: {message}")]
    InvalidRequest { message: String },

    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Other { message: String },
}

/// Metadata and build API of the feature-detection catalog
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Lists every feature-detect the catalog knows about
    async fn list_features(&self) -> Result<Vec<FeatureDescriptor>, CatalogError>;

    /// Produces a custom build for the given request
    async fn build(&self, request: &BuildRequest) -> Result<Vec<u8>, CatalogError>;

    fn name(&self) -> &str;
}
