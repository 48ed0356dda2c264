//! Memoized access to catalog feature metadata

use super::service::CatalogService;
use super::types::FeatureDescriptor;
use crate::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Fetches the descriptor list once and shares it with every session
///
/// One gateway is meant to live for the whole process. The cache never
/// expires; [`CatalogGateway::reset`] exists for tests.
pub struct CatalogGateway {
    service: Arc<dyn CatalogService>,
    cache: Mutex<Option<Arc<Vec<FeatureDescriptor>>>>,
}

impl CatalogGateway {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        Self {
            service,
            cache: Mutex::new(None),
        }
    }

    pub fn service(&self) -> Arc<dyn CatalogService> {
        Arc::clone(&self.service)
    }

    /// Returns the catalog descriptors, fetching them on first use
    ///
    /// The lock is held across the fetch so concurrent first callers share a
    /// single request. Failures are not cached.
    pub async fn get_features(&self) -> Result<Arc<Vec<FeatureDescriptor>>, Error> {
        let mut cache = self.cache.lock().await;
        if let Some(features) = cache.as_ref() {
            return Ok(Arc::clone(features));
        }

        debug!(catalog = self.service.name(), "Fetching feature metadata");
        let features = self
            .service
            .list_features()
            .await
            .map_err(|e| Error::CatalogUnavailable {
                reason: e.to_string(),
            })?;

        if features.is_empty() {
            return Err(Error::CatalogUnavailable {
                reason: format!("{} returned no feature metadata", self.service.name()),
            });
        }

        info!(
            catalog = self.service.name(),
            features = features.len(),
            "Feature metadata cached"
        );

        let features = Arc::new(features);
        *cache = Some(Arc::clone(&features));
        Ok(features)
    }

    pub async fn is_cached(&self) -> bool {
        self.cache.lock().await.is_some()
    }

    /// Drops the cached descriptors so the next call fetches again
    pub async fn reset(&self) {
        *self.cache.lock().await = None;
    }
}
