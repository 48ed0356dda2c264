use super::service::{CatalogError, CatalogService};
use super::types::{BuildRequest, FeatureDescriptor};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory catalog with canned metadata, for tests and dry runs
pub struct MockCatalog {
    features: Vec<FeatureDescriptor>,
    artifact: Option<Vec<u8>>,
    metadata_failures: Mutex<VecDeque<String>>,
    build_failure: Option<String>,
    requests: Mutex<Vec<BuildRequest>>,
    list_calls: AtomicUsize,
    name: String,
}

impl MockCatalog {
    pub fn new(features: Vec<FeatureDescriptor>) -> Self {
        Self {
            features,
            artifact: None,
            metadata_failures: Mutex::new(VecDeque::new()),
            build_failure: None,
            requests: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            name: "MockCatalog".to_string(),
        }
    }

    /// Returns these bytes from every build instead of the generated stub
    pub fn with_artifact(mut self, artifact: impl Into<Vec<u8>>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    /// Makes every build call fail with the given message
    pub fn with_build_failure(mut self, message: impl Into<String>) -> Self {
        self.build_failure = Some(message.into());
        self
    }

    /// Queues a failure for the next metadata request
    pub fn fail_next_metadata(&self, message: impl Into<String>) {
        lock(&self.metadata_failures).push_back(message.into());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Build requests received so far, in call order
    pub fn build_requests(&self) -> Vec<BuildRequest> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stub artifact naming the requested detects, so tests can inspect it
fn stub_artifact(request: &BuildRequest) -> Vec<u8> {
    let options: Vec<&str> = request.options.iter().map(|o| o.as_str()).collect();
    format!(
        "/*! modernizr custom build | options: {} | feature-detects: {} */\n",
        options.join(","),
        request.feature_detects.join(",")
    )
    .into_bytes()
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn list_features(&self) -> Result<Vec<FeatureDescriptor>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = lock(&self.metadata_failures).pop_front() {
            return Err(CatalogError::Other { message });
        }

        Ok(self.features.clone())
    }

    async fn build(&self, request: &BuildRequest) -> Result<Vec<u8>, CatalogError> {
        lock(&self.requests).push(request.clone());

        if let Some(message) = &self.build_failure {
            return Err(CatalogError::Other {
                message: message.clone(),
            });
        }

        Ok(self
            .artifact
            .clone()
            .unwrap_or_else(|| stub_artifact(request)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
