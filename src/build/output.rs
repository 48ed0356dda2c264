use crate::catalog::{BuildRequest, FeatureDescriptor};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Diagnostic data attached to an output in debug mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDiagnostics {
    /// Confirmed features in detection order
    pub features: Vec<FeatureDescriptor>,
    /// The exact request sent to the catalog
    pub request: BuildRequest,
}

/// The generated build artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub path: PathBuf,
    pub contents: Vec<u8>,
    pub diagnostics: Option<BuildDiagnostics>,
}

impl OutputUnit {
    pub fn new(path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents,
            diagnostics: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: BuildDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn features(&self) -> Option<&[FeatureDescriptor]> {
        self.diagnostics.as_ref().map(|d| d.features.as_slice())
    }

    pub fn request(&self) -> Option<&BuildRequest> {
        self.diagnostics.as_ref().map(|d| &d.request)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Writes the artifact, creating missing parent directories
    pub async fn write(&self) -> std::io::Result<()> {
        self.write_to(&self.path).await
    }

    pub async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &self.contents).await
    }
}
