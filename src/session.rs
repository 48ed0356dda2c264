//! Build sessions
//!
//! A session consumes source units one at a time, accumulates the features
//! they reference, and assembles a single build when input ends.
//!
//! ```no_run
//! use modernizr_build::catalog::{CatalogGateway, ProcessCatalog};
//! use modernizr_build::config::{BuildConfig, CatalogConfig};
//! use modernizr_build::detection::SourceUnit;
//! use modernizr_build::BuildSession;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), modernizr_build::Error> {
//! let service = Arc::new(ProcessCatalog::from_config(&CatalogConfig::default()));
//! let gateway = Arc::new(CatalogGateway::new(service));
//!
//! let mut session = BuildSession::new("modernizr.js", BuildConfig::default(), gateway);
//! session.on_unit(SourceUnit::read("src/app.js").await?).await?;
//! let output = session.on_complete().await?;
//! output.write().await?;
//! # Ok(())
//! # }
//! ```

use crate::build::{BuildAssembler, OutputUnit};
use crate::catalog::{CatalogGateway, FeatureDescriptor};
use crate::config::BuildConfig;
use crate::detection::{DetectionState, FeatureMatcher, SourceContents, SourceUnit};
use crate::error::Error;
use crate::progress::{LoggingHandler, ProgressHandler};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

pub struct BuildSession {
    output_name: PathBuf,
    config: BuildConfig,
    gateway: Arc<CatalogGateway>,
    matcher: FeatureMatcher,
    state: DetectionState,
    progress: Arc<dyn ProgressHandler>,
    units_seen: usize,
}

impl BuildSession {
    pub fn new(
        output_name: impl Into<PathBuf>,
        config: BuildConfig,
        gateway: Arc<CatalogGateway>,
    ) -> Self {
        Self {
            output_name: output_name.into(),
            matcher: FeatureMatcher::from_config(&config),
            config,
            gateway,
            state: DetectionState::new(),
            progress: Arc::new(LoggingHandler),
            units_seen: 0,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    /// Scans one unit and records the features it references
    ///
    /// Units without contents are skipped; streams are rejected. If the
    /// catalog metadata is unavailable the unit is skipped unless the session
    /// is strict.
    pub async fn on_unit(&mut self, unit: SourceUnit) -> Result<(), Error> {
        self.units_seen += 1;

        let text = match &unit.contents {
            SourceContents::Null => {
                debug!(path = %unit.path.display(), "Skipping unit without contents");
                return Ok(());
            }
            SourceContents::Stream(_) => {
                return Err(Error::StreamUnsupported { path: unit.path });
            }
            SourceContents::Buffer(bytes) => String::from_utf8_lossy(bytes),
        };

        let kind = unit.kind();
        if !kind.is_recognized() {
            debug!(path = %unit.path.display(), "Skipping unrecognized file type");
            return Ok(());
        }

        let known = match self.gateway.get_features().await {
            Ok(features) => features,
            Err(e) if e.is_recoverable() && !self.config.strict => {
                error!(path = %unit.path.display(), "{}", e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let matched = self.matcher.evaluate(kind, &text, &known, &self.state);
        let added = self.state.record(matched);
        debug!(
            path = %unit.path.display(),
            ?kind,
            added,
            total = self.state.len(),
            "Unit scanned"
        );

        Ok(())
    }

    /// Assembles the build from everything confirmed so far
    pub async fn on_complete(self) -> Result<OutputUnit, Error> {
        if self.config.strict && self.units_seen == 0 {
            return Err(Error::NoSources);
        }

        let assembler =
            BuildAssembler::new(self.gateway.service()).with_progress(self.progress);
        assembler
            .assemble(self.state.into_confirmed(), &self.config, &self.output_name)
            .await
    }

    pub fn confirmed(&self) -> &[FeatureDescriptor] {
        self.state.confirmed()
    }

    pub fn units_seen(&self) -> usize {
        self.units_seen
    }
}
