//! modernizr-build - minimal custom Modernizr builds from source usage
//!
//! Scripts and stylesheets are scanned for references to Modernizr feature
//! tests. The features actually used are handed to the feature-detection
//! catalog (the `modernizr` npm package) which assembles a runtime
//! containing only those tests.
//!
//! # Core Concepts
//!
//! - **Catalog**: the external service that lists feature descriptors and
//!   builds runtimes, behind [`catalog::CatalogService`]
//! - **Gateway**: process-wide cache of the descriptor list
//! - **Session**: consumes source units and assembles one build
//!
//! # Example Usage
//!
//! ```no_run
//! use modernizr_build::catalog::{CatalogGateway, FeatureDescriptor, MockCatalog};
//! use modernizr_build::detection::SourceUnit;
//! use modernizr_build::{BuildConfig, BuildSession};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), modernizr_build::Error> {
//! let catalog = Arc::new(MockCatalog::new(vec![FeatureDescriptor::new(
//!     "flexbox",
//!     "./feature-detects/css/flexbox.js",
//! )]));
//! let gateway = Arc::new(CatalogGateway::new(catalog));
//!
//! let mut session = BuildSession::new("modernizr.js", BuildConfig::default(), gateway);
//! session
//!     .on_unit(SourceUnit::new("main.css", "html.no-flexbox .nav { float: left }"))
//!     .await?;
//!
//! let output = session.on_complete().await?;
//! output.write().await?;
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod progress;
pub mod session;
pub mod util;

pub use build::{BuildAssembler, BuildDiagnostics, OutputUnit};
pub use catalog::{
    BuildOption, BuildRequest, CatalogError, CatalogGateway, CatalogService, FeatureDescriptor,
};
pub use config::{BuildConfig, CatalogConfig, ConfigError};
pub use detection::{DetectionState, FeatureMatcher, SourceKind, SourceUnit};
pub use error::Error;
pub use session::BuildSession;
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
