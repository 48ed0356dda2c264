//! Feature-detection catalog access
//!
//! The catalog is an external service: it knows every feature-detect
//! (metadata) and can assemble a custom runtime from a subset of them (build).
//! [`CatalogService`] is the seam; [`CatalogGateway`] memoizes its metadata for
//! the lifetime of the process.

pub mod gateway;
pub mod mock;
pub mod process;
pub mod service;
pub mod types;

pub use gateway::CatalogGateway;
pub use mock::MockCatalog;
pub use process::ProcessCatalog;
pub use service::{CatalogError, CatalogService};
pub use types::{BuildOption, BuildRequest, FeatureDescriptor};
