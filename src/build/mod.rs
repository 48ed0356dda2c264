//! Custom build assembly

pub mod assembler;
pub mod output;

pub use assembler::{build_request, feature_path, BuildAssembler};
pub use output::{BuildDiagnostics, OutputUnit};
