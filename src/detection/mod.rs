//! Feature usage detection across source units

pub mod accumulator;
pub mod matcher;
pub mod source;

pub use accumulator::DetectionState;
pub use matcher::{FeatureMatcher, NAMESPACE};
pub use source::{SourceContents, SourceKind, SourceUnit};
