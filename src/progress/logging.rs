//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::FeaturesDetected { features } => {
                info!(count = features.len(), "Detected features: {}", features.join(", "));
            }
            ProgressEvent::NoFeaturesDetected => {
                warn!("No features were detected");
            }
            ProgressEvent::FeaturesAdded { features } => {
                info!(count = features.len(), "Added features: {}", features.join(", "));
            }
            ProgressEvent::BuildStarted {
                options,
                class_prefix,
            } => {
                info!(
                    "Building Modernizr with these additional options: {}",
                    options.join(", ")
                );
                if let Some(prefix) = class_prefix {
                    info!("CSS class prefix: \"{}\"", prefix);
                }
            }
            ProgressEvent::BuildComplete {
                output,
                feature_count,
                bytes,
                build_time,
            } => {
                info!(
                    output = %output,
                    features = feature_count,
                    bytes,
                    build_time_ms = build_time.as_millis(),
                    "Build complete"
                );
            }
        }
    }
}
