//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while assembling a build
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Feature paths detected in the scanned sources
    FeaturesDetected { features: Vec<String> },

    /// Scanning finished without a single detected feature
    NoFeaturesDetected,

    /// Feature paths forced into the build by configuration
    FeaturesAdded { features: Vec<String> },

    /// Build request about to be sent to the catalog
    BuildStarted {
        options: Vec<String>,
        class_prefix: Option<String>,
    },

    /// Catalog returned the artifact
    BuildComplete {
        output: String,
        feature_count: usize,
        bytes: usize,
        build_time: Duration,
    },
}

/// Trait for handling progress events during a build
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        NoOpHandler.on_progress(&ProgressEvent::NoFeaturesDetected);
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::FeaturesDetected {
            features: vec!["json".to_string()],
        });
        handler.on_progress(&ProgressEvent::BuildStarted {
            options: vec!["setClasses".to_string()],
            class_prefix: None,
        });
        handler.on_progress(&ProgressEvent::BuildComplete {
            output: "modernizr.js".to_string(),
            feature_count: 1,
            bytes: 2048,
            build_time: Duration::from_millis(300),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::FeaturesAdded {
            features: vec!["css/flexbox".to_string()],
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("FeaturesAdded"));
        assert!(debug_str.contains("css/flexbox"));
    }
}
