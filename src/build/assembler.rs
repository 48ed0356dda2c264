//! Turns confirmed features into a catalog build

use super::output::{BuildDiagnostics, OutputUnit};
use crate::catalog::{BuildRequest, CatalogService, FeatureDescriptor};
use crate::config::BuildConfig;
use crate::error::Error;
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::debug;

fn feature_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.?/?feature-detects/([a-z-0-9/]+)\.js")
            .expect("feature path pattern is valid")
    })
}

/// Short catalog identifier of a feature-detect module
///
/// `./feature-detects/css/flexbox.js` becomes `css/flexbox`. Paths outside
/// `feature-detects/` are returned unchanged.
pub fn feature_path(descriptor_path: &str) -> String {
    feature_path_pattern()
        .replace(descriptor_path, "$1")
        .into_owned()
}

/// Builds the catalog request for a set of confirmed features
///
/// Added features are appended verbatim, without deduplication.
pub fn build_request(confirmed: &[FeatureDescriptor], config: &BuildConfig) -> BuildRequest {
    let mut feature_detects: Vec<String> =
        confirmed.iter().map(|f| feature_path(&f.path)).collect();
    feature_detects.extend(config.add_features.iter().cloned());

    BuildRequest {
        class_prefix: config.css_prefix.clone(),
        options: config.options.clone(),
        feature_detects,
    }
}

pub struct BuildAssembler {
    service: Arc<dyn CatalogService>,
    progress: Arc<dyn ProgressHandler>,
}

impl BuildAssembler {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        Self {
            service,
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    fn report(&self, config: &BuildConfig, event: ProgressEvent) {
        if !config.quiet {
            self.progress.on_progress(&event);
        }
    }

    /// Requests a build for `confirmed` and wraps the artifact at `output_path`
    ///
    /// Catalog failures surface as [`Error::BuildFailure`] with no retry.
    pub async fn assemble(
        &self,
        confirmed: Vec<FeatureDescriptor>,
        config: &BuildConfig,
        output_path: &Path,
    ) -> Result<OutputUnit, Error> {
        let request = build_request(&confirmed, config);
        let detected = &request.feature_detects[..confirmed.len()];

        if detected.is_empty() {
            self.report(config, ProgressEvent::NoFeaturesDetected);
        } else {
            self.report(
                config,
                ProgressEvent::FeaturesDetected {
                    features: detected.to_vec(),
                },
            );
        }

        if !config.add_features.is_empty() {
            self.report(
                config,
                ProgressEvent::FeaturesAdded {
                    features: config.add_features.clone(),
                },
            );
        }

        self.report(
            config,
            ProgressEvent::BuildStarted {
                options: request.options.iter().map(|o| o.to_string()).collect(),
                class_prefix: request.class_prefix.clone(),
            },
        );

        debug!(
            catalog = self.service.name(),
            feature_detects = request.feature_detects.len(),
            "Requesting catalog build"
        );

        let start = Instant::now();
        let artifact = self
            .service
            .build(&request)
            .await
            .map_err(|e| Error::BuildFailure {
                reason: e.to_string(),
            })?;

        self.report(
            config,
            ProgressEvent::BuildComplete {
                output: output_path.display().to_string(),
                feature_count: request.feature_detects.len(),
                bytes: artifact.len(),
                build_time: start.elapsed(),
            },
        );

        let output = OutputUnit::new(output_path, artifact);
        if config.debug {
            Ok(output.with_diagnostics(BuildDiagnostics {
                features: confirmed,
                request,
            }))
        } else {
            Ok(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BuildOption, MockCatalog};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use yare::parameterized;

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingHandler {
        fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressHandler for RecordingHandler {
        fn on_progress(&self, event: &ProgressEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn feature(property: &str, path: &str) -> FeatureDescriptor {
        FeatureDescriptor::new(property, path)
    }

    fn assembler(mock: Arc<MockCatalog>) -> (BuildAssembler, Arc<RecordingHandler>) {
        let handler = Arc::new(RecordingHandler::default());
        let assembler = BuildAssembler::new(mock).with_progress(handler.clone());
        (assembler, handler)
    }

    #[parameterized(
        dotted = { "./feature-detects/css/flexbox.js", "css/flexbox" },
        slash = { "/feature-detects/json.js", "json" },
        bare = { "feature-detects/es6/promises.js", "es6/promises" },
        digits = { "./feature-detects/css/transforms3d.js", "css/transforms3d" },
        outside = { "./src/addTest.js", "./src/addTest.js" },
        uppercase = { "./feature-detects/Json.js", "./feature-detects/Json.js" },
    )]
    fn test_feature_path(path: &str, expected: &str) {
        assert_eq!(feature_path(path), expected);
    }

    #[test]
    fn test_build_request_appends_added_features_verbatim() {
        let config = BuildConfig {
            css_prefix: Some("mz-".to_string()),
            options: vec![BuildOption::SetClasses, BuildOption::Html5Shiv],
            add_features: vec!["json".to_string(), "foo/bar".to_string()],
            ..Default::default()
        };
        let confirmed = vec![feature("json", "./feature-detects/json.js")];

        let request = build_request(&confirmed, &config);
        assert_eq!(request.class_prefix.as_deref(), Some("mz-"));
        assert_eq!(
            request.options,
            vec![BuildOption::SetClasses, BuildOption::Html5Shiv]
        );
        assert_eq!(request.feature_detects, vec!["json", "json", "foo/bar"]);
    }

    #[tokio::test]
    async fn test_added_features_without_detection() {
        let mock = Arc::new(MockCatalog::new(vec![]));
        let (assembler, _) = assembler(mock.clone());
        let config = BuildConfig {
            add_features: vec!["foo/bar".to_string()],
            ..Default::default()
        };

        assembler
            .assemble(Vec::new(), &config, Path::new("modernizr.js"))
            .await
            .unwrap();

        let requests = mock.build_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].feature_detects, vec!["foo/bar"]);
    }

    #[tokio::test]
    async fn test_progress_sequence() {
        let mock = Arc::new(MockCatalog::new(vec![]));
        let (assembler, handler) = assembler(mock);
        let config = BuildConfig {
            css_prefix: Some("mz-".to_string()),
            add_features: vec!["foo/bar".to_string()],
            ..Default::default()
        };

        assembler
            .assemble(
                vec![feature("json", "./feature-detects/json.js")],
                &config,
                Path::new("modernizr.js"),
            )
            .await
            .unwrap();

        let events = handler.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            ProgressEvent::FeaturesDetected {
                features: vec!["json".to_string()]
            }
        );
        assert_eq!(
            events[1],
            ProgressEvent::FeaturesAdded {
                features: vec!["foo/bar".to_string()]
            }
        );
        assert_eq!(
            events[2],
            ProgressEvent::BuildStarted {
                options: vec!["setClasses".to_string()],
                class_prefix: Some("mz-".to_string()),
            }
        );
        assert!(matches!(events[3], ProgressEvent::BuildComplete { .. }));
    }

    #[tokio::test]
    async fn test_no_features_warning() {
        let (assembler, handler) = assembler(Arc::new(MockCatalog::new(vec![])));

        assembler
            .assemble(Vec::new(), &BuildConfig::default(), Path::new("modernizr.js"))
            .await
            .unwrap();

        assert_eq!(handler.events()[0], ProgressEvent::NoFeaturesDetected);
    }

    #[tokio::test]
    async fn test_quiet_emits_nothing() {
        let (assembler, handler) = assembler(Arc::new(MockCatalog::new(vec![])));
        let config = BuildConfig {
            quiet: true,
            debug: true,
            add_features: vec!["foo/bar".to_string()],
            ..Default::default()
        };

        assembler
            .assemble(Vec::new(), &config, Path::new("modernizr.js"))
            .await
            .unwrap();

        assert!(handler.events().is_empty());
    }

    #[tokio::test]
    async fn test_debug_attaches_diagnostics() {
        let mock = Arc::new(MockCatalog::new(vec![]));
        let (assembler, _) = assembler(mock.clone());
        let config = BuildConfig {
            debug: true,
            ..Default::default()
        };
        let confirmed = vec![feature("json", "./feature-detects/json.js")];

        let output = assembler
            .assemble(confirmed.clone(), &config, Path::new("dist/modernizr.js"))
            .await
            .unwrap();

        assert_eq!(output.path, PathBuf::from("dist/modernizr.js"));
        assert_eq!(output.features(), Some(confirmed.as_slice()));
        assert_eq!(output.request(), mock.build_requests().first());
    }

    #[tokio::test]
    async fn test_no_diagnostics_without_debug() {
        let (assembler, _) = assembler(Arc::new(MockCatalog::new(vec![]).with_artifact("x")));

        let output = assembler
            .assemble(Vec::new(), &BuildConfig::default(), Path::new("modernizr.js"))
            .await
            .unwrap();

        assert!(output.diagnostics.is_none());
        assert_eq!(output.contents, b"x");
    }

    #[tokio::test]
    async fn test_build_failure_propagates() {
        let mock = Arc::new(MockCatalog::new(vec![]).with_build_failure("catalog crashed"));
        let (assembler, handler) = assembler(mock.clone());

        let err = assembler
            .assemble(Vec::new(), &BuildConfig::default(), Path::new("modernizr.js"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BuildFailure { .. }));
        assert!(err.to_string().contains("catalog crashed"));
        assert_eq!(mock.build_requests().len(), 1);
        assert!(!handler
            .events()
            .iter()
            .any(|e| matches!(e, ProgressEvent::BuildComplete { .. })));
    }
}
