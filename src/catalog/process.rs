//! Catalog backed by an external program
//!
//! The program is invoked with a trailing `metadata` or `build` argument:
//!
//! - `metadata` prints the JSON array of feature descriptors on stdout
//! - `build` reads a JSON build request on stdin and prints the artifact
//!
//! By default the program is `node` running a small bridge script around the
//! `modernizr` npm package, resolved from the configured working directory.

use super::service::{CatalogError, CatalogService};
use super::types::{BuildRequest, FeatureDescriptor};
use crate::config::CatalogConfig;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const NODE_BRIDGE: &str = r#"
const modernizr = require('modernizr');
const mode = process.argv[process.argv.length - 1];
if (mode === 'metadata') {
  modernizr.metadata((metadata) => process.stdout.write(JSON.stringify(metadata || [])));
} else if (mode === 'build') {
  let input = '';
  process.stdin.setEncoding('utf8');
  process.stdin.on('data', (chunk) => { input += chunk; });
  process.stdin.on('end', () => {
    modernizr.build(JSON.parse(input), (result) => process.stdout.write(result));
  });
} else {
  process.stderr.write('unknown mode: ' + mode);
  process.exit(2);
}
"#;

pub struct ProcessCatalog {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    name: String,
}

impl ProcessCatalog {
    /// Drives the `modernizr` npm package through the given node binary
    pub fn node(node: impl Into<PathBuf>) -> Self {
        Self {
            program: node.into(),
            args: vec!["-e".to_string(), NODE_BRIDGE.to_string(), "--".to_string()],
            working_dir: None,
            name: "modernizr (node)".to_string(),
        }
    }

    /// Uses any executable that speaks the metadata/build protocol
    pub fn custom(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program.display().to_string();
        Self {
            program,
            args: Vec::new(),
            working_dir: None,
            name,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        let catalog = match &config.program {
            Some(program) => Self::custom(program),
            None => Self::node(&config.node),
        };
        match &config.working_dir {
            Some(dir) => catalog.with_working_dir(dir),
            None => catalog,
        }
    }

    /// Arguments placed before the trailing mode argument
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    async fn run(&self, mode: &str, input: Option<Vec<u8>>) -> Result<Vec<u8>, CatalogError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(mode)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        debug!(program = %self.program.display(), mode, "Invoking catalog program");

        let mut child = command.spawn().map_err(|source| CatalogError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        // Exit status and stderr take precedence over a broken pipe.
        let mut write_error = None;
        if let Some(input) = input {
            if let Some(mut stdin) = child.stdin.take() {
                let written = match stdin.write_all(&input).await {
                    Ok(()) => stdin.shutdown().await,
                    Err(e) => Err(e),
                };
                if let Err(e) = written {
                    debug!(error = %e, "Catalog program stopped reading stdin");
                    write_error = Some(e);
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(CatalogError::ExitStatus {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if let Some(e) = write_error {
            return Err(CatalogError::Io(e));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl CatalogService for ProcessCatalog {
    async fn list_features(&self) -> Result<Vec<FeatureDescriptor>, CatalogError> {
        let stdout = self.run("metadata", None).await?;
        serde_json::from_slice(&stdout).map_err(|e| CatalogError::InvalidMetadata {
            message: e.to_string(),
        })
    }

    async fn build(&self, request: &BuildRequest) -> Result<Vec<u8>, CatalogError> {
        let payload = serde_json::to_vec(request).map_err(|e| CatalogError::InvalidRequest {
            message: e.to_string(),
        })?;
        self.run("build", Some(payload)).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::catalog::types::BuildOption;
    use std::fs;
    use tempfile::TempDir;

    // Run through `sh` so freshly written scripts are never exec'd directly.
    fn script_catalog(dir: &TempDir, body: &str) -> ProcessCatalog {
        let path = dir.path().join("catalog.sh");
        fs::write(&path, body).unwrap();
        ProcessCatalog::custom("/bin/sh").with_args([path.display().to_string()])
    }

    #[tokio::test]
    async fn test_custom_program_metadata() {
        let dir = TempDir::new().unwrap();
        let catalog = script_catalog(
            &dir,
            r#"[ "$1" = "metadata" ] && printf '[{"property":"json","path":"./feature-detects/json.js"}]'"#,
        );

        let features = catalog.list_features().await.unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].property, vec!["json"]);
    }

    #[tokio::test]
    async fn test_custom_program_build_reads_stdin() {
        let dir = TempDir::new().unwrap();
        let catalog = script_catalog(&dir, r#"[ "$1" = "build" ] && cat"#);
        let request = BuildRequest {
            class_prefix: Some("mz-".to_string()),
            options: vec![BuildOption::SetClasses],
            feature_detects: vec!["css/flexbox".to_string()],
        };
        let artifact = catalog.build(&request).await.unwrap();

        let echoed: BuildRequest = serde_json::from_slice(&artifact).unwrap();
        assert_eq!(echoed, request);
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        let err = script_catalog(&dir, "echo 'no catalog here' >&2\nexit 3")
            .list_features()
            .await
            .unwrap_err();

        match err {
            CatalogError::ExitStatus { stderr, .. } => assert_eq!(stderr, "no catalog here"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_build_reports_stderr_when_stdin_is_ignored() {
        let dir = TempDir::new().unwrap();
        let catalog = script_catalog(&dir, "echo 'cannot find module modernizr' >&2\nexit 4");
        let request = BuildRequest {
            class_prefix: None,
            options: vec![BuildOption::SetClasses],
            feature_detects: (0..20_000).map(|i| format!("css/feature{i}")).collect(),
        };

        let err = catalog.build(&request).await.unwrap_err();

        match err {
            CatalogError::ExitStatus { stderr, .. } => {
                assert_eq!(stderr, "cannot find module modernizr")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_metadata() {
        let dir = TempDir::new().unwrap();
        let err = script_catalog(&dir, "echo 'not json'")
            .list_features()
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidMetadata { .. }));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = ProcessCatalog::custom("/nonexistent/catalog-program")
            .list_features()
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Spawn { .. }));
    }

    #[test]
    fn test_from_config_prefers_custom_program() {
        let config = CatalogConfig {
            node: PathBuf::from("node"),
            program: Some(PathBuf::from("/opt/catalog")),
            working_dir: Some(PathBuf::from("/srv/app")),
            log_level: "info".to_string(),
        };

        let catalog = ProcessCatalog::from_config(&config);
        assert_eq!(catalog.program, PathBuf::from("/opt/catalog"));
        assert!(catalog.args.is_empty());
        assert_eq!(catalog.working_dir, Some(PathBuf::from("/srv/app")));
    }

    #[test]
    fn test_node_bridge_args() {
        let catalog = ProcessCatalog::node("node");
        assert_eq!(catalog.args.first().map(String::as_str), Some("-e"));
        assert_eq!(catalog.args.last().map(String::as_str), Some("--"));
        assert_eq!(catalog.name(), "modernizr (node)");
    }
}
