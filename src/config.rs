//! Configuration for build sessions and the catalog process
//!
//! [`BuildConfig`] holds the user-facing build settings. It is layered from
//! built-in defaults, an optional config file and command-line flags.
//! [`CatalogConfig`] controls how the catalog program is launched and is read
//! from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `MODERNIZR_BUILD_NODE`: node binary driving the `modernizr` package - default: "node"
//! - `MODERNIZR_BUILD_CATALOG_PROGRAM`: custom catalog program (replaces the node bridge)
//! - `MODERNIZR_BUILD_CATALOG_DIR`: working directory of the catalog program
//! - `MODERNIZR_BUILD_LOG_LEVEL`: logging level - default: "info"
//!
//! # Config files
//!
//! `.toml`, `.json`, `.yaml` and `.yml` files are accepted. Keys use the same
//! camelCase names as the catalog tooling:
//!
//! ```toml
//! cssPrefix = "mz-"
//! file = "public/modernizr.js"
//! options = ["setClasses", "html5shiv"]
//! addFeatures = ["css/flexbox"]
//! ```

use crate::catalog::BuildOption;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_OUTPUT_FILE: &str = "modernizr.js";
const DEFAULT_NODE: &str = "node";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported config file format: {}. Use .toml, .json, .yaml or .yml", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// User-supplied build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildConfig {
    /// Class prefix used for stylesheet matching and in the generated build
    pub css_prefix: Option<String>,

    /// Output path of the generated build
    pub file: PathBuf,

    /// Catalog build options
    pub options: Vec<BuildOption>,

    /// Feature paths always included in the build
    pub add_features: Vec<String>,

    /// Suppress progress messages
    pub quiet: bool,

    /// Attach detected features and the build request to the output
    pub debug: bool,

    /// Fail instead of skipping when metadata is unavailable or nothing was scanned
    pub strict: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            css_prefix: None,
            file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            options: vec![BuildOption::SetClasses],
            add_features: Vec::new(),
            quiet: false,
            debug: false,
            strict: false,
        }
    }
}

impl BuildConfig {
    /// Loads a config file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        let parsed = match extension.as_deref() {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| e.to_string())
            }
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Validates the configuration
    ///
    /// A configured class prefix must be non-empty and free of whitespace, and
    /// added feature paths must be non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.css_prefix {
            if prefix.is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "CSS class prefix cannot be empty".to_string(),
                ));
            }
            if prefix.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationFailed(format!(
                    "CSS class prefix cannot contain whitespace: {:?}",
                    prefix
                )));
            }
        }

        if self.add_features.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "Added feature paths cannot be empty".to_string(),
            ));
        }

        if self.file.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Output file cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// How the catalog program is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Node binary used with the built-in bridge script
    pub node: PathBuf,

    /// Custom catalog program; replaces the node bridge when set
    pub program: Option<PathBuf>,

    /// Working directory, where `node_modules/modernizr` is resolved
    pub working_dir: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for CatalogConfig {
    /// Loads from `MODERNIZR_BUILD_*` environment variables with defaults
    fn default() -> Self {
        let node = env::var("MODERNIZR_BUILD_NODE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NODE));

        let program = env::var("MODERNIZR_BUILD_CATALOG_PROGRAM")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let working_dir = env::var("MODERNIZR_BUILD_CATALOG_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_level = env::var("MODERNIZR_BUILD_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            node,
            program,
            working_dir,
            log_level,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                return Err(ConfigError::ValidationFailed(format!(
                    "Catalog directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Catalog Configuration:")?;
        match &self.program {
            Some(program) => writeln!(f, "  Program: {}", program.display())?,
            None => writeln!(f, "  Node: {}", self.node.display())?,
        }
        match &self.working_dir {
            Some(dir) => writeln!(f, "  Directory: {}", dir.display())?,
            None => writeln!(f, "  Directory: (current)")?,
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
