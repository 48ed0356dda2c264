use crate::catalog::BuildOption;
use crate::config::{BuildConfig, CatalogConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scans sources for Modernizr feature usage and writes a minimal custom build
#[derive(Parser, Debug)]
#[command(
    name = "modernizr-build",
    about = "Build a custom Modernizr containing only the feature-detects your sources use",
    version,
    long_about = "modernizr-build scans scripts for Modernizr property access \
                  (Modernizr.flexbox, Modernizr['json']) and stylesheets for classes on the \
                  html element (html.flexbox, html.no-flexbox), then asks the modernizr \
                  package to build a runtime with exactly those feature-detects.\n\n\
                  Examples:\n  \
                  modernizr-build src/\n  \
                  modernizr-build --out public/modernizr.js --prefix mz- src/ styles/\n  \
                  modernizr-build --option setClasses --option html5shiv src/app.js\n  \
                  modernizr-build --debug --format json src/"
)]
pub struct CliArgs {
    #[arg(
        value_name = "PATH",
        required = true,
        help = "Source files or directories to scan"
    )]
    pub paths: Vec<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file for the generated build [default: modernizr.js]"
    )]
    pub out: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PREFIX",
        help = "CSS class prefix used by the build and when matching stylesheets"
    )]
    pub prefix: Option<String>,

    #[arg(
        long = "option",
        value_enum,
        value_name = "OPTION",
        help = "Build option to include (repeatable, replaces the default setClasses)"
    )]
    pub options: Vec<BuildOption>,

    #[arg(
        long = "add-feature",
        value_name = "FEATURE",
        help = "Feature-detect to include whether or not it is used, e.g. css/flexbox (repeatable)"
    )]
    pub add_features: Vec<String>,

    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Config file (.toml, .json, .yaml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress progress output"
    )]
    pub quiet: bool,

    #[arg(long, help = "Print detected features and the build request")]
    pub debug: bool,

    #[arg(
        long,
        help = "Fail when feature metadata is unavailable or no sources were given"
    )]
    pub strict: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Format of the --debug report"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "PROGRAM",
        help = "Catalog program to run instead of node with the modernizr package"
    )]
    pub catalog_program: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory the modernizr package is resolved from"
    )]
    pub catalog_dir: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Verbose logging")]
    pub verbose: bool,
}

impl CliArgs {
    /// Overrides `config` with every flag that was given
    ///
    /// `--option` replaces the option list; `--add-feature` appends.
    pub fn apply_to(&self, config: &mut BuildConfig) {
        if let Some(out) = &self.out {
            config.file = out.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.css_prefix = Some(prefix.clone());
        }
        if !self.options.is_empty() {
            config.options = self.options.clone();
        }
        config.add_features.extend(self.add_features.iter().cloned());
        config.quiet |= self.quiet;
        config.debug |= self.debug;
        config.strict |= self.strict;
    }

    /// Catalog settings from the environment, overridden by flags
    pub fn catalog_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::default();
        if let Some(program) = &self.catalog_program {
            config.program = Some(program.clone());
        }
        if let Some(dir) = &self.catalog_dir {
            config.working_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.to_lowercase();
        }
        config
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
