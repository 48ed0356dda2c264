pub mod commands;
pub mod output;
pub mod sources;

pub use commands::{CliArgs, OutputFormatArg};
pub use output::{BuildReport, OutputFormat, OutputFormatter};
pub use sources::collect_sources;

use crate::build::OutputUnit;
use crate::catalog::CatalogGateway;
use crate::config::BuildConfig;
use crate::detection::SourceUnit;
use crate::session::BuildSession;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Layers defaults, the optional config file and flags, then validates
pub fn resolve_config(args: &CliArgs) -> Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading config file: {}", path.display());
            BuildConfig::from_file(path)?
        }
        None => BuildConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

/// Scans every source named by `args` and writes the build
pub async fn execute(args: &CliArgs, gateway: Arc<CatalogGateway>) -> Result<OutputUnit> {
    let config = resolve_config(args)?;
    let sources = collect_sources(&args.paths)?;
    info!("Scanning {} source files", sources.len());

    let output_path = config.file.clone();
    let mut session = BuildSession::new(&output_path, config, gateway);

    for path in sources {
        let unit = SourceUnit::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        session
            .on_unit(unit)
            .await
            .with_context(|| format!("Failed to scan {}", path.display()))?;
    }

    let output = session.on_complete().await?;
    output
        .write()
        .await
        .with_context(|| format!("Failed to write {}", output.path.display()))?;

    Ok(output)
}
