use modernizr_build::catalog::{CatalogGateway, ProcessCatalog};
use modernizr_build::cli::{execute, BuildReport, CliArgs, OutputFormatter};
use modernizr_build::util::logging::{init_logging, parse_level, LoggingConfig};
use modernizr_build::{NAME, VERSION};

use clap::Parser;
use std::env;
use std::sync::Arc;
use tracing::{debug, error, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_build(&args).await;
    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str =
            env::var("MODERNIZR_BUILD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    let config = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default()
    };

    init_logging(LoggingConfig { level, ..config });
}

async fn handle_build(args: &CliArgs) -> i32 {
    let catalog_config = args.catalog_config();
    if let Err(e) = catalog_config.validate() {
        error!("Configuration error: {}", e);
        return 1;
    }
    debug!("{}", catalog_config);

    let service = Arc::new(ProcessCatalog::from_config(&catalog_config));
    let gateway = Arc::new(CatalogGateway::new(service));

    let output = match execute(args, gateway).await {
        Ok(output) => output,
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    };

    if let Some(report) = BuildReport::from_output(&output) {
        let formatter = OutputFormatter::new(args.format.into());
        match formatter.format(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to format build report: {}", e);
                return 1;
            }
        }
    }

    0
}
