//! gofer - Dependency version tracker CLI tool
//!
//! Keeps a manifest of container images and GitHub repositories and finds
//! their latest published versions.

use clap::Parser;
use gofer::cli::CliArgs;
use gofer::commands;
use gofer::config::Config;
use gofer::error::{AppError, StoreError};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "GOFER_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(AppError::Store(StoreError::NotFound { .. })) =
                e.downcast_ref::<AppError>()
            {
                eprintln!("Run `gofer init` to create a config file");
            }
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = Config::from_env()?.with_manifest_path(&args.config);

    if args.verbose {
        eprintln!("gofer v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Config: {}", config.manifest_path.display());
    }

    let mut stdout = io::stdout();
    commands::execute(&args, &config, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}
