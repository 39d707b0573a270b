//! local-cache - Filesystem-backed artifact cache for CI runners
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use local_cache::cli::{Cli, Commands, LogFormat, RunContext};
use local_cache::config::{ConfigManager, Environment};
use local_cache::error::CacheResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CacheResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = info, 1 = debug, 2+ = trace
    let filter = match cli.verbose {
        0 => EnvFilter::new("local_cache=info"),
        1 => EnvFilter::new("local_cache=debug"),
        _ => EnvFilter::new("local_cache=trace"),
    };

    // stdout is reserved for step outputs
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    debug!("Using config file {}", config_manager.path().display());

    let ctx = RunContext {
        config: config_manager.load().await?,
        env: Environment::from_env(),
        cache_dir: cli.cache_dir.clone(),
    };
    debug!("Cache directory: {}", ctx.cache_dir().display());

    match cli.command {
        Commands::Restore(args) => local_cache::cli::commands::restore(args, &ctx).await,
        Commands::Save(args) => local_cache::cli::commands::save(args, &ctx).await,
        Commands::Post(args) => local_cache::cli::commands::post(args, &ctx).await,
    }
}
