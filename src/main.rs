//! pavi-offline - operator CLI
//!
//! Hosts the offline worker against disk storage and dispatches to
//! subcommands.

use clap::Parser;
use console::style;
use pavi_offline::cli::args::{ConfigAction, ConfigArgs};
use pavi_offline::cli::{Cli, Commands};
use pavi_offline::config::{Config, ConfigManager};
use pavi_offline::error::PaviResult;
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

async fn run() -> PaviResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // `config path` and `config init` work even when the file is broken
    let skip_load = matches!(
        cli.command,
        Commands::Config(ConfigArgs {
            action: Some(ConfigAction::Path | ConfigAction::Init { .. })
        })
    );
    let config = if skip_load {
        Config::default()
    } else {
        config_manager.load().await?
    };

    init_logging(cli.verbose, &config.general.log_format);
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Install => pavi_offline::cli::commands::install(&config).await,
        Commands::Activate => pavi_offline::cli::commands::activate(&config).await,
        Commands::Fetch(args) => pavi_offline::cli::commands::fetch(args, &config).await,
        Commands::Cache(args) => pavi_offline::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            pavi_offline::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("pavi_offline=warn"),
        1 => EnvFilter::new("pavi_offline=info"),
        _ => EnvFilter::new("pavi_offline=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
