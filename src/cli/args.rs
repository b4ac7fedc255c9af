//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pavi-offline - offline caching agent for the PAVI FAST app
///
/// Precaches the application shell, routes requests through cache
/// strategies, and evicts partitions left by earlier versions.
#[derive(Parser, Debug)]
#[command(name = "pavi-offline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PAVI_OFFLINE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Precache the manifest into the core partition
    Install,

    /// Evict stale partitions and take over open clients
    Activate,

    /// Route a single request through the worker
    Fetch(FetchArgs),

    /// Inspect or evict cache partitions
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Absolute request URL
    pub url: String,

    /// Treat the request as a top-level navigation
    #[arg(short, long)]
    pub navigate: bool,

    /// Accept header value
    #[arg(long)]
    pub accept: Option<String>,

    /// Request method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Write the response body to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for cache list
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List all partitions in storage
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Delete partitions left by other versions
    Evict {
        /// Show what would be deleted
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_install() {
        let cli = Cli::parse_from(["pavi-offline", "install"]);
        assert!(matches!(cli.command, Commands::Install));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn cli_parses_fetch() {
        let cli = Cli::parse_from([
            "pavi-offline",
            "fetch",
            "https://app.test/index.html",
            "--navigate",
            "--accept",
            "text/html",
        ]);
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.url, "https://app.test/index.html");
                assert!(args.navigate);
                assert_eq!(args.accept.as_deref(), Some("text/html"));
                assert_eq!(args.method, "GET");
                assert!(args.output.is_none());
            }
            _ => panic!("expected Fetch command"),
        }
    }

    #[test]
    fn cli_parses_cache_evict_dry_run() {
        let cli = Cli::parse_from(["pavi-offline", "-vv", "cache", "evict", "--dry-run"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Cache(CacheArgs {
                action: CacheAction::Evict { dry_run },
            }) => assert!(dry_run),
            _ => panic!("expected cache evict"),
        }
    }

    #[test]
    fn cli_parses_cache_list_format() {
        let cli = Cli::parse_from(["pavi-offline", "cache", "list", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Commands::Cache(CacheArgs {
                action: CacheAction::List {
                    format: OutputFormat::Json
                }
            })
        ));
    }

    #[test]
    fn cli_parses_config_init_force() {
        let cli = Cli::parse_from(["pavi-offline", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Init { force: true })
            })
        ));
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["pavi-offline", "cache", "list", "-f", "xml"]).is_err());
    }
}
