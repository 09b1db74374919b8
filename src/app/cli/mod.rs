//! CLI Adapter.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::app::api;
use crate::app::config::ConfigSource;
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "ballot-dapp")]
#[command(version)]
#[command(
    about = "Proposal and voting state machine for a rollup execution environment",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process rollup requests until the rollup server goes away
    #[clap(visible_alias = "r")]
    Run(ConfigArgs),
    /// Print the effective configuration as TOML
    #[clap(visible_alias = "c")]
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Rollup HTTP server URL (overrides ROLLUP_HTTP_SERVER_URL)
    #[arg(short, long)]
    server_url: Option<Url>,
}

impl From<ConfigArgs> for ConfigSource {
    fn from(args: ConfigArgs) -> Self {
        ConfigSource { path: args.config, server_url: args.server_url }
    }
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Run(args) => api::serve(&args.into()).map(|_| ()),
        Commands::Config(args) => api::effective_config(&args.into()).map(|rendered| {
            print!("{}", rendered);
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
