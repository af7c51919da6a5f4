//! toolbridge CLI: the main entry point.
//!
//! Commands:
//! - `run`: start the relay service
//! - `status`: show the effective configuration
//! - `doctor`: diagnose the installation
//! - `init`: write a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use toolbridge_config::AppConfig;

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "toolbridge",
    about = "Relay bridge messages to a command-line tool",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: ~/.toolbridge/config.toml)
    #[arg(short, long, global = true, env = "TOOLBRIDGE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay service (runs until interrupted)
    Run,

    /// Show the effective configuration
    Status,

    /// Diagnose config, tool and bridge
    Doctor,

    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(AppConfig::default_config_path);

    match cli.command {
        // `run` sets up logging itself, once the config is known.
        Commands::Run => commands::run::run(&config_path, cli.verbose).await?,
        Commands::Status => {
            logging::init("warn", None, cli.verbose)?;
            commands::status::run(&config_path).await?
        }
        Commands::Doctor => {
            logging::init("warn", None, cli.verbose)?;
            commands::doctor::run(&config_path).await?
        }
        Commands::Init => {
            logging::init("info", None, cli.verbose)?;
            commands::init::run(&config_path).await?
        }
    }

    Ok(())
}
