//! LearnVeda CLI, the main entry point.
//!
//! Commands:
//! - `onboard`  - Write a default config file
//! - `plan`     - Fill in the study form and print a timetable
//! - `gateway`  - Start the HTTP API server
//! - `doctor`   - Diagnose configuration and provider health

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod form;

#[derive(Parser)]
#[command(
    name = "learnveda",
    about = "LearnVeda: study timetables with AI study advice",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.learnveda/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Onboard,

    /// Build a study timetable
    Plan(commands::plan::PlanArgs),

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Diagnose configuration and provider health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Onboard => commands::onboard::run(config_path).await?,
        Commands::Plan(args) => commands::plan::run(config_path, args).await?,
        Commands::Gateway { port } => commands::gateway::run(config_path, port).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
