//! Savant - research answers grounded in literature databases

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod profiles;

use commands::{ask_command, init_command, status_command, AskOptions};
use profiles::Profile;

/// Savant - evidence-grounded research assistant
#[derive(Parser)]
#[command(name = "savant")]
#[command(about = "◆ Research answers grounded in literature databases")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a research question
    Ask {
        /// The question; prompted for when omitted
        question: Vec<String>,
        /// Research profile (defaults to the configured one)
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,
        /// Maximum inference calls for this run
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,
        /// Only print the answer
        #[arg(short, long)]
        quiet: bool,
        /// Config file to use instead of ~/.savant/config.json
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Initialize config and data directory
    Init,
    /// Show configuration status
    Status {
        /// Config file to inspect
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let verbose = !matches!(cli.command, Commands::Ask { quiet: true, .. });
    init_tracing(verbose);

    match cli.command {
        Commands::Ask {
            question,
            profile,
            max_iterations,
            quiet,
            config,
        } => {
            let options = AskOptions {
                question,
                profile,
                max_iterations,
                quiet,
                config,
            };
            if let Err(e) = ask_command(options).await {
                error!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Init => {
            if let Err(e) = init_command().await {
                error!("Init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Status { config } => {
            if let Err(e) = status_command(config).await {
                error!("Status failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}
