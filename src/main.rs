//! Main entry point for the myGengo CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mygengo::cli::commands::{self, Commands};

/// Command-line access to the myGengo translation API
#[derive(Parser, Debug)]
#[command(name = "mygengo", version, about, long_about = None)]
struct Args {
    /// Ini file with a [config] section holding api_key, private_key and sandbox
    /// (defaults to GENGO_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the sandbox API
    #[arg(long, conflicts_with = "live")]
    sandbox: bool,

    /// Use the production API
    #[arg(long)]
    live: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let sandbox = match (args.sandbox, args.live) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let client = commands::build_client(args.config, sandbox)?;
    commands::handle(&client, args.command).await
}
