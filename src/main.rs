//! hashbid - main entry point
//!
//! This binary provides two subcommands:
//! - run: monitor a standing order and keep its max price adjusted
//! - snapshot: one-shot dump of the competing orders for a market pair

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "hashbid")]
#[command(about = "Hashpower order price monitor with automatic re-pricing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Monitor an order and adjust its max price on the configured cadence
    Run {
        /// Path to configuration file
        #[arg(short, long, default_value = "configs/monitor.json")]
        config: String,
    },

    /// Fetch and print the current competing orders for the configured market
    Snapshot {
        /// Path to configuration file
        #[arg(short, long, default_value = "configs/monitor.json")]
        config: String,

        /// Include dead and workerless orders in the listing
        #[arg(long)]
        all: bool,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy transport crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Run { .. } => "run",
        Commands::Snapshot { .. } => "snapshot",
    };

    setup_logging(cli.verbose, command_name)?;

    match cli.command {
        Commands::Run { config } => commands::run::run(config),
        Commands::Snapshot { config, all } => commands::snapshot::run(config, all),
    }
}
