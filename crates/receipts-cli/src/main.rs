//! CLI application for receipt extraction and spending tracking.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{clear, config, extract, ingest, list, report, GlobalOpts};

/// Receipt analyzer - Extract vendor, amount, date and category from receipts
#[derive(Parser)]
#[command(name = "receipts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the receipts database (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and store receipts from files
    Ingest(ingest::IngestArgs),

    /// Extract fields from a single file without storing it
    Extract(extract::ExtractArgs),

    /// Show spending aggregates over stored receipts
    Report(report::ReportArgs),

    /// List stored receipts
    List(list::ListArgs),

    /// Delete every stored receipt
    Clear(clear::ClearArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let opts = GlobalOpts {
        config: cli.config,
        db: cli.db,
    };

    match cli.command {
        Commands::Ingest(args) => ingest::run(args, &opts).await,
        Commands::Extract(args) => extract::run(args, &opts).await,
        Commands::Report(args) => report::run(args, &opts).await,
        Commands::List(args) => list::run(args, &opts).await,
        Commands::Clear(args) => clear::run(args, &opts).await,
        Commands::Config(args) => config::run(args, &opts).await,
    }
}
