//! CLI for recording Thai income/expense transactions.

mod commands;
mod recognizer;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, ledger, parse, prefs, recategorize, scan, Context};

/// Bento - record spending from chat text and payment slips
#[derive(Parser)]
#[command(name = "bento")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory holding the ledger and learned preferences
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a chat line such as "ก๋วยเตี๋ยว 50 บาท"
    Parse(parse::ParseArgs),

    /// Scan payment slips or statements
    Scan(scan::ScanArgs),

    /// Review the ledger
    Ledger(ledger::LedgerArgs),

    /// Change a transaction's category and learn from it
    Recategorize(recategorize::RecategorizeArgs),

    /// Manage learned counterparty preferences
    Prefs(prefs::PrefsArgs),

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

    // Execute command
    let config_path = cli.config.as_deref();
    let context = || Context::load(config_path, cli.data_dir.as_deref());
    match cli.command {
        Commands::Parse(args) => parse::run(args, &context()?).await,
        Commands::Scan(args) => scan::run(args, &context()?).await,
        Commands::Ledger(args) => ledger::run(args, &context()?).await,
        Commands::Recategorize(args) => recategorize::run(args, &context()?).await,
        Commands::Prefs(args) => prefs::run(args, &context()?).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
