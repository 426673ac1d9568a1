//! Ledger command - review confirmed transactions.

use clap::{Args, Subcommand};
use console::style;

use bento_core::slip::rules::format_baht;

use super::{format_transactions, Context, OutputFormat};

/// Arguments for the ledger command.
#[derive(Args)]
pub struct LedgerArgs {
    #[command(subcommand)]
    command: LedgerCommand,
}

#[derive(Subcommand)]
enum LedgerCommand {
    /// List transactions, newest first
    List {
        /// Maximum number of transactions to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show balance and totals
    Summary,
}

pub async fn run(args: LedgerArgs, ctx: &Context) -> anyhow::Result<()> {
    let ledger = ctx.load_ledger()?;

    match args.command {
        LedgerCommand::List { limit, format } => {
            if ledger.is_empty() && format == OutputFormat::Text {
                println!("{} The ledger is empty.", style("ℹ").blue());
                return Ok(());
            }
            println!("{}", format_transactions(ledger.recent(limit), format)?);
        }
        LedgerCommand::Summary => {
            let summary = ledger.summary();
            println!("Transactions: {}", summary.count);
            println!(
                "Income:       {}",
                style(format!("+{} บาท", format_baht(summary.total_income))).green()
            );
            println!(
                "Expense:      {}",
                style(format!("-{} บาท", format_baht(summary.total_expense))).red()
            );
            println!("Balance:      {} บาท", format_baht(summary.balance));
        }
    }

    Ok(())
}
