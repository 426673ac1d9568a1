//! Prefs command - inspect and edit learned counterparty preferences.

use clap::{Args, Subcommand};
use console::style;

use super::Context;

/// Arguments for the prefs command.
#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    command: PrefsCommand,
}

#[derive(Subcommand)]
enum PrefsCommand {
    /// List learned counterparty -> category mappings
    List,

    /// Map a counterparty to a category
    Set {
        /// Counterparty name as it appears on slips
        counterparty: String,
        /// Category label
        category: String,
    },
}

pub async fn run(args: PrefsArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut classifier = ctx.classifier()?;

    match args.command {
        PrefsCommand::List => {
            let entries = classifier.learner().entries();
            if entries.is_empty() {
                println!("{} No preferences learned yet.", style("ℹ").blue());
            }
            for (counterparty, category) in entries {
                println!("{}\t{}", counterparty, category);
            }
        }
        PrefsCommand::Set {
            counterparty,
            category,
        } => {
            if !classifier.catalog().contains(&category) {
                anyhow::bail!("Unknown category: {}", category);
            }
            if !classifier.learner_mut().record(&counterparty, &category)? {
                anyhow::bail!("Counterparty name too short: {:?}", counterparty);
            }
            println!(
                "{} {} -> {}",
                style("✓").green(),
                counterparty.trim(),
                category
            );
        }
    }

    Ok(())
}
