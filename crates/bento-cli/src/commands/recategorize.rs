//! Recategorize command - change a transaction's category and learn from it.

use clap::Args;
use console::style;
use tracing::info;

use super::Context;

/// Arguments for the recategorize command.
#[derive(Args)]
pub struct RecategorizeArgs {
    /// Transaction id, as shown by `bento ledger list`
    id: String,

    /// New category label
    category: String,
}

pub async fn run(args: RecategorizeArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut classifier = ctx.classifier()?;
    if !classifier.catalog().contains(&args.category) {
        anyhow::bail!(
            "Unknown category {}. Known categories: {}",
            args.category,
            classifier.catalog().labels().join(", ")
        );
    }

    let mut ledger = ctx.load_ledger()?;
    let before = ledger.update_category(&args.id, &args.category)?;
    ctx.save_ledger(&ledger)?;

    println!(
        "{} {} : {} -> {}",
        style("✓").green(),
        args.id,
        before.category,
        args.category
    );

    match classifier.learner_mut().learn_from_edit(&before, &args.category)? {
        Some(counterparty) => {
            info!("Preference stored for {}", counterparty);
            println!(
                "{} Future payments to {} will be filed under {}",
                style("ℹ").blue(),
                counterparty,
                args.category
            );
        }
        None => info!("Nothing learned from edit of {}", args.id),
    }

    Ok(())
}
