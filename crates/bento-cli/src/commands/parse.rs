//! Parse command - turn a chat line into a transaction draft.

use clap::Args;
use console::style;
use tracing::info;

use bento_core::{confirmation_message, NaturalLanguageParser, NOT_UNDERSTOOD_MESSAGE};

use super::{format_drafts, Context, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Chat text, e.g. "ก๋วยเตี๋ยว 50 บาท"
    #[arg(required = true)]
    text: Vec<String>,

    /// Confirm the draft into the ledger
    #[arg(long)]
    save: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ParseArgs, ctx: &Context) -> anyhow::Result<()> {
    let text = args.text.join(" ");
    let classifier = ctx.classifier()?;
    let parser = NaturalLanguageParser::new(&classifier);

    let Some(draft) = parser.parse(&text) else {
        println!("{}", NOT_UNDERSTOOD_MESSAGE);
        return Ok(());
    };
    info!("Parsed {:?} into category {}", text, draft.category);

    println!("{}", format_drafts(std::slice::from_ref(&draft), args.format)?);

    if args.save {
        let mut ledger = ctx.load_ledger()?;
        let message = confirmation_message(&draft);
        let id = ledger.confirm(draft).id.clone();
        ctx.save_ledger(&ledger)?;

        eprintln!("{} {}", style("✓").green(), message);
        eprintln!("   id: {}", style(id).dim());
    }

    Ok(())
}
