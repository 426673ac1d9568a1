//! Scan command - extract drafts from payment slips and statements.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use bento_core::slip::ScanResult;
use bento_core::{BatchScanner, ScanControl, SlipImage, SlipPipeline};

use super::{format_drafts, Context, OutputFormat};
use crate::recognizer::CliRecognizer;

const SUPPORTED_EXTENSIONS: [&str; 8] = ["txt", "png", "jpg", "jpeg", "webp", "tiff", "tif", "bmp"];

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Slip files or glob patterns (images, or .txt with recognized text)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Confirm drafts with a detected amount into the ledger
    #[arg(long)]
    save: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also write a per-file summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub async fn run(args: ScanArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.inputs.join(" "));
    }
    eprintln!(
        "{} Found {} file(s) to scan",
        style("ℹ").blue(),
        files.len()
    );

    let images: Vec<SlipImage> = files.iter().map(|p| SlipImage::from_path(p)).collect();

    let classifier = ctx.classifier()?;
    let mut ledger = ctx.load_ledger()?;
    let pipeline = SlipPipeline::new(&classifier).with_config(ctx.config.extraction.clone());
    let scanner = BatchScanner::new(CliRecognizer::new(ctx.config.ocr.clone()), pipeline);

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let outcome = scanner
        .scan(&images, ledger.transactions(), |progress| {
            pb.set_position(progress.index as u64 - 1);
            pb.set_message(progress.name.to_string());
            ScanControl::Continue
        })
        .await;
    pb.finish_and_clear();

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &outcome.results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    for result in &outcome.results {
        for warning in &result.warnings {
            warn!("{}: {}", result.name, warning);
        }
    }

    let failed = outcome.failed();
    let duplicates = outcome.duplicates();
    let drafts = outcome.into_drafts();
    println!("{}", format_drafts(&drafts, args.format)?);

    if args.save {
        let mut saved = 0;
        for draft in drafts.iter().filter(|d| d.amount_found) {
            let issues = draft.validate();
            if !issues.is_empty() {
                debug!("Skipping draft {:?}: {}", draft.note, issues.join(", "));
                continue;
            }
            ledger.confirm(draft.clone());
            saved += 1;
        }
        ctx.save_ledger(&ledger)?;
        info!("Saved {} draft(s) to {}", saved, ctx.ledger_path().display());
        eprintln!(
            "{} Saved {} transaction(s) to the ledger",
            style("✓").green(),
            saved
        );
    }

    eprintln!();
    eprintln!(
        "{} Scanned {} file(s) in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} draft(s), {} possible duplicate(s), {} failed",
        style(drafts.len()).green(),
        style(duplicates).yellow(),
        style(failed).red()
    );

    Ok(())
}

/// Expand literal paths and glob patterns into supported files, in order.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let literal = Path::new(input);
        if literal.is_file() {
            files.push(literal.to_path_buf());
            continue;
        }
        let mut matched: Vec<PathBuf> = glob(input)
            .with_context(|| format!("Invalid glob pattern: {}", input))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        matched.sort();
        files.extend(matched);
    }
    files.retain(|p| is_supported(p));

    let mut seen = HashSet::new();
    files.retain(|p| seen.insert(p.clone()));
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

fn write_summary(path: &Path, results: &[ScanResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "layout",
        "bank",
        "drafts",
        "total_amount",
        "duplicates",
        "error",
    ])?;

    for result in results {
        let total: rust_decimal::Decimal = result.drafts.iter().map(|d| d.amount).sum();
        let layout = if result.layout.is_statement() {
            "statement"
        } else {
            "single"
        };
        wtr.write_record([
            result.name.as_str(),
            if result.error.is_some() { "error" } else { "success" },
            layout,
            result.bank.map(|b| b.display_name()).unwrap_or(""),
            &result.drafts.len().to_string(),
            &total.to_string(),
            &result
                .drafts
                .iter()
                .filter(|d| d.possible_duplicate)
                .count()
                .to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("slip.JPG")));
        assert!(is_supported(Path::new("slip.txt")));
        assert!(!is_supported(Path::new("invoice.pdf")));
        assert!(!is_supported(Path::new("README")));
    }

    #[test]
    fn test_expand_inputs_skips_directories_and_repeats() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("b.txt")).unwrap();
        std::fs::write(dir.path().join("c.txt"), "c").unwrap();

        let a = dir.path().join("a.txt").display().to_string();
        let pattern = dir.path().join("*.txt").display().to_string();
        let files = expand_inputs(&[a, pattern]).unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("a.txt"), dir.path().join("c.txt")]
        );
    }
}
