//! CLI commands and the state they share.

pub mod config;
pub mod ledger;
pub mod parse;
pub mod prefs;
pub mod recategorize;
pub mod scan;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bento_core::models::config::BentoConfig;
use bento_core::{
    CategoryClassifier, JsonPreferenceStore, Ledger, Transaction, TransactionDraft,
};
use clap::ValueEnum;
use console::style;
use rust_decimal::Decimal;
use tracing::debug;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bento")
        .join("config.json")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bento")
}

/// Configuration and data locations resolved from global flags.
pub struct Context {
    pub config: BentoConfig,
}

impl Context {
    /// Load the explicit config file, else the default one if present, else
    /// defaults. `--data-dir` overrides the configured data directory.
    pub fn load(config_path: Option<&str>, data_dir: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => BentoConfig::from_file(Path::new(path))
                .with_context(|| format!("Failed to load config {}", path))?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    BentoConfig::from_file(&default_path)?
                } else {
                    BentoConfig::default()
                }
            }
        };

        if let Some(dir) = data_dir {
            config.storage.data_dir = Some(dir.to_path_buf());
        }
        debug!("Data directory: {}", config.data_dir(&default_data_dir()).display());

        Ok(Self { config })
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.config.ledger_path(&default_data_dir())
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.config.preferences_path(&default_data_dir())
    }

    pub fn load_ledger(&self) -> anyhow::Result<Ledger> {
        let path = self.ledger_path();
        Ledger::from_file(&path).with_context(|| format!("Failed to load ledger {}", path.display()))
    }

    pub fn save_ledger(&self, ledger: &Ledger) -> anyhow::Result<()> {
        ledger.save(&self.ledger_path())?;
        Ok(())
    }

    /// Classifier over the configured catalog and the persisted preferences.
    pub fn classifier(&self) -> anyhow::Result<CategoryClassifier<JsonPreferenceStore>> {
        let catalog = self.config.load_catalog()?;
        let store = JsonPreferenceStore::open(self.preferences_path())?;
        Ok(CategoryClassifier::with_store(catalog, store))
    }
}

const DRAFT_COLUMNS: [&str; 8] = [
    "date",
    "kind",
    "category",
    "amount",
    "note",
    "counterparty",
    "reference",
    "possible_duplicate",
];

fn draft_record(draft: &TransactionDraft) -> [String; 8] {
    [
        draft.date.to_string(),
        draft.kind.thai_label().to_string(),
        draft.category.clone(),
        draft.amount.to_string(),
        draft.note.clone(),
        draft.counterparty_name.clone().unwrap_or_default(),
        draft.reference_id.clone().unwrap_or_default(),
        draft.possible_duplicate.to_string(),
    ]
}

/// Render drafts in the requested format.
pub fn format_drafts(drafts: &[TransactionDraft], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(drafts)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(DRAFT_COLUMNS)?;
            for draft in drafts {
                wtr.write_record(draft_record(draft))?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(drafts
            .iter()
            .map(format_draft_text)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn format_draft_text(draft: &TransactionDraft) -> String {
    let amount = signed_amount(draft.amount, draft.kind == bento_core::TransactionKind::Income);
    let mut line = format!(
        "{}  {:>12}  {:<16}  {}",
        draft.date, amount, draft.category, draft.note
    );
    if let Some(reference) = &draft.reference_id {
        line.push_str(&format!("  (ref {})", reference));
    }
    if draft.possible_duplicate {
        line = style(line).yellow().to_string();
    } else if !draft.amount_found {
        line = style(line).red().to_string();
    }
    line
}

/// Render ledger transactions in the requested format.
pub fn format_transactions(
    transactions: &[Transaction],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(transactions)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["id", "date", "kind", "category", "amount", "note", "counterparty", "reference"])?;
            for tx in transactions {
                wtr.write_record([
                    tx.id.as_str(),
                    &tx.date.to_string(),
                    tx.kind.thai_label(),
                    &tx.category,
                    &tx.amount.to_string(),
                    &tx.note,
                    tx.counterparty_name.as_deref().unwrap_or(""),
                    tx.reference_id.as_deref().unwrap_or(""),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(transactions
            .iter()
            .map(|tx| {
                let amount =
                    signed_amount(tx.amount, tx.kind == bento_core::TransactionKind::Income);
                format!(
                    "{}  {}  {:>12}  {:<16}  {}",
                    style(&tx.id).dim(),
                    tx.date,
                    amount,
                    tx.category,
                    tx.note
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn signed_amount(amount: Decimal, income: bool) -> String {
    let formatted = bento_core::slip::rules::format_baht(amount);
    if income {
        format!("+{}", formatted)
    } else {
        format!("-{}", formatted)
    }
}
