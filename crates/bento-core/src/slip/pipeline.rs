//! OCR text to transaction drafts.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::classify::{CategoryClassifier, PreferenceMap, PreferenceStore};
use crate::models::config::ExtractionConfig;
use crate::models::transaction::{ThaiDate, Transaction, TransactionDraft, TransactionKind};

use super::duplicates::DuplicateChecker;
use super::rules::patterns::{LOTTERY_PHRASE, TRANSFER_PHRASE};
use super::rules::{
    clean_name, AmountExtractor, Bank, BankDetector, DateExtractor, FieldExtractor,
    ReceiverExtractor, ReferenceExtractor,
};
use super::statement::{classify_layout, simplify_brand, SlipLayout, StatementRow};

const LOTTERY_NOTE: &str = "ซื้อสลากกินแบ่ง";
const TRANSFER_NOTE: &str = "โอนเงิน";
const AMOUNT_NOT_FOUND: &str = " (ไม่พบยอดเงิน)";

/// Drafts extracted from one OCR text.
#[derive(Debug, Clone, Serialize)]
pub struct SlipExtraction {
    pub drafts: Vec<TransactionDraft>,
    pub layout: SlipLayout,
    /// Issuing bank, single slips only.
    pub bank: Option<Bank>,
    pub warnings: Vec<String>,
    pub processing_time_ms: u64,
}

/// Extracts transaction drafts from OCR text.
///
/// The pipeline never writes to the ledger; it only reads it for duplicate
/// checks.
#[derive(Debug, Clone)]
pub struct SlipPipeline<'c, S = PreferenceMap> {
    classifier: &'c CategoryClassifier<S>,
    config: ExtractionConfig,
    today: Option<ThaiDate>,
}

impl<'c, S: PreferenceStore> SlipPipeline<'c, S> {
    pub fn new(classifier: &'c CategoryClassifier<S>) -> Self {
        Self {
            classifier,
            config: ExtractionConfig::default(),
            today: None,
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the fallback date instead of reading the clock.
    pub fn with_today(mut self, today: ThaiDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn today(&self) -> ThaiDate {
        self.today.unwrap_or_else(ThaiDate::today)
    }

    /// Structural probe choosing between statement and single-slip mode.
    pub fn probe(&self, text: &str) -> SlipLayout {
        if self.config.detect_statements {
            classify_layout(text)
        } else {
            SlipLayout::Single
        }
    }

    /// Extract drafts from slip #1 and flag ledger duplicates.
    pub fn extract(&self, text: &str, ledger: &[Transaction]) -> SlipExtraction {
        self.extract_numbered(text, 1, ledger)
    }

    /// Extract drafts from slip `slip_number` and flag ledger duplicates.
    pub fn extract_numbered(
        &self,
        text: &str,
        slip_number: usize,
        ledger: &[Transaction],
    ) -> SlipExtraction {
        let mut extraction = self.extract_drafts(text, slip_number);
        if self.config.check_duplicates {
            let flagged = DuplicateChecker::new(ledger).flag(&mut extraction.drafts);
            if flagged > 0 {
                extraction
                    .warnings
                    .push(format!("{} draft(s) may duplicate ledger entries", flagged));
            }
        }
        extraction
    }

    /// Extract drafts without any duplicate check.
    pub fn extract_drafts(&self, text: &str, slip_number: usize) -> SlipExtraction {
        // Wall clock; Instant is unavailable on wasm32
        let start = Utc::now();
        info!("Extracting slip #{} from {} characters of text", slip_number, text.len());

        let layout = self.probe(text);
        let (drafts, bank, warnings) = match &layout {
            SlipLayout::Statement(rows) => {
                debug!("Statement layout with {} rows", rows.len());
                (self.statement_drafts(text, rows), None, Vec::new())
            }
            SlipLayout::Single => self.single_draft(text, slip_number),
        };

        info!("Slip #{} produced {} draft(s)", slip_number, drafts.len());
        SlipExtraction {
            drafts,
            layout,
            bank,
            warnings,
            processing_time_ms: (Utc::now() - start).num_milliseconds().max(0) as u64,
        }
    }

    fn statement_drafts(&self, text: &str, rows: &[StatementRow]) -> Vec<TransactionDraft> {
        let date = self.date_or_today(text);
        rows.iter()
            .map(|row| {
                let category = self.classifier.classify(
                    &row.description,
                    TransactionKind::Expense,
                    Some(&row.description),
                );
                TransactionDraft::new(
                    row.amount,
                    TransactionKind::Expense,
                    category,
                    date,
                    simplify_brand(&row.description),
                )
                .with_counterparty(Some(clean_name(&row.description)))
            })
            .collect()
    }

    fn single_draft(
        &self,
        text: &str,
        slip_number: usize,
    ) -> (Vec<TransactionDraft>, Option<Bank>, Vec<String>) {
        let mut warnings = Vec::new();

        let bank = BankDetector::new().detect(text);
        let amount = AmountExtractor::new()
            .with_small_value_threshold(self.config.small_amount_threshold)
            .with_bank(bank)
            .extract(text)
            .map(|m| m.value);
        let receiver = ReceiverExtractor::new().extract(text).map(|m| m.value);
        let reference = ReferenceExtractor::new().extract(text).map(|m| m.value);
        let date = self.date_or_today(text);

        debug!(
            "Slip #{}: bank={:?} amount={:?} receiver={:?} reference={:?}",
            slip_number, bank, amount, receiver, reference
        );

        let category = self
            .classifier
            .classify(text, TransactionKind::Expense, receiver.as_deref());

        let mut note = match &receiver {
            Some(name) => name.clone(),
            None if LOTTERY_PHRASE.is_match(text) => LOTTERY_NOTE.to_string(),
            None if TRANSFER_PHRASE.is_match(text) => TRANSFER_NOTE.to_string(),
            None => format!("สแกนจากสลิป #{}", slip_number),
        };
        if amount.is_none() {
            note.push_str(AMOUNT_NOT_FOUND);
            warnings.push(format!("Could not find an amount on slip #{}", slip_number));
        }

        let mut draft = TransactionDraft::new(
            amount.unwrap_or(Decimal::ZERO),
            TransactionKind::Expense,
            category,
            date,
            note,
        )
        .with_reference(reference)
        .with_counterparty(receiver);
        draft.amount_found = amount.is_some();

        (vec![draft], bank, warnings)
    }

    fn date_or_today(&self, text: &str) -> ThaiDate {
        DateExtractor::new()
            .extract(text)
            .map(|m| m.value)
            .unwrap_or_else(|| self.today())
    }
}
