//! Sequential batch scanning of slip images.

use serde::Serialize;
use tracing::{info, warn};

use crate::classify::{PreferenceMap, PreferenceStore};
use crate::models::transaction::{Transaction, TransactionDraft};
use crate::ocr::{SlipImage, SlipRecognizer};

use super::duplicates::DuplicateChecker;
use super::pipeline::SlipPipeline;
use super::rules::Bank;
use super::statement::SlipLayout;

/// Progress report sent before each image is recognized.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// One-based position of the image about to be scanned.
    pub index: usize,
    pub total: usize,
    pub name: &'a str,
}

/// Caller's answer to a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    Continue,
    /// Stop before the next image; results so far are kept.
    Abandon,
}

/// Outcome for one image.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub name: String,
    pub drafts: Vec<TransactionDraft>,
    pub layout: SlipLayout,
    pub bank: Option<Bank>,
    /// Recognition failure, when the drafts are an error placeholder.
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

/// Outcome for a whole batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<ScanResult>,
    /// Set when the caller stopped the batch early.
    pub abandoned: bool,
}

impl BatchOutcome {
    /// Every draft, in input order.
    pub fn drafts(&self) -> impl Iterator<Item = &TransactionDraft> {
        self.results.iter().flat_map(|r| r.drafts.iter())
    }

    pub fn into_drafts(self) -> Vec<TransactionDraft> {
        self.results.into_iter().flat_map(|r| r.drafts).collect()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.error.is_some()).count()
    }

    pub fn duplicates(&self) -> usize {
        self.drafts().filter(|d| d.possible_duplicate).count()
    }
}

/// Recognizes and extracts a batch of images one at a time.
pub struct BatchScanner<'c, R, S = PreferenceMap> {
    recognizer: R,
    pipeline: SlipPipeline<'c, S>,
}

impl<'c, R: SlipRecognizer, S: PreferenceStore> BatchScanner<'c, R, S> {
    pub fn new(recognizer: R, pipeline: SlipPipeline<'c, S>) -> Self {
        Self {
            recognizer,
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &SlipPipeline<'c, S> {
        &self.pipeline
    }

    /// Scan `images` in order.
    ///
    /// A recognition failure becomes a zero-amount error draft for that
    /// image and the loop continues. Drafts are checked for duplicates
    /// against the ledger and against drafts from earlier images.
    pub async fn scan<F>(
        &self,
        images: &[SlipImage],
        ledger: &[Transaction],
        mut progress: F,
    ) -> BatchOutcome
    where
        F: FnMut(BatchProgress<'_>) -> ScanControl,
    {
        let total = images.len();
        let check_duplicates = self.pipeline.config().check_duplicates;
        let mut checker = DuplicateChecker::new(ledger);
        let mut outcome = BatchOutcome::default();

        info!("Scanning batch of {} image(s)", total);

        for (i, image) in images.iter().enumerate() {
            let slip_number = i + 1;
            let report = BatchProgress {
                index: slip_number,
                total,
                name: &image.name,
            };
            if progress(report) == ScanControl::Abandon {
                info!("Batch abandoned before image {} of {}", slip_number, total);
                outcome.abandoned = true;
                break;
            }

            let result = match self.recognizer.recognize(image).await {
                Ok(text) => {
                    let mut extraction = self.pipeline.extract_drafts(&text, slip_number);
                    if check_duplicates {
                        let flagged = checker.flag(&mut extraction.drafts);
                        if flagged > 0 {
                            extraction
                                .warnings
                                .push(format!("{} draft(s) may be duplicates", flagged));
                        }
                        checker.remember(&extraction.drafts);
                    }
                    ScanResult {
                        name: image.name.clone(),
                        drafts: extraction.drafts,
                        layout: extraction.layout,
                        bank: extraction.bank,
                        error: None,
                        warnings: extraction.warnings,
                    }
                }
                Err(e) => {
                    warn!("Recognition failed for {} (#{}): {}", image.name, slip_number, e);
                    let reason = e.to_string();
                    ScanResult {
                        name: image.name.clone(),
                        drafts: vec![TransactionDraft::error_placeholder(
                            slip_number,
                            &reason,
                            self.pipeline.today(),
                        )],
                        layout: SlipLayout::Single,
                        bank: None,
                        error: Some(reason),
                        warnings: Vec::new(),
                    }
                }
            };
            outcome.results.push(result);
        }

        info!(
            "Batch finished: {} draft(s), {} failure(s)",
            outcome.drafts().count(),
            outcome.failed()
        );
        outcome
    }
}
