//! Core library for Thai transaction inference.
//!
//! This crate provides:
//! - Natural-language chat parsing ("ก๋วยเตี๋ยว 50 บาท" to a draft)
//! - Keyword category classification with learned counterparty overrides
//! - Field extraction from OCR'd payment slips and statements
//!   (amount, Buddhist-era date, receiver, reference, bank)
//! - Duplicate flagging and sequential batch scanning
//! - Ledger, preference and configuration models with JSON persistence

pub mod chat;
pub mod classify;
pub mod error;
pub mod models;
pub mod ocr;
pub mod slip;

pub use chat::{confirmation_message, NaturalLanguageParser, NOT_UNDERSTOOD_MESSAGE};
pub use classify::{
    CategoryCatalog, CategoryClassifier, CategoryRule, JsonPreferenceStore, PreferenceLearner,
    PreferenceMap, PreferenceStore,
};
pub use error::{BentoError, ExtractionError, OcrError, Result, StoreError};
pub use models::config::BentoConfig;
pub use models::ledger::{Ledger, LedgerSummary};
pub use models::transaction::{
    DuplicateKey, ThaiDate, Transaction, TransactionDraft, TransactionKind, INCOME_CATEGORY,
    OTHER_CATEGORY,
};
pub use ocr::{PlainTextRecognizer, SlipImage, SlipRecognizer};
pub use slip::{
    BatchOutcome, BatchProgress, BatchScanner, ScanControl, SlipExtraction, SlipLayout,
    SlipPipeline,
};
