//! Slip and statement extraction: OCR text in, transaction drafts out.

pub mod batch;
pub mod duplicates;
pub mod pipeline;
pub mod rules;
pub mod statement;

pub use batch::{BatchOutcome, BatchProgress, BatchScanner, ScanControl, ScanResult};
pub use duplicates::{mark_duplicate, DuplicateChecker, DUPLICATE_MARKER};
pub use pipeline::{SlipExtraction, SlipPipeline};
pub use statement::{classify_layout, simplify_brand, SlipLayout, StatementRow};
