//! Rule-based field extractors for Thai payment slips and statements.

pub mod amounts;
pub mod bank;
pub mod dates;
pub mod patterns;
pub mod receiver;
pub mod reference;

pub use amounts::{
    format_baht, parse_baht_amount, AmountCandidate, AmountExtractor, AmountStrategy, AmountTier,
};
pub use bank::{Bank, BankDetector};
pub use dates::{to_buddhist_year, DateExtractor};
pub use receiver::{clean_name, ReceiverExtractor};
pub use reference::ReferenceExtractor;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the best occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, best first.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte span in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
