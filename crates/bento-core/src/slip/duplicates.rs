//! Duplicate suppression against the ledger and earlier drafts.
//!
//! Duplicates are flagged, never dropped: the draft gets
//! `possible_duplicate` and a marker in front of its note.

use tracing::debug;

use crate::models::transaction::{DuplicateKey, Transaction, TransactionDraft};

/// Prefix added to the note of a probable duplicate.
pub const DUPLICATE_MARKER: &str = "⚠️ อาจซ้ำ: ";

/// Known transactions a new draft is compared against.
#[derive(Debug, Clone, Default)]
pub struct DuplicateChecker {
    known: Vec<DuplicateKey>,
}

impl DuplicateChecker {
    pub fn new(ledger: &[Transaction]) -> Self {
        Self {
            known: ledger.iter().map(Transaction::duplicate_key).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Whether `draft` matches any known transaction.
    ///
    /// Drafts without a located amount are never duplicates.
    pub fn is_duplicate(&self, draft: &TransactionDraft) -> bool {
        if !draft.amount_found {
            return false;
        }
        let key = draft.duplicate_key();
        self.known.iter().any(|known| known.matches(&key))
    }

    /// Flag every matching draft; returns how many were flagged.
    pub fn flag(&self, drafts: &mut [TransactionDraft]) -> usize {
        let mut flagged = 0;
        for draft in drafts.iter_mut() {
            if self.is_duplicate(draft) {
                mark_duplicate(draft);
                flagged += 1;
            }
        }
        if flagged > 0 {
            debug!("Flagged {} possible duplicate(s)", flagged);
        }
        flagged
    }

    /// Compare later drafts against these as well.
    pub fn remember(&mut self, drafts: &[TransactionDraft]) {
        self.known.extend(
            drafts
                .iter()
                .filter(|d| d.amount_found)
                .map(TransactionDraft::duplicate_key),
        );
    }
}

/// Mark a draft as a probable duplicate. Marking twice is a no-op.
pub fn mark_duplicate(draft: &mut TransactionDraft) {
    draft.possible_duplicate = true;
    if !draft.note.starts_with(DUPLICATE_MARKER) {
        draft.note = format!("{}{}", DUPLICATE_MARKER, draft.note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{ThaiDate, TransactionKind};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn draft(amount: i64, day: u32, category: &str, reference: Option<&str>) -> TransactionDraft {
        TransactionDraft::new(
            Decimal::from(amount),
            TransactionKind::Expense,
            category,
            ThaiDate::from_buddhist(day, 1, 2567).unwrap(),
            "ร้านข้าวมันไก่",
        )
        .with_reference(reference.map(str::to_string))
    }

    fn ledger(drafts: Vec<TransactionDraft>) -> Vec<Transaction> {
        drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| Transaction::from_draft(i.to_string(), d))
            .collect()
    }

    #[test]
    fn test_same_reference_is_duplicate_despite_amount() {
        let checker = DuplicateChecker::new(&ledger(vec![draft(60, 12, "อาหาร", Some("REF1234567890"))]));
        let mut drafts = vec![draft(600, 12, "อาหาร", Some("REF1234567890"))];

        assert_eq!(checker.flag(&mut drafts), 1);
        assert!(drafts[0].possible_duplicate);
        assert_eq!(drafts[0].note, "⚠️ อาจซ้ำ: ร้านข้าวมันไก่");
    }

    #[test]
    fn test_different_references_are_distinct() {
        let checker = DuplicateChecker::new(&ledger(vec![draft(60, 12, "อาหาร", Some("REF1234567890"))]));
        assert!(!checker.is_duplicate(&draft(60, 12, "อาหาร", Some("REF0000000001"))));
    }

    #[test]
    fn test_amount_date_category_match() {
        let checker = DuplicateChecker::new(&ledger(vec![draft(60, 12, "อาหาร", None)]));

        assert!(checker.is_duplicate(&draft(60, 12, "อาหาร", None)));
        assert!(checker.is_duplicate(&draft(60, 12, "อาหาร", Some("REF1234567890"))));
        assert!(!checker.is_duplicate(&draft(61, 12, "อาหาร", None)));
        assert!(!checker.is_duplicate(&draft(60, 13, "อาหาร", None)));
        assert!(!checker.is_duplicate(&draft(60, 12, "เดินทาง", None)));
    }

    #[test]
    fn test_remembered_drafts_are_compared() {
        let mut checker = DuplicateChecker::new(&[]);
        checker.remember(&[draft(60, 12, "อาหาร", None)]);

        let mut drafts = vec![draft(60, 12, "อาหาร", None), draft(70, 12, "อาหาร", None)];
        assert_eq!(checker.flag(&mut drafts), 1);
        assert!(drafts[0].possible_duplicate);
        assert!(!drafts[1].possible_duplicate);
    }

    #[test]
    fn test_drafts_without_amount_are_never_duplicates() {
        let mut missing = draft(0, 12, "other", None);
        missing.amount_found = false;

        let mut checker = DuplicateChecker::new(&[]);
        checker.remember(std::slice::from_ref(&missing));
        assert!(checker.is_empty());
        assert!(!checker.is_duplicate(&missing));
    }

    #[test]
    fn test_mark_duplicate_is_idempotent() {
        let mut d = draft(60, 12, "อาหาร", None);
        mark_duplicate(&mut d);
        mark_duplicate(&mut d);
        assert_eq!(d.note, "⚠️ อาจซ้ำ: ร้านข้าวมันไก่");
    }
}
