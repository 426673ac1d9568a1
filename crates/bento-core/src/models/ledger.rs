//! Confirmed transactions with JSON file persistence.

use std::path::Path;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExtractionError, Result, StoreError};

use super::transaction::{Transaction, TransactionDraft, TransactionKind, INCOME_CATEGORY};

/// The ledger of confirmed transactions, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

/// Totals shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub balance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub count: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger from a JSON file. A missing file is an empty ledger.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No ledger at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(StoreError::from)?;
        serde_json::from_str(&content).map_err(|e| {
            StoreError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Save the ledger to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::from)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(StoreError::from)?;
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Most recent `n` transactions.
    pub fn recent(&self, n: usize) -> &[Transaction] {
        &self.transactions[..n.min(self.transactions.len())]
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Confirm a draft into the ledger and return the stored transaction.
    pub fn confirm(&mut self, draft: TransactionDraft) -> &Transaction {
        let id = self.next_id();
        self.transactions.insert(0, Transaction::from_draft(id, draft));
        &self.transactions[0]
    }

    /// Change a transaction's category, returning the transaction as it was
    /// before the edit.
    pub fn update_category(&mut self, id: &str, category: &str) -> Result<Transaction> {
        let tx = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if tx.kind == TransactionKind::Income && category != INCOME_CATEGORY {
            return Err(ExtractionError::Validation {
                field: "category".to_string(),
                reason: format!("income transactions always use {}", INCOME_CATEGORY),
            }
            .into());
        }
        if category.trim().is_empty() {
            return Err(ExtractionError::Validation {
                field: "category".to_string(),
                reason: "category must not be empty".to_string(),
            }
            .into());
        }

        let before = tx.clone();
        tx.category = category.trim().to_string();
        Ok(before)
    }

    pub fn summary(&self) -> LedgerSummary {
        let mut summary = LedgerSummary {
            count: self.transactions.len(),
            ..Default::default()
        };

        for tx in &self.transactions {
            match tx.kind {
                TransactionKind::Income => summary.total_income += tx.amount,
                TransactionKind::Expense => summary.total_expense += tx.amount,
            }
        }
        summary.balance = summary.total_income - summary.total_expense;

        summary
    }

    fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.find(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::ThaiDate;
    use pretty_assertions::assert_eq;

    fn draft(amount: i64, kind: TransactionKind, category: &str) -> TransactionDraft {
        TransactionDraft::new(
            Decimal::from(amount),
            kind,
            category,
            ThaiDate::from_buddhist(1, 1, 2569).unwrap(),
            "note",
        )
    }

    #[test]
    fn test_confirm_prepends_with_unique_ids() {
        let mut ledger = Ledger::new();
        let first = ledger.confirm(draft(60, TransactionKind::Expense, "อาหาร")).id.clone();
        let second = ledger.confirm(draft(40, TransactionKind::Expense, "อาหาร")).id.clone();

        assert_ne!(first, second);
        assert_eq!(ledger.transactions()[0].id, second);
        assert_eq!(ledger.recent(1).len(), 1);
        assert_eq!(ledger.recent(10).len(), 2);
    }

    #[test]
    fn test_summary() {
        let mut ledger = Ledger::new();
        ledger.confirm(draft(20000, TransactionKind::Income, ""));
        ledger.confirm(draft(60, TransactionKind::Expense, "อาหาร"));
        ledger.confirm(draft(940, TransactionKind::Expense, "เดินทาง"));

        let summary = ledger.summary();
        assert_eq!(summary.total_income, Decimal::from(20000));
        assert_eq!(summary.total_expense, Decimal::from(1000));
        assert_eq!(summary.balance, Decimal::from(19000));
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_update_category_rejects_income_change() {
        let mut ledger = Ledger::new();
        let id = ledger.confirm(draft(500, TransactionKind::Income, "")).id.clone();
        assert!(ledger.update_category(&id, "อาหาร").is_err());
        assert!(ledger.update_category("missing", "อาหาร").is_err());
    }

    #[test]
    fn test_update_category_returns_previous() {
        let mut ledger = Ledger::new();
        let id = ledger.confirm(draft(80, TransactionKind::Expense, "อาหาร")).id.clone();
        let before = ledger.update_category(&id, "บันเทิง").unwrap();
        assert_eq!(before.category, "อาหาร");
        assert_eq!(ledger.find(&id).unwrap().category, "บันเทิง");
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");

        assert!(Ledger::from_file(&path).unwrap().is_empty());

        let mut ledger = Ledger::new();
        ledger.confirm(draft(60, TransactionKind::Expense, "อาหาร"));
        ledger.save(&path).unwrap();

        let loaded = Ledger::from_file(&path).unwrap();
        assert_eq!(loaded.transactions(), ledger.transactions());
    }
}
