//! Transaction drafts, confirmed transactions and the canonical Thai date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ExtractionError;

/// Category every income transaction carries.
pub const INCOME_CATEGORY: &str = "income";

/// Catch-all category when nothing else scores.
pub const OTHER_CATEGORY: &str = "other";

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    #[default]
    Expense,
}

impl TransactionKind {
    /// Thai label used in notes and messages.
    pub fn thai_label(&self) -> &'static str {
        match self {
            Self::Income => "รายรับ",
            Self::Expense => "รายจ่าย",
        }
    }
}

/// A calendar date rendered in the Buddhist era as `DD/MM/YYYY`.
///
/// The value is held as a Gregorian [`NaiveDate`]; only rendering, parsing and
/// serialization use the Buddhist year (Gregorian + 543).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThaiDate(NaiveDate);

impl ThaiDate {
    /// Offset between Buddhist-era and Gregorian years.
    pub const ERA_OFFSET: i32 = 543;

    pub fn from_gregorian(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from a day, month and Buddhist-era year. Returns `None` for
    /// dates that do not exist.
    pub fn from_buddhist(day: u32, month: u32, buddhist_year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(buddhist_year - Self::ERA_OFFSET, month, day).map(Self)
    }

    /// Today's date on the local clock.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn buddhist_year(&self) -> i32 {
        self.0.year() + Self::ERA_OFFSET
    }
}

impl fmt::Display for ThaiDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04}",
            self.0.day(),
            self.0.month(),
            self.buddhist_year()
        )
    }
}

impl FromStr for ThaiDate {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || ExtractionError::Parse {
            field: "date".to_string(),
            value: s.to_string(),
        };

        let mut parts = s.trim().split('/');
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(parse_error());
        };

        let day: u32 = day.parse().map_err(|_| parse_error())?;
        let month: u32 = month.parse().map_err(|_| parse_error())?;
        let year: i32 = year.parse().map_err(|_| parse_error())?;

        Self::from_buddhist(day, month, year).ok_or_else(parse_error)
    }
}

impl Serialize for ThaiDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ThaiDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A transaction inferred from chat text or a slip, awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Non-negative amount in baht.
    pub amount: Decimal,

    pub kind: TransactionKind,

    /// Category label; always [`INCOME_CATEGORY`] for income.
    pub category: String,

    pub date: ThaiDate,

    /// Description shown to the user. Never empty.
    pub note: String,

    /// External reference number, used for duplicate detection only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,

    /// Merchant or receiver name; key into learned preferences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_name: Option<String>,

    /// Set when the draft probably repeats a known transaction.
    #[serde(default)]
    pub possible_duplicate: bool,

    /// False when no amount could be located in the source text.
    #[serde(default = "default_true")]
    pub amount_found: bool,
}

fn default_true() -> bool {
    true
}

impl TransactionDraft {
    /// Create a draft, forcing the income category for income.
    pub fn new(
        amount: Decimal,
        kind: TransactionKind,
        category: impl Into<String>,
        date: ThaiDate,
        note: impl Into<String>,
    ) -> Self {
        let category = match kind {
            TransactionKind::Income => INCOME_CATEGORY.to_string(),
            TransactionKind::Expense => category.into(),
        };

        Self {
            amount: amount.max(Decimal::ZERO),
            kind,
            category,
            date,
            note: note.into(),
            reference_id: None,
            counterparty_name: None,
            possible_duplicate: false,
            amount_found: true,
        }
    }

    pub fn with_reference(mut self, reference_id: Option<String>) -> Self {
        self.reference_id = reference_id.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn with_counterparty(mut self, counterparty: Option<String>) -> Self {
        self.counterparty_name = counterparty.filter(|c| !c.trim().is_empty());
        self
    }

    /// Zero-amount placeholder for a slip whose recognition failed.
    pub fn error_placeholder(slip_number: usize, reason: &str, date: ThaiDate) -> Self {
        let mut draft = Self::new(
            Decimal::ZERO,
            TransactionKind::Expense,
            OTHER_CATEGORY,
            date,
            format!("❌ อ่านสลิป #{} ไม่สำเร็จ: {}", slip_number, reason),
        );
        draft.amount_found = false;
        draft
    }

    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            amount: self.amount,
            date: self.date,
            category: self.category.clone(),
            reference_id: self.reference_id.clone(),
        }
    }

    /// Check the draft invariants, returning human-readable issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.amount < Decimal::ZERO {
            issues.push(format!("Negative amount: {}", self.amount));
        }
        if self.category.trim().is_empty() {
            issues.push("Missing category".to_string());
        }
        if self.note.trim().is_empty() {
            issues.push("Missing note".to_string());
        }
        if self.kind == TransactionKind::Income && self.category != INCOME_CATEGORY {
            issues.push(format!(
                "Income transaction has category {} instead of {}",
                self.category, INCOME_CATEGORY
            ));
        }

        issues
    }
}

/// A confirmed ledger transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub date: ThaiDate,
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_name: Option<String>,
}

impl Transaction {
    pub fn from_draft(id: impl Into<String>, draft: TransactionDraft) -> Self {
        Self {
            id: id.into(),
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            date: draft.date,
            note: draft.note,
            reference_id: draft.reference_id,
            counterparty_name: draft.counterparty_name,
        }
    }

    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            amount: self.amount,
            date: self.date,
            category: self.category.clone(),
            reference_id: self.reference_id.clone(),
        }
    }
}

/// The fields duplicate detection compares.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateKey {
    pub amount: Decimal,
    pub date: ThaiDate,
    pub category: String,
    pub reference_id: Option<String>,
}

impl DuplicateKey {
    /// Same reference when both carry one; otherwise same amount, date and
    /// category.
    pub fn matches(&self, other: &DuplicateKey) -> bool {
        match (non_empty(&self.reference_id), non_empty(&other.reference_id)) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.amount == other.amount
                    && self.date == other.date
                    && self.category == other.category
            }
        }
    }
}

fn non_empty(reference: &Option<String>) -> Option<&str> {
    reference.as_deref().map(str::trim).filter(|r| !r.is_empty())
}
