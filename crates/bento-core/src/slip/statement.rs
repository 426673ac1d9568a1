//! Structural probe: single slip or multi-row statement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rules::patterns::{CLOCK_TIME, DATE_DAY_MONTH, STATEMENT_ROW, SUMMARY_LABEL};
use super::rules::{clean_name, parse_baht_amount};

/// Rows needed before a text counts as a statement.
pub const MIN_STATEMENT_ROWS: usize = 2;

/// (needle, canonical brand) pairs, checked in order. Latin needles must not
/// touch other Latin letters or digits.
const BRANDS: &[(&str, &str)] = &[
    ("ptt", "PTT Station"),
    ("ปตท", "PTT Station"),
    ("shell", "Shell"),
    ("เชลล์", "Shell"),
    ("bangchak", "Bangchak"),
    ("บางจาก", "Bangchak"),
    ("caltex", "Caltex"),
    ("esso", "Esso"),
    ("7-eleven", "7-Eleven"),
    ("7-11", "7-Eleven"),
    ("7eleven", "7-Eleven"),
    ("เซเว่น", "7-Eleven"),
    ("lotus", "Lotus's"),
    ("โลตัส", "Lotus's"),
    ("big c", "Big C"),
    ("bigc", "Big C"),
    ("บิ๊กซี", "Big C"),
    ("makro", "Makro"),
    ("แม็คโคร", "Makro"),
    ("grabfood", "GrabFood"),
    ("grab food", "GrabFood"),
    ("grab", "Grab"),
    ("lineman", "LINE MAN"),
    ("line man", "LINE MAN"),
    ("foodpanda", "foodpanda"),
    ("shopee", "Shopee"),
    ("lazada", "Lazada"),
    ("เมืองไทยประกัน", "เมืองไทยประกันชีวิต"),
    ("muang thai life", "เมืองไทยประกันชีวิต"),
    ("aia", "AIA"),
    ("เอไอเอ", "AIA"),
    ("fwd", "FWD"),
    ("allianz", "Allianz Ayudhya"),
    ("อลิอันซ์", "Allianz Ayudhya"),
];

/// One purchase line of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Description with dates, times and branch codes removed.
    pub description: String,
    pub amount: Decimal,
    /// Zero-based line index in the source text.
    pub line: usize,
}

/// Result of the structural probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", content = "rows", rename_all = "snake_case")]
pub enum SlipLayout {
    /// One transaction per text.
    Single,
    /// A statement or receipt listing several purchases.
    Statement(Vec<StatementRow>),
}

impl SlipLayout {
    pub fn is_statement(&self) -> bool {
        matches!(self, Self::Statement(_))
    }
}

/// Classify a text as a single slip or a statement.
pub fn classify_layout(text: &str) -> SlipLayout {
    let rows = scan_rows(text);
    if rows.len() >= MIN_STATEMENT_ROWS {
        SlipLayout::Statement(rows)
    } else {
        SlipLayout::Single
    }
}

/// Every "description, decimal amount, optional unit" line that is not a
/// summary row.
pub fn scan_rows(text: &str) -> Vec<StatementRow> {
    text.lines()
        .enumerate()
        .filter_map(|(line, raw)| {
            let caps = STATEMENT_ROW.captures(raw.trim())?;
            let amount = parse_baht_amount(&caps[2])?;
            if amount.is_zero() {
                return None;
            }

            let without_dates = DATE_DAY_MONTH.replace_all(&caps[1], " ");
            let without_times = CLOCK_TIME.replace_all(&without_dates, " ");
            let description = clean_name(&without_times);
            if !description.chars().any(char::is_alphabetic) || is_summary(&description) {
                return None;
            }

            Some(StatementRow {
                description,
                amount,
                line,
            })
        })
        .collect()
}

fn is_summary(description: &str) -> bool {
    SUMMARY_LABEL.is_match(description)
}

/// Collapse known merchant variants to one canonical name.
pub fn simplify_brand(description: &str) -> String {
    let lower = description.to_lowercase();
    BRANDS
        .iter()
        .find(|(needle, _)| contains_brand(&lower, needle))
        .map(|(_, brand)| brand.to_string())
        .unwrap_or_else(|| description.to_string())
}

fn contains_brand(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}
