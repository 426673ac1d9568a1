//! Receiver (merchant / payee) name extraction.
//!
//! Strategies in priority order:
//! 1. explicit "transfer to" style phrases
//! 2. the name above the second masked account (the first is the sender)
//! 3. a name line above any masked account below the first line
//! 4. the name above a biller-ID label on bill payments

use super::bank::BankDetector;
use super::patterns::{
    AMOUNT_WITH_UNIT_SUFFIX, BILLER_ID, CLOCK_TIME, DATE_ENGLISH, DATE_SLASH, DATE_THAI,
    DIGIT_RUN, GENERIC_NAME_LABEL, MASKED_ACCOUNT, RECEIVER_ENGLISH, RECEIVER_THAI,
};
use super::{ExtractionMatch, FieldExtractor};

/// Lines walked upwards when looking for a name above an anchor.
const MAX_LOOKBACK: usize = 3;

/// Receiver name extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiverExtractor {
    banks: BankDetector,
}

impl ReceiverExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a cleaned line can stand as a person or merchant name.
    pub fn is_usable_name(&self, name: &str) -> bool {
        if name.chars().count() <= 2 || !name.chars().any(char::is_alphabetic) {
            return false;
        }

        !(GENERIC_NAME_LABEL.is_match(name)
            || self.banks.is_bank_line(name)
            || MASKED_ACCOUNT.is_match(name)
            || DATE_SLASH.is_match(name)
            || DATE_THAI.is_match(name)
            || DATE_ENGLISH.is_match(name)
            || CLOCK_TIME.is_match(name)
            || AMOUNT_WITH_UNIT_SUFFIX.is_match(name))
    }

    fn from_phrases(&self, text: &str) -> Vec<ExtractionMatch<String>> {
        RECEIVER_THAI
            .captures_iter(text)
            .chain(RECEIVER_ENGLISH.captures_iter(text))
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let name = clean_name(m.as_str());
                self.is_usable_name(&name).then(|| {
                    ExtractionMatch::new(name, 0.9, m.as_str()).with_position(m.start(), m.end())
                })
            })
            .collect()
    }

    fn from_second_account(&self, lines: &[&str]) -> Option<ExtractionMatch<String>> {
        let mut accounts = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| MASKED_ACCOUNT.is_match(line))
            .map(|(i, _)| i);
        let first = accounts.next()?;
        let second = accounts.next()?;

        self.name_above(lines, second, first + 1)
            .map(|(name, source)| ExtractionMatch::new(name, 0.8, source))
    }

    fn from_any_account(&self, lines: &[&str]) -> Option<ExtractionMatch<String>> {
        lines
            .iter()
            .enumerate()
            .filter(|(i, line)| *i > 0 && MASKED_ACCOUNT.is_match(line))
            .find_map(|(i, _)| self.name_above(lines, i, 1))
            .map(|(name, source)| ExtractionMatch::new(name, 0.6, source))
    }

    fn from_biller_id(&self, lines: &[&str]) -> Option<ExtractionMatch<String>> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| BILLER_ID.is_match(line))
            .find_map(|(i, _)| self.name_above(lines, i, 0))
            .map(|(name, source)| ExtractionMatch::new(name, 0.5, source))
    }

    /// Walk up from `anchor` (exclusive) to `floor` (inclusive), skipping
    /// blank and bank-name lines, and return the first usable name.
    fn name_above(&self, lines: &[&str], anchor: usize, floor: usize) -> Option<(String, String)> {
        let mut looked = 0;
        for i in (floor..anchor).rev() {
            let line = lines[i].trim();
            if line.is_empty() || self.banks.is_bank_line(line) {
                continue;
            }
            looked += 1;
            if looked > MAX_LOOKBACK {
                break;
            }

            let name = clean_name(line);
            if self.is_usable_name(&name) {
                return Some((name, line.to_string()));
            }
        }
        None
    }
}

impl FieldExtractor for ReceiverExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines: Vec<&str> = text.lines().collect();

        let mut results = self.from_phrases(text);
        results.extend(self.from_second_account(&lines));
        results.extend(self.from_any_account(&lines));
        results.extend(self.from_biller_id(&lines));
        results
    }
}

/// Strip masked accounts and 3-5 digit branch codes, then collapse
/// whitespace.
pub fn clean_name(raw: &str) -> String {
    let without_accounts = MASKED_ACCOUNT.replace_all(raw, " ");
    let without_codes = DIGIT_RUN.replace_all(&without_accounts, |caps: &regex::Captures<'_>| {
        let digits = &caps[0];
        if (3..=5).contains(&digits.len()) {
            String::new()
        } else {
            digits.to_string()
        }
    });

    without_codes
        .replace("()", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, ':' | '：' | '-' | '–' | '—' | ',' | '.'))
        .trim()
        .to_string()
}
