//! Amount extraction for Thai slips.
//!
//! Candidates come from three independent strategies: numbers after a
//! total/amount label, numbers next to a currency unit, and every other bare
//! number scored by heuristics. All candidates are merged and ranked once by
//! [`rank`], where unit-anchored candidates beat everything else.

use std::cmp::Ordering;
use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use super::bank::Bank;
use super::patterns::{
    AMOUNT_NUMBER, AMOUNT_WITH_UNIT_PREFIX, AMOUNT_WITH_UNIT_SUFFIX, CLOCK_TIME, CURRENCY_UNIT,
    DATE_ENGLISH, DATE_SLASH, DATE_THAI, LONG_DIGITS, MASKED_ACCOUNT, NUMBER, REFERENCE_LABELED,
};
use super::{ExtractionMatch, FieldExtractor};

const KEYWORD_SCORE: i32 = 100;
const UNIT_SCORE: i32 = 80;
const DECIMAL_BONUS: i32 = 30;
const UNIT_IN_TEXT_BONUS: i32 = 20;
const SMALL_VALUE_PENALTY: i32 = -50;

/// Labels that precede the paid amount on most slips and receipts.
const COMMON_AMOUNT_KEYWORDS: &[&str] = &[
    "ยอดรวมทั้งสิ้น",
    "ยอดชำระทั้งหมด",
    "รวมทั้งสิ้น",
    "ยอดรวม",
    "ยอดชำระ",
    "ยอดสุทธิ",
    "ยอดเงิน",
    "จำนวนเงิน",
    "จำนวน",
    "grand total",
    "total amount",
    "net amount",
    "amount",
    "total",
];

/// Which strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountTier {
    /// Number following a total/amount label.
    KeywordAnchored,
    /// Number adjacent to a currency unit.
    UnitAnchored,
    /// Any other number, scored by heuristics.
    Generic,
}

/// A scored amount found in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountCandidate {
    pub value: Decimal,
    pub score: i32,
    pub tier: AmountTier,
    pub start: usize,
    pub end: usize,
    pub has_decimal: bool,
}

impl AmountCandidate {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Inputs shared by every strategy for one text.
#[derive(Debug, Clone)]
pub struct AmountContext<'t> {
    pub text: &'t str,
    pub keywords: Vec<&'static str>,
    pub has_currency_unit: bool,
    pub small_value_threshold: Decimal,
    /// Spans of dates, clock times, account and reference numbers.
    pub blocked: Vec<(usize, usize)>,
}

impl AmountContext<'_> {
    fn is_blocked(&self, start: usize, end: usize) -> bool {
        self.blocked.iter().any(|&(s, e)| start < e && s < end)
    }

    /// A number glued to letters or date/time separators is part of a
    /// larger token (codes, phone numbers, merged OCR words).
    fn is_embedded(&self, start: usize, end: usize) -> bool {
        let before = self.text[..start].chars().next_back();
        let after = self.text[end..].chars().next();
        let glued = |c: Option<char>| {
            c.is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | ':' | '-' | '_'))
        };
        glued(before) || glued(after)
    }
}

/// A candidate-producing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountStrategy {
    KeywordAnchored,
    UnitAnchored,
    Generic,
}

impl AmountStrategy {
    /// All strategies, evaluated independently.
    pub const RANKED: [AmountStrategy; 3] = [
        AmountStrategy::KeywordAnchored,
        AmountStrategy::UnitAnchored,
        AmountStrategy::Generic,
    ];

    pub fn candidates(&self, ctx: &AmountContext<'_>) -> Vec<AmountCandidate> {
        match self {
            Self::KeywordAnchored => keyword_candidates(ctx),
            Self::UnitAnchored => unit_candidates(ctx),
            Self::Generic => generic_candidates(ctx),
        }
    }
}

/// Candidate ordering: unit-anchored first, then score, then value, all
/// descending.
pub fn rank(a: &AmountCandidate, b: &AmountCandidate) -> Ordering {
    let unit = |c: &AmountCandidate| c.tier == AmountTier::UnitAnchored;
    unit(b)
        .cmp(&unit(a))
        .then(b.score.cmp(&a.score))
        .then(b.value.cmp(&a.value))
}

fn candidate(
    ctx: &AmountContext<'_>,
    raw: &str,
    start: usize,
    end: usize,
    tier: AmountTier,
    score: i32,
) -> Option<AmountCandidate> {
    if ctx.is_blocked(start, end) {
        return None;
    }
    // The unit itself may be glued to the number ("500THB").
    if tier != AmountTier::UnitAnchored && ctx.is_embedded(start, end) {
        return None;
    }
    let value = parse_baht_amount(raw)?;
    if value.is_zero() {
        return None;
    }
    Some(AmountCandidate {
        value,
        score,
        tier,
        start,
        end,
        has_decimal: raw.contains('.'),
    })
}

fn keyword_candidates(ctx: &AmountContext<'_>) -> Vec<AmountCandidate> {
    let mut keywords = ctx.keywords.clone();
    keywords.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));
    keywords.dedup();
    if keywords.is_empty() {
        return Vec::new();
    }

    let alternatives = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"(?i)(?:{})[ \t]*(?:\((?:บาท|thb)\))?[\s:：]*(?:฿|thb)?[ \t]*({})",
        alternatives, NUMBER
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    re.captures_iter(ctx.text)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            candidate(ctx, m.as_str(), m.start(), m.end(), AmountTier::KeywordAnchored, KEYWORD_SCORE)
        })
        .collect()
}

fn unit_candidates(ctx: &AmountContext<'_>) -> Vec<AmountCandidate> {
    AMOUNT_WITH_UNIT_SUFFIX
        .captures_iter(ctx.text)
        .chain(AMOUNT_WITH_UNIT_PREFIX.captures_iter(ctx.text))
        .filter_map(|caps| {
            let m = caps.get(1)?;
            candidate(ctx, m.as_str(), m.start(), m.end(), AmountTier::UnitAnchored, UNIT_SCORE)
        })
        .collect()
}

fn generic_candidates(ctx: &AmountContext<'_>) -> Vec<AmountCandidate> {
    AMOUNT_NUMBER
        .find_iter(ctx.text)
        .filter_map(|m| {
            let mut c = candidate(ctx, m.as_str(), m.start(), m.end(), AmountTier::Generic, 0)?;
            if c.has_decimal {
                c.score += DECIMAL_BONUS;
            }
            if ctx.has_currency_unit {
                c.score += UNIT_IN_TEXT_BONUS;
            }
            if !c.has_decimal && c.value < ctx.small_value_threshold {
                c.score += SMALL_VALUE_PENALTY;
            }
            Some(c)
        })
        .collect()
}

/// Amount field extractor.
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    small_value_threshold: Decimal,
    bank: Option<Bank>,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            small_value_threshold: Decimal::from(100),
            bank: None,
        }
    }

    /// Set the value under which bare integers are penalized.
    pub fn with_small_value_threshold(mut self, threshold: Decimal) -> Self {
        self.small_value_threshold = threshold;
        self
    }

    /// Add the detected bank's amount labels to the keyword list.
    pub fn with_bank(mut self, bank: Option<Bank>) -> Self {
        self.bank = bank;
        self
    }

    pub fn context<'t>(&self, text: &'t str) -> AmountContext<'t> {
        let mut keywords = COMMON_AMOUNT_KEYWORDS.to_vec();
        if let Some(bank) = self.bank {
            keywords.extend_from_slice(bank.amount_keywords());
        }

        let mut blocked: Vec<(usize, usize)> = [
            &*DATE_SLASH,
            &*DATE_THAI,
            &*DATE_ENGLISH,
            &*CLOCK_TIME,
            &*MASKED_ACCOUNT,
            &*LONG_DIGITS,
        ]
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| (m.start(), m.end())))
        .collect();
        blocked.extend(
            REFERENCE_LABELED
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| (m.start(), m.end())),
        );

        AmountContext {
            text,
            keywords,
            has_currency_unit: CURRENCY_UNIT.is_match(text),
            small_value_threshold: self.small_value_threshold,
            blocked,
        }
    }

    /// All candidates from every strategy, ranked best first.
    pub fn candidates(&self, text: &str) -> Vec<AmountCandidate> {
        let ctx = self.context(text);

        let mut anchored = Vec::new();
        let mut generic = Vec::new();
        for strategy in AmountStrategy::RANKED {
            let found = strategy.candidates(&ctx);
            match strategy {
                AmountStrategy::Generic => generic = found,
                _ => anchored.extend(found),
            }
        }

        // Generic numbers only count when no anchored strategy claimed them.
        generic.retain(|g| !anchored.iter().any(|a| a.overlaps(g.start, g.end)));

        let mut all = anchored;
        all.extend(generic);
        all.sort_by(rank);

        debug!("Ranked {} amount candidates", all.len());
        all
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.candidates(text)
            .into_iter()
            .map(|c| {
                let confidence = (c.score.max(0) as f32 / KEYWORD_SCORE as f32).min(1.0);
                ExtractionMatch::new(c.value, confidence, &text[c.start..c.end])
                    .with_position(c.start, c.end)
            })
            .collect()
    }
}

/// Parse a baht amount such as "1,250.50", "60" or "๕๐".
pub fn parse_baht_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .map(thai_digit_to_ascii)
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

fn thai_digit_to_ascii(c: char) -> char {
    match c {
        '๐'..='๙' => char::from_digit(c as u32 - '๐' as u32, 10).unwrap_or(c),
        _ => c,
    }
}

/// Format an amount with thousands separators (1,250.5).
pub fn format_baht(amount: Decimal) -> String {
    let s = amount.round_dp(2).normalize().to_string();
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (s.as_str(), None),
    };
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::from(sign);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    match decimal_part {
        Some(d) => format!("{}.{}", formatted, d),
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_baht_amount() {
        assert_eq!(parse_baht_amount("1,250.50"), Some(dec("1250.50")));
        assert_eq!(parse_baht_amount("60"), Some(dec("60")));
        assert_eq!(parse_baht_amount("12,345,678"), Some(dec("12345678")));
        assert_eq!(parse_baht_amount(","), None);
    }

    #[test]
    fn test_format_baht() {
        assert_eq!(format_baht(dec("1250.50")), "1,250.5");
        assert_eq!(format_baht(dec("60")), "60");
        assert_eq!(format_baht(dec("1234567.25")), "1,234,567.25");
        assert_eq!(format_baht(dec("100.00")), "100");
    }

    #[test]
    fn test_total_beats_masked_account() {
        let text = "ธ.กสิกรไทย\nxxx-x-x1234-x\nยอดรวม 1,250.50 บาท";
        let best = AmountExtractor::new().extract(text).unwrap();
        assert_eq!(best.value, dec("1250.50"));
    }

    #[test]
    fn test_unit_anchored_overrides_keyword() {
        let text = "ยอดรวม 2,000\nค่าส่ง 50 บาท";
        let candidates = AmountExtractor::new().candidates(text);

        assert_eq!(candidates[0].tier, AmountTier::UnitAnchored);
        assert_eq!(candidates[0].value, dec("50"));
        assert_eq!(candidates[1].tier, AmountTier::KeywordAnchored);
        assert_eq!(candidates[1].score, KEYWORD_SCORE);
    }

    #[test]
    fn test_generic_heuristics() {
        let text = "Paid\n500.00\nitems 3";
        let candidates = AmountExtractor::new().candidates(text);

        assert_eq!(candidates[0].value, dec("500.00"));
        assert_eq!(candidates[0].score, DECIMAL_BONUS);
        let small = candidates.iter().find(|c| c.value == dec("3")).unwrap();
        assert_eq!(small.score, SMALL_VALUE_PENALTY);
    }

    #[test]
    fn test_dates_times_and_references_are_not_amounts() {
        let text = "12/01/2567 14:30\nรหัสอ้างอิง 2024011212345678\n450";
        let candidates = AmountExtractor::new().candidates(text);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].value, dec("450"));
    }

    #[test]
    fn test_equal_scores_prefer_larger_value() {
        let text = "120.00\n980.00";
        let best = AmountExtractor::new().extract(text).unwrap();
        assert_eq!(best.value, dec("980.00"));
    }

    #[test]
    fn test_bank_keywords_anchor_amount() {
        let text = "ยอดเงินโอน 300";
        let plain = AmountExtractor::new().candidates(text);
        assert_eq!(plain[0].tier, AmountTier::Generic);

        let krungsri = AmountExtractor::new()
            .with_bank(Some(Bank::Krungsri))
            .candidates(text);
        assert_eq!(krungsri[0].tier, AmountTier::KeywordAnchored);
        assert_eq!(krungsri[0].value, dec("300"));
    }

    #[test]
    fn test_no_amount() {
        assert!(AmountExtractor::new().extract("สวัสดีครับ").is_none());
    }
}
