//! Natural-language chat input to transaction drafts.
//!
//! One typed line ("ก๋วยเตี๋ยว 50 บาท", "เงินเดือนเข้า 25,000") becomes one
//! draft. Lines without a usable amount yield `None` so the caller can ask
//! the user to rephrase.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::classify::{CategoryClassifier, PreferenceMap, PreferenceStore};
use crate::models::transaction::{ThaiDate, TransactionDraft, TransactionKind};
use crate::slip::rules::parse_baht_amount;
use crate::slip::rules::patterns::CURRENCY_UNIT;

/// Reply shown when no amount could be understood.
pub const NOT_UNDERSTOOD_MESSAGE: &str =
    "ขอโทษครับ ผมไม่เข้าใจจำนวนเงิน ลองพิมพ์ใหม่ดูนะครับ เช่น \"ก๋วยเตี๋ยว 50 บาท\"";

const DEFAULT_INCOME_NOTE: &str = "รายรับเพิ่มขึ้น";
const DEFAULT_EXPENSE_NOTE: &str = "รายจ่ายใหม่";

const INCOME_KEYWORDS: &[&str] = &[
    "เงินเดือน",
    "ได้เงิน",
    "เข้า",
    "รายรับ",
    "โอนเข้า",
    "ถอนเงิน",
    "โบนัส",
    "salary",
    "income",
    "bonus",
];

lazy_static! {
    static ref CHAT_AMOUNT: Regex = Regex::new(r"[0-9๐-๙][0-9๐-๙,]*(?:\.[0-9๐-๙]+)?").unwrap();
    static ref CATEGORY_HINT: Regex = Regex::new(r"(?:หมวด|#)\s*(\S+)").unwrap();
}

/// Parses one line of chat text into a draft.
#[derive(Debug, Clone, Copy)]
pub struct NaturalLanguageParser<'c, S = PreferenceMap> {
    classifier: &'c CategoryClassifier<S>,
}

impl<'c, S: PreferenceStore> NaturalLanguageParser<'c, S> {
    pub fn new(classifier: &'c CategoryClassifier<S>) -> Self {
        Self { classifier }
    }

    /// Parse `text`, dating the draft today.
    pub fn parse(&self, text: &str) -> Option<TransactionDraft> {
        self.parse_at(text, ThaiDate::today())
    }

    /// Parse `text`, dating the draft `today`.
    pub fn parse_at(&self, text: &str, today: ThaiDate) -> Option<TransactionDraft> {
        let amount_match = CHAT_AMOUNT.find(text)?;
        let amount = parse_baht_amount(amount_match.as_str()).filter(|a| *a > Decimal::ZERO)?;

        let kind = detect_kind(text);

        let mut note = String::with_capacity(text.len());
        note.push_str(&text[..amount_match.start()]);
        note.push(' ');
        note.push_str(&text[amount_match.end()..]);
        let note = CURRENCY_UNIT
            .replace_all(&note, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let category = match kind {
            TransactionKind::Income => self.classifier.classify(text, kind, None),
            TransactionKind::Expense => self
                .hinted_category(text)
                .unwrap_or_else(|| self.classifier.classify(&note, kind, None)),
        };

        let note = if note.is_empty() {
            match kind {
                TransactionKind::Income => DEFAULT_INCOME_NOTE.to_string(),
                TransactionKind::Expense => DEFAULT_EXPENSE_NOTE.to_string(),
            }
        } else {
            note
        };

        debug!("Chat input parsed: {} {} -> {}", kind.thai_label(), amount, category);
        Some(TransactionDraft::new(amount, kind, category, today, note))
    }

    fn hinted_category(&self, text: &str) -> Option<String> {
        CATEGORY_HINT
            .captures_iter(text)
            .find_map(|caps| self.classifier.resolve_hint(&caps[1]))
            .map(str::to_string)
    }
}

fn detect_kind(text: &str) -> TransactionKind {
    let lower = text.to_lowercase();
    if INCOME_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TransactionKind::Income
    } else {
        TransactionKind::Expense
    }
}

/// Reply confirming a recorded draft.
pub fn confirmation_message(draft: &TransactionDraft) -> String {
    format!(
        "บันทึก{} {} บาท เรียบร้อยแล้วครับ! ✅",
        draft.kind.thai_label(),
        crate::slip::rules::format_baht(draft.amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::CategoryCatalog;
    use crate::models::transaction::INCOME_CATEGORY;
    use pretty_assertions::assert_eq;

    fn today() -> ThaiDate {
        ThaiDate::from_buddhist(12, 1, 2567).unwrap()
    }

    fn parse(text: &str) -> Option<TransactionDraft> {
        let classifier = CategoryClassifier::new(CategoryCatalog::default());
        NaturalLanguageParser::new(&classifier).parse_at(text, today())
    }

    #[test]
    fn test_no_digits_is_not_understood() {
        for text in ["", "กินข้าว", "เงินเดือนเข้าแล้ว", "coffee ห้าสิบบาท", ",.,"] {
            assert_eq!(parse(text), None, "{:?}", text);
        }
    }

    #[test]
    fn test_zero_amount_is_not_understood() {
        assert_eq!(parse("ข้าว 0 บาท"), None);
        assert_eq!(parse("0,000"), None);
    }

    #[test]
    fn test_simple_expense() {
        let draft = parse("ก๋วยเตี๋ยว 50 บาท").unwrap();

        assert_eq!(draft.amount, Decimal::from(50));
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.category, "อาหาร");
        assert_eq!(draft.note, "ก๋วยเตี๋ยว");
        assert_eq!(draft.date, today());
        assert_eq!(draft.reference_id, None);
        assert_eq!(draft.counterparty_name, None);
    }

    #[test]
    fn test_thai_digits() {
        let draft = parse("ข้าว ๕๐ บาท").unwrap();
        assert_eq!(draft.amount, Decimal::from(50));
        assert_eq!(draft.note, "ข้าว");

        let draft = parse("ค่าน้ำ ๑,๒๕๐.๕๐").unwrap();
        assert_eq!(draft.amount, "1250.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_grouped_decimal_amount() {
        let draft = parse("ค่าไฟ 1,250.50 บ.").unwrap();
        assert_eq!(draft.amount, "1250.50".parse::<Decimal>().unwrap());
        assert_eq!(draft.category, "บิล/สาธารณูปโภค");
        assert_eq!(draft.note, "ค่าไฟ");
    }

    #[test]
    fn test_income_keyword_wins_over_expense_words() {
        let draft = parse("เงินเดือนเข้า 25,000 บาท แล้วไปกินข้าว").unwrap();

        assert_eq!(draft.kind, TransactionKind::Income);
        assert_eq!(draft.category, INCOME_CATEGORY);
        assert_eq!(draft.amount, Decimal::from(25000));

        let bonus = parse("Bonus 3000 THB").unwrap();
        assert_eq!(bonus.kind, TransactionKind::Income);
        assert_eq!(bonus.note, "Bonus");
    }

    #[test]
    fn test_category_hint_overrides_keywords() {
        let draft = parse("ข้าวมันไก่ 60 #บันเทิง").unwrap();
        assert_eq!(draft.category, "บันเทิง");

        let draft = parse("ซื้อของ 120 หมวด เดินทาง").unwrap();
        assert_eq!(draft.category, "เดินทาง");
    }

    #[test]
    fn test_unknown_hint_falls_back_to_classifier() {
        let draft = parse("กาแฟ 45 #xyz").unwrap();
        assert_eq!(draft.category, "อาหาร");
    }

    #[test]
    fn test_default_note() {
        assert_eq!(parse("50 บาท").unwrap().note, "รายจ่ายใหม่");
        assert_eq!(parse("฿99").unwrap().note, "รายจ่ายใหม่");
    }

    #[test]
    fn test_confirmation_message() {
        let draft = parse("ค่าไฟ 1,250.50 บาท").unwrap();
        assert_eq!(
            confirmation_message(&draft),
            "บันทึกรายจ่าย 1,250.5 บาท เรียบร้อยแล้วครับ! ✅"
        );
    }
}
