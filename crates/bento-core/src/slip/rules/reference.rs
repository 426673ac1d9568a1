//! Reference / transaction number extraction.

use super::patterns::{LONG_DIGITS, REFERENCE_LABELED};
use super::{ExtractionMatch, FieldExtractor};

/// Reference number extractor.
///
/// Labeled alphanumeric tokens of at least 10 characters win; otherwise the
/// first bare run of 10 or more digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceExtractor;

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for ReferenceExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = REFERENCE_LABELED
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                Some(
                    ExtractionMatch::new(m.as_str().to_uppercase(), 0.95, &caps[0])
                        .with_position(m.start(), m.end()),
                )
            })
            .collect();

        for m in LONG_DIGITS.find_iter(text) {
            let already = results
                .iter()
                .any(|r| r.position.is_some_and(|(s, e)| s < m.end() && m.start() < e));
            if !already {
                results.push(
                    ExtractionMatch::new(m.as_str().to_string(), 0.6, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        ReferenceExtractor::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_labeled_reference() {
        assert_eq!(
            extract("เลขที่รายการ: 2024011212345678ABC"),
            Some("2024011212345678ABC".to_string())
        );
        assert_eq!(
            extract("Ref. No. 0123abcd4567"),
            Some("0123ABCD4567".to_string())
        );
    }

    #[test]
    fn test_labeled_beats_earlier_bare_digits() {
        let text = "0812345678901\nรหัสอ้างอิง: AB12345678CD";
        assert_eq!(extract(text), Some("AB12345678CD".to_string()));
    }

    #[test]
    fn test_bare_digit_fallback() {
        assert_eq!(
            extract("โอนเงินสำเร็จ\n015345104918ATF07721"),
            Some("015345104918".to_string())
        );
    }

    #[test]
    fn test_short_tokens_are_not_references() {
        assert_eq!(extract("เลขที่รายการ 12345"), None);
        assert_eq!(extract("ยอด 1,250.50 บาท"), None);
    }

    #[test]
    fn test_extract_all_does_not_repeat_labeled_digits() {
        let all = ReferenceExtractor::new().extract_all("Ref: 12345678901234");
        assert_eq!(all.len(), 1);
    }
}
