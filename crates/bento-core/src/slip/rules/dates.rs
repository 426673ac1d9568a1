//! Date extraction for Thai slips.
//!
//! Every match is normalized to the Buddhist era before it becomes a
//! [`ThaiDate`].

use regex::{Captures, Regex};

use crate::models::transaction::ThaiDate;

use super::patterns::{DATE_ENGLISH, DATE_SLASH, DATE_THAI};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<ThaiDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Slash dates first, then Thai month names, then English month names;
    /// text order within each form.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let forms: [(&Regex, fn(&str) -> Option<u32>, f32); 3] = [
            (&*DATE_SLASH, numeric_month, 0.9),
            (&*DATE_THAI, thai_month_to_number, 0.95),
            (&*DATE_ENGLISH, english_month_to_number, 0.9),
        ];

        let mut results = Vec::new();
        for (pattern, month_of, confidence) in forms {
            for caps in pattern.captures_iter(text) {
                if let Some(date) = date_from_captures(&caps, month_of) {
                    let full_match = &caps[0];
                    let (start, end) = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or_default();
                    results.push(
                        ExtractionMatch::new(date, confidence, full_match).with_position(start, end),
                    );
                }
            }
        }

        results
    }
}

fn date_from_captures(caps: &Captures<'_>, month_of: fn(&str) -> Option<u32>) -> Option<ThaiDate> {
    let day: u32 = caps[1].parse().ok()?;
    let month = month_of(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    ThaiDate::from_buddhist(day, month, to_buddhist_year(year))
}

/// Normalize a printed year to the Buddhist era.
///
/// Two-digit years are Buddhist short form (67 -> 2567); four-digit years
/// already past 2400 are Buddhist; anything else is Gregorian.
pub fn to_buddhist_year(year: i32) -> i32 {
    if year < 100 {
        2500 + year
    } else if year >= 2400 {
        year
    } else {
        year + ThaiDate::ERA_OFFSET
    }
}

fn numeric_month(month: &str) -> Option<u32> {
    month.parse().ok()
}

fn thai_month_to_number(month: &str) -> Option<u32> {
    let key: String = month
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();

    let number = match key.as_str() {
        "มกราคม" | "มค" => 1,
        "กุมภาพันธ์" | "กพ" => 2,
        "มีนาคม" | "มีค" => 3,
        "เมษายน" | "เมย" => 4,
        "พฤษภาคม" | "พค" => 5,
        "มิถุนายน" | "มิย" => 6,
        "กรกฎาคม" | "กค" => 7,
        "สิงหาคม" | "สค" => 8,
        "กันยายน" | "กย" => 9,
        "ตุลาคม" | "ตค" => 10,
        "พฤศจิกายน" | "พย" => 11,
        "ธันวาคม" | "ธค" => 12,
        _ => return None,
    };
    Some(number)
}

fn english_month_to_number(month: &str) -> Option<u32> {
    let number = match month.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        DateExtractor::new().extract(text).map(|m| m.value.to_string())
    }

    #[test]
    fn test_thai_abbreviated_month_short_year() {
        assert_eq!(extract("12 ม.ค. 67"), Some("12/01/2567".to_string()));
        assert_eq!(extract("โอนเงินสำเร็จ 3 มี.ค. 68 09:15 น."), Some("03/03/2568".to_string()));
    }

    #[test]
    fn test_thai_full_month() {
        assert_eq!(extract("วันที่ 5 กันยายน 2568"), Some("05/09/2568".to_string()));
    }

    #[test]
    fn test_slash_gregorian_year() {
        assert_eq!(extract("01/01/2026"), Some("01/01/2569".to_string()));
        assert_eq!(extract("7/3/2567"), Some("07/03/2567".to_string()));
    }

    #[test]
    fn test_english_month() {
        assert_eq!(extract("Date: 15 Feb 2025, 10:20"), Some("15/02/2568".to_string()));
        assert_eq!(extract("15-Feb-2025"), Some("15/02/2568".to_string()));
    }

    #[test]
    fn test_slash_form_wins_over_thai_form() {
        assert_eq!(
            extract("12 ม.ค. 67\nพิมพ์เมื่อ 20/01/2567"),
            Some("20/01/2567".to_string())
        );
    }

    #[test]
    fn test_invalid_dates_are_skipped() {
        assert_eq!(extract("31/02/2567 01/03/2567"), Some("01/03/2567".to_string()));
        assert_eq!(extract("no date here"), None);
    }

    #[test]
    fn test_to_buddhist_year() {
        assert_eq!(to_buddhist_year(67), 2567);
        assert_eq!(to_buddhist_year(2567), 2567);
        assert_eq!(to_buddhist_year(2024), 2567);
    }
}
