//! Bank identity detection from slip text.

use serde::{Deserialize, Serialize};

/// Thai banks recognized on transfer slips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bank {
    Kasikorn,
    SiamCommercial,
    Krungthai,
    Bangkok,
    Krungsri,
    Ttb,
    GovernmentSavings,
    Baac,
    Uob,
    Cimb,
}

impl Bank {
    /// Detection order.
    pub const ALL: [Bank; 10] = [
        Bank::Kasikorn,
        Bank::SiamCommercial,
        Bank::Krungthai,
        Bank::Bangkok,
        Bank::Krungsri,
        Bank::Ttb,
        Bank::GovernmentSavings,
        Bank::Baac,
        Bank::Uob,
        Bank::Cimb,
    ];

    /// Lowercase name and brand tokens.
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Kasikorn => &["กสิกร", "kasikorn", "kbank", "k plus", "k+"],
            Self::SiamCommercial => &["ไทยพาณิชย์", "siam commercial", "scb"],
            Self::Krungthai => &["กรุงไทย", "krungthai", "krung thai", "ktb"],
            Self::Bangkok => &["ธนาคารกรุงเทพ", "ธ.กรุงเทพ", "bangkok bank", "bualuang", "บัวหลวง"],
            Self::Krungsri => &["กรุงศรี", "krungsri", "ayudhya bank", "kma"],
            Self::Ttb => &["ทหารไทยธนชาต", "ทีทีบี", "ttb"],
            Self::GovernmentSavings => &["ออมสิน", "government savings", "mymo"],
            Self::Baac => &["ธ.ก.ส.", "ธกส", "baac"],
            Self::Uob => &["ยูโอบี", "uob"],
            Self::Cimb => &["ซีไอเอ็มบี", "cimb"],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Kasikorn => "กสิกรไทย",
            Self::SiamCommercial => "ไทยพาณิชย์",
            Self::Krungthai => "กรุงไทย",
            Self::Bangkok => "กรุงเทพ",
            Self::Krungsri => "กรุงศรีอยุธยา",
            Self::Ttb => "ทหารไทยธนชาต",
            Self::GovernmentSavings => "ออมสิน",
            Self::Baac => "ธ.ก.ส.",
            Self::Uob => "ยูโอบี",
            Self::Cimb => "ซีไอเอ็มบี",
        }
    }

    /// Amount labels this bank prints in addition to the common ones.
    pub fn amount_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Kasikorn => &["จำนวนเงินโอน"],
            Self::SiamCommercial => &["จำนวนเงินที่โอน", "amount (thb)"],
            Self::Krungthai => &["ยอดโอน", "จำนวนเงินโอน"],
            Self::Bangkok => &["transfer amount", "จำนวนเงินที่โอน"],
            Self::Krungsri => &["ยอดเงินโอน"],
            Self::Ttb => &["จำนวนเงินที่โอน"],
            Self::GovernmentSavings => &["จำนวนเงินที่ทำรายการ"],
            Self::Baac => &["จำนวนเงินที่ทำรายการ"],
            Self::Uob => &["transfer amount"],
            Self::Cimb => &["transfer amount"],
        }
    }
}

/// Detects which bank issued a slip.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankDetector;

impl BankDetector {
    pub fn new() -> Self {
        Self
    }

    /// First bank, in [`Bank::ALL`] order, whose token occurs in the text.
    pub fn detect(&self, text: &str) -> Option<Bank> {
        let lower = text.to_lowercase();
        Bank::ALL
            .into_iter()
            .find(|bank| bank.tokens().iter().any(|t| lower.contains(t)))
    }

    /// Whether a single line only names a bank (e.g. "ธ.กสิกรไทย").
    pub fn is_bank_line(&self, line: &str) -> bool {
        let lower = line.trim().to_lowercase();
        lower.starts_with("ธ.")
            || lower.starts_with("ธนาคาร")
            || lower.ends_with(" bank")
            || lower.starts_with("bank ")
            || self.detect(&lower).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_bank() {
        let detector = BankDetector::new();
        assert_eq!(detector.detect("โอนเงินสำเร็จ\nธ.กสิกรไทย"), Some(Bank::Kasikorn));
        assert_eq!(detector.detect("SCB Easy"), Some(Bank::SiamCommercial));
        assert_eq!(detector.detect("Krungthai NEXT"), Some(Bank::Krungthai));
        assert_eq!(detector.detect("ร้านข้าวมันไก่"), None);
    }

    #[test]
    fn test_detection_order_is_fixed() {
        let detector = BankDetector::new();
        let text = "จาก ธ.ไทยพาณิชย์ ไป ธ.กสิกรไทย";
        assert_eq!(detector.detect(text), Some(Bank::Kasikorn));
    }

    #[test]
    fn test_is_bank_line() {
        let detector = BankDetector::new();
        assert!(detector.is_bank_line("ธ.ไทยพาณิชย์"));
        assert!(detector.is_bank_line("ธนาคารออมสิน"));
        assert!(!detector.is_bank_line("นางสาว สมหญิง รักดี"));
    }
}
