//! Common regex patterns for Thai slip and statement extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// A baht amount: grouped thousands or a plain digit run, optional 1-2 decimals.
pub const NUMBER: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?";

/// A baht amount that must carry two decimals.
pub const DECIMAL_NUMBER: &str = r"\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2}";

/// Currency unit tokens (suffix or prefix form).
pub const UNIT: &str = r"บาท|บ\.|฿|thb|baht";

const THAI_MONTHS: &str = concat!(
    "มกราคม|กุมภาพันธ์|มีนาคม|เมษายน|พฤษภาคม|มิถุนายน|",
    "กรกฎาคม|สิงหาคม|กันยายน|ตุลาคม|พฤศจิกายน|ธันวาคม|",
    r"มี\.?\s?ค\.?|เม\.?\s?ย\.?|มิ\.?\s?ย\.?|ม\.?\s?ค\.?|ก\.?\s?พ\.?|พ\.?\s?ค\.?|",
    r"ก\.?\s?ค\.?|ส\.?\s?ค\.?|ก\.?\s?ย\.?|ต\.?\s?ค\.?|พ\.?\s?ย\.?|ธ\.?\s?ค\.?"
);

lazy_static! {
    // Amounts
    pub static ref AMOUNT_NUMBER: Regex = Regex::new(NUMBER).unwrap();

    pub static ref AMOUNT_WITH_UNIT_SUFFIX: Regex = Regex::new(&format!(
        r"(?i)({})[ \t]*(?:บาท|บ\.|thb|baht)", NUMBER
    )).unwrap();

    pub static ref AMOUNT_WITH_UNIT_PREFIX: Regex = Regex::new(&format!(
        r"(?i)(?:฿|thb)[ \t]*({})", NUMBER
    )).unwrap();

    pub static ref CURRENCY_UNIT: Regex = Regex::new(&format!(r"(?i){}", UNIT)).unwrap();

    // Dates
    pub static ref DATE_SLASH: Regex = Regex::new(
        r"(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})"
    ).unwrap();

    pub static ref DATE_THAI: Regex = Regex::new(&format!(
        r"(\d{{1,2}})\s*({})\s*(\d{{4}}|\d{{2}})", THAI_MONTHS
    )).unwrap();

    pub static ref DATE_ENGLISH: Regex = Regex::new(
        r"(?i)(\d{1,2})[\s\-]*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\s\-,]*(\d{4}|\d{2})"
    ).unwrap();

    /// Day/month with an optional year, as printed on statement rows.
    pub static ref DATE_DAY_MONTH: Regex = Regex::new(
        r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b"
    ).unwrap();

    pub static ref CLOCK_TIME: Regex = Regex::new(
        r"\d{1,2}:\d{2}(?::\d{2})?"
    ).unwrap();

    // Accounts and references
    pub static ref MASKED_ACCOUNT: Regex = Regex::new(
        r"(?i)[x*\d]{3}-[x*\d]-[x*\d]{4,5}-[x*\d]|[x*\d]{3}-[x*\d]{6}-[x*\d]|[x*]{3,}[-\s]?\d{3,4}"
    ).unwrap();

    pub static ref LONG_DIGITS: Regex = Regex::new(r"\d{10,}").unwrap();

    pub static ref REFERENCE_LABELED: Regex = Regex::new(
        r"(?i)(?:เลขที่รายการ|เลขที่อ้างอิง|หมายเลขอ้างอิง|รหัสอ้างอิง|เลขอ้างอิง|transaction\s*(?:id|no\.?|ref\.?)|trans\.?\s*id|ref(?:erence)?\.?\s*(?:no\.?|number|id|code)?)[\s:：.#]*([A-Za-z0-9]{10,})"
    ).unwrap();

    // Receiver
    pub static ref RECEIVER_THAI: Regex = Regex::new(
        r"(?:โอนไปยัง|ไปยัง|ผู้รับเงิน|ผู้รับ|โอนให้|จ่ายให้|ชำระให้)[ \t]*[:：]?[ \t]*\r?\n?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref RECEIVER_ENGLISH: Regex = Regex::new(
        r"(?i)(?:\b(?:transfer(?:red)?\s+to|pay(?:ment)?\s+to|paid\s+to|recipient|receiver|beneficiary)\b|\bto\s*:)[ \t]*:?[ \t]*\r?\n?[ \t]*([^\n]+)"
    ).unwrap();

    pub static ref BILLER_ID: Regex = Regex::new(
        r"(?i)biller\s*id|รหัสผู้ให้บริการ|รหัสบริษัท|comp(?:any)?\.?\s*code"
    ).unwrap();

    pub static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();

    /// Account and section labels that open a line instead of a name. Thai
    /// labels match as prefixes; English ones as whole words.
    pub static ref GENERIC_NAME_LABEL: Regex = Regex::new(concat!(
        r"(?i)^(?:ออมทรัพย์|กระแสรายวัน|บัญชี|ธนาคาร|พร้อมเพย์|เลขที่|จำนวน|ค่าธรรมเนียม|วันที่|",
        r"โอนเงินสำเร็จ|ชำระเงินสำเร็จ|รายการสำเร็จ|",
        r"(?:savings?|current\s+account|account|promptpay|amount|fee|successful|transfer)\b)"
    )).unwrap();

    /// Summary labels (totals, balances, fees) heading a statement line,
    /// followed by the end of the text or a non-letter.
    pub static ref SUMMARY_LABEL: Regex = Regex::new(concat!(
        r"(?i)^(?:ยอดรวมทั้งสิ้น|ยอดรวมสุทธิ|ยอดรวม|รวมทั้งสิ้น|รวมเงิน|รวม|ยอดคงเหลือ|คงเหลือ|",
        r"ยอดยกมา|ยอดเงิน|ยอดชำระ|ยอดสุทธิ|จำนวนเงิน|จำนวน|ค่าธรรมเนียม|ภาษีมูลค่าเพิ่ม|ภาษี|",
        r"ส่วนลด|เงินทอน|grand\s*total|sub\s*total|total|balance|amount|fee|vat|tax|discount|change)",
        r"(?:$|[^\p{L}\p{M}\p{N}])"
    )).unwrap();

    // Statement rows: description, decimal amount, optional unit
    pub static ref STATEMENT_ROW: Regex = Regex::new(&format!(
        r"(?i)^(.*?)[ \t]*({})[ \t]*(?:บาท|บ\.|thb|฿)?[ \t]*$", DECIMAL_NUMBER
    )).unwrap();

    // Slip note hints
    pub static ref LOTTERY_PHRASE: Regex = Regex::new(
        r"(?i)สลากกินแบ่ง|สลาก|ลอตเตอรี่|ล็อตเตอรี่|กองสลาก|lottery"
    ).unwrap();

    pub static ref TRANSFER_PHRASE: Regex = Regex::new(
        r"(?i)โอนเงิน|ถอนเงิน|พร้อมเพย์|transfer|promptpay"
    ).unwrap();
}
