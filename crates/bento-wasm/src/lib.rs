//! WASM bindings for Thai transaction inference.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Text recognition stays on the JavaScript side: callers hand in OCR text,
//! or a recognizer callback for batch scans.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use bento_core::slip::rules::{DateExtractor, FieldExtractor};
use bento_core::{
    confirmation_message, BatchScanner, CategoryCatalog, CategoryClassifier, Ledger,
    NaturalLanguageParser, OcrError, PreferenceMap, ScanControl, SlipImage, SlipPipeline,
    SlipRecognizer, TransactionDraft,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn load_preferences(json: Option<&str>) -> Result<PreferenceMap, JsValue> {
    match json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => serde_json::from_str(json).map_err(to_js_error),
        None => Ok(PreferenceMap::new()),
    }
}

fn load_ledger(json: Option<&str>) -> Result<Ledger, JsValue> {
    match json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => serde_json::from_str(json).map_err(to_js_error),
        None => Ok(Ledger::new()),
    }
}

fn classifier(prefs_json: Option<&str>) -> Result<CategoryClassifier, JsValue> {
    Ok(CategoryClassifier::with_store(
        CategoryCatalog::default(),
        load_preferences(prefs_json)?,
    ))
}

/// Parse a chat line such as "ก๋วยเตี๋ยว 50 บาท" into a draft.
///
/// Returns `null` when no positive amount is found.
#[wasm_bindgen]
pub fn parse_chat(text: &str, prefs_json: Option<String>) -> Result<JsValue, JsValue> {
    let classifier = classifier(prefs_json.as_deref())?;
    match NaturalLanguageParser::new(&classifier).parse(text) {
        Some(draft) => to_js(&draft),
        None => Ok(JsValue::NULL),
    }
}

/// Extract drafts from the OCR text of one slip or statement.
#[wasm_bindgen]
pub fn extract_slip(
    text: &str,
    ledger_json: Option<String>,
    prefs_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let classifier = classifier(prefs_json.as_deref())?;
    let ledger = load_ledger(ledger_json.as_deref())?;
    let extraction = SlipPipeline::new(&classifier).extract(text, ledger.transactions());
    to_js(&extraction)
}

/// Recognizer that calls back into JavaScript with `(name, bytes)` and
/// accepts either a string or a promise of one.
struct JsRecognizer {
    callback: js_sys::Function,
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

impl SlipRecognizer for JsRecognizer {
    async fn recognize(&self, image: &SlipImage) -> Result<String, OcrError> {
        let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
        let returned = self
            .callback
            .call2(&JsValue::NULL, &JsValue::from_str(&image.name), &bytes)
            .map_err(|e| OcrError::Recognition(describe(&e)))?;

        let text = JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map_err(|e| OcrError::Recognition(describe(&e)))?;

        text.as_string()
            .ok_or_else(|| OcrError::Recognition("recognizer did not return text".to_string()))
    }
}

fn read_images(images: &js_sys::Array) -> Result<Vec<SlipImage>, JsValue> {
    images
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let name = js_sys::Reflect::get(&item, &JsValue::from_str("name"))?
                .as_string()
                .unwrap_or_else(|| format!("slip-{}", i + 1));
            let bytes = js_sys::Reflect::get(&item, &JsValue::from_str("bytes"))?;
            if bytes.is_undefined() {
                return Err(JsValue::from_str(&format!("{}: missing bytes", name)));
            }
            Ok(SlipImage::new(name, js_sys::Uint8Array::new(&bytes).to_vec()))
        })
        .collect()
}

/// Scan `[{ name, bytes }]` images in order through `recognize`.
///
/// Failed recognitions become error drafts; the batch always completes.
#[wasm_bindgen]
pub async fn scan_batch(
    images: js_sys::Array,
    recognize: js_sys::Function,
    ledger_json: Option<String>,
    prefs_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let images = read_images(&images)?;
    let classifier = classifier(prefs_json.as_deref())?;
    let ledger = load_ledger(ledger_json.as_deref())?;

    let scanner = BatchScanner::new(
        JsRecognizer {
            callback: recognize,
        },
        SlipPipeline::new(&classifier),
    );
    let outcome = scanner
        .scan(&images, ledger.transactions(), |_| ScanControl::Continue)
        .await;

    if outcome.failed() > 0 {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{} of {} slip(s) could not be read",
            outcome.failed(),
            images.len()
        )));
    }

    to_js(&outcome)
}

/// Find a date in text and render it as Buddhist-era DD/MM/YYYY.
#[wasm_bindgen]
pub fn parse_thai_date(text: &str) -> Option<String> {
    DateExtractor::new()
        .extract(text)
        .map(|m| m.value.to_string())
}

/// Format a baht amount with thousands separators (e.g. "1,250.5").
#[wasm_bindgen]
pub fn format_baht(amount: &str) -> Option<String> {
    bento_core::slip::rules::parse_baht_amount(amount).map(bento_core::slip::rules::format_baht)
}

/// Stateful engine holding a ledger and learned preferences.
#[wasm_bindgen]
pub struct BentoEngine {
    classifier: CategoryClassifier,
    ledger: Ledger,
}

#[wasm_bindgen]
impl BentoEngine {
    /// Create an engine from previously exported JSON, or empty.
    #[wasm_bindgen(constructor)]
    pub fn new(
        prefs_json: Option<String>,
        ledger_json: Option<String>,
    ) -> Result<BentoEngine, JsValue> {
        Ok(Self {
            classifier: classifier(prefs_json.as_deref())?,
            ledger: load_ledger(ledger_json.as_deref())?,
        })
    }

    /// Selectable expense categories.
    #[wasm_bindgen]
    pub fn categories(&self) -> Vec<String> {
        self.classifier
            .catalog()
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        match NaturalLanguageParser::new(&self.classifier).parse(text) {
            Some(draft) => to_js(&draft),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let extraction =
            SlipPipeline::new(&self.classifier).extract(text, self.ledger.transactions());
        to_js(&extraction)
    }

    /// Confirm a draft into the ledger, returning the confirmation message.
    #[wasm_bindgen]
    pub fn confirm(&mut self, draft: JsValue) -> Result<String, JsValue> {
        let draft: TransactionDraft = serde_wasm_bindgen::from_value(draft)?;
        let issues = draft.validate();
        if !issues.is_empty() {
            return Err(JsValue::from_str(&issues.join("; ")));
        }
        let message = confirmation_message(&draft);
        self.ledger.confirm(draft);
        Ok(message)
    }

    /// Change a transaction's category and learn from the edit.
    ///
    /// Returns the counterparty that was learned, if any.
    #[wasm_bindgen]
    pub fn update_category(&mut self, id: &str, category: &str) -> Result<Option<String>, JsValue> {
        if !self.classifier.catalog().contains(category) {
            return Err(JsValue::from_str(&format!("Unknown category: {}", category)));
        }
        let before = self
            .ledger
            .update_category(id, category)
            .map_err(to_js_error)?;
        self.classifier
            .learner_mut()
            .learn_from_edit(&before, category)
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn record_preference(&mut self, counterparty: &str, category: &str) -> Result<bool, JsValue> {
        self.classifier
            .learner_mut()
            .record(counterparty, category)
            .map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.ledger.summary())
    }

    #[wasm_bindgen]
    pub fn preferences_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.classifier.learner().store()).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn ledger_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.ledger).map_err(to_js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_parse_thai_date() {
        assert_eq!(parse_thai_date("12 ม.ค. 67 10:30 น."), Some("12/01/2567".to_string()));
        assert_eq!(parse_thai_date("ไม่มีวันที่"), None);
    }

    #[wasm_bindgen_test]
    fn test_format_baht() {
        assert_eq!(format_baht("1250.50"), Some("1,250.5".to_string()));
    }

    #[wasm_bindgen_test]
    fn test_engine_preferences_round_trip() {
        let mut engine = BentoEngine::new(None, None).unwrap();
        assert!(engine.record_preference("ร้านข้าวมันไก่", "บันเทิง").unwrap());
        assert!(!engine.record_preference("ab", "บันเทิง").unwrap());

        let json = engine.preferences_json().unwrap();
        let reloaded = BentoEngine::new(Some(json), None).unwrap();
        assert_eq!(
            reloaded.classifier.learner().lookup("ร้านข้าวมันไก่"),
            Some("บันเทิง".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn test_categories_end_with_catch_all() {
        let engine = BentoEngine::new(None, None).unwrap();
        let categories = engine.categories();
        assert_eq!(categories.first().map(String::as_str), Some("อาหาร"));
        assert_eq!(categories.last().map(String::as_str), Some("other"));
    }
}
