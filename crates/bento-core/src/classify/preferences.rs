//! Learned counterparty-to-category overrides.
//!
//! Preferences are written only when a user changes a transaction's category,
//! and always win over keyword scoring for the same counterparty.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::models::transaction::{Transaction, TransactionKind};
use crate::slip::duplicates::DUPLICATE_MARKER;
use crate::slip::rules::{clean_name, FieldExtractor, ReceiverExtractor};

/// Names this short are too ambiguous to learn from.
const MIN_KEY_CHARS: usize = 3;

/// Backing storage for learned preferences.
pub trait PreferenceStore {
    /// Category stored for a normalized counterparty.
    fn get(&self, counterparty: &str) -> Option<String>;

    /// Insert or overwrite a mapping.
    fn put(&mut self, counterparty: String, category: String) -> Result<()>;

    /// All mappings, sorted by counterparty.
    fn entries(&self) -> Vec<(String, String)>;
}

/// In-memory preference map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceMap(BTreeMap<String, String>);

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PreferenceStore for PreferenceMap {
    fn get(&self, counterparty: &str) -> Option<String> {
        self.0.get(counterparty).cloned()
    }

    fn put(&mut self, counterparty: String, category: String) -> Result<()> {
        self.0.insert(counterparty, category);
        Ok(())
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// JSON-file preference store, saved on every write.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    map: PreferenceMap,
}

impl JsonPreferenceStore {
    /// Open the store at `path`. A missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let map = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(StoreError::from)?;
            serde_json::from_str(&content).map_err(|e| StoreError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            debug!("No preferences at {}, starting empty", path.display());
            PreferenceMap::new()
        };

        Ok(Self { path, map })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn map(&self) -> &PreferenceMap {
        &self.map
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::from)?;
        }
        let content = serde_json::to_string_pretty(&self.map)?;
        std::fs::write(&self.path, content).map_err(StoreError::from)?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, counterparty: &str) -> Option<String> {
        self.map.get(counterparty)
    }

    fn put(&mut self, counterparty: String, category: String) -> Result<()> {
        self.map.put(counterparty, category)?;
        self.save()
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.map.entries()
    }
}

/// Key form of a counterparty name: branch codes stripped, whitespace
/// collapsed.
pub fn normalize_counterparty(name: &str) -> String {
    clean_name(name)
}

/// Records and looks up counterparty preferences.
#[derive(Debug, Clone, Default)]
pub struct PreferenceLearner<S = PreferenceMap> {
    store: S,
}

impl<S: PreferenceStore> PreferenceLearner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Map `counterparty` to `category`, overwriting any earlier mapping.
    ///
    /// Returns `false` when the name is too short to be a usable key.
    pub fn record(&mut self, counterparty: &str, category: &str) -> Result<bool> {
        let key = normalize_counterparty(counterparty);
        if key.chars().count() < MIN_KEY_CHARS {
            debug!("Ignoring preference for short name {:?}", counterparty);
            return Ok(false);
        }

        info!("Learned preference {} -> {}", key, category);
        self.store.put(key, category.to_string())?;
        Ok(true)
    }

    pub fn lookup(&self, counterparty: &str) -> Option<String> {
        let key = normalize_counterparty(counterparty);
        if key.chars().count() < MIN_KEY_CHARS {
            return None;
        }
        self.store.get(&key)
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        self.store.entries()
    }

    /// Feed a user category edit back into the store.
    ///
    /// Nothing is learned for income, for unchanged categories, or when no
    /// counterparty can be recovered from the stored name or the note.
    /// Returns the key that was recorded.
    pub fn learn_from_edit(
        &mut self,
        transaction: &Transaction,
        new_category: &str,
    ) -> Result<Option<String>> {
        if transaction.kind == TransactionKind::Income || transaction.category == new_category {
            return Ok(None);
        }

        let counterparty = transaction
            .counterparty_name
            .clone()
            .filter(|name| normalize_counterparty(name).chars().count() >= MIN_KEY_CHARS)
            .or_else(|| {
                let note = transaction.note.trim_start_matches(DUPLICATE_MARKER);
                ReceiverExtractor::new().extract(note).map(|m| m.value)
            });

        let Some(counterparty) = counterparty else {
            debug!("No counterparty to learn from in {}", transaction.id);
            return Ok(None);
        };

        if self.record(&counterparty, new_category)? {
            Ok(Some(normalize_counterparty(&counterparty)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{ThaiDate, TransactionDraft};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn expense(note: &str, category: &str, counterparty: Option<&str>) -> Transaction {
        let draft = TransactionDraft::new(
            Decimal::from(60),
            TransactionKind::Expense,
            category,
            ThaiDate::from_buddhist(12, 1, 2567).unwrap(),
            note,
        )
        .with_counterparty(counterparty.map(str::to_string));
        Transaction::from_draft("1", draft)
    }

    #[test]
    fn test_record_and_lookup_normalize_keys() {
        let mut learner = PreferenceLearner::new(PreferenceMap::new());

        assert!(learner.record("ร้านกาแฟ  สาขา 00123", "บันเทิง").unwrap());
        assert_eq!(learner.lookup("ร้านกาแฟ สาขา"), Some("บันเทิง".to_string()));
        assert_eq!(learner.lookup("ร้านกาแฟ สาขา 456"), Some("บันเทิง".to_string()));
    }

    #[test]
    fn test_short_names_are_ignored() {
        let mut learner = PreferenceLearner::new(PreferenceMap::new());

        assert!(!learner.record("ab", "อาหาร").unwrap());
        assert!(learner.entries().is_empty());
        assert_eq!(learner.lookup("ab"), None);
    }

    #[test]
    fn test_record_overwrites() {
        let mut learner = PreferenceLearner::new(PreferenceMap::new());
        learner.record("ร้านกาแฟ", "อาหาร").unwrap();
        learner.record("ร้านกาแฟ", "บันเทิง").unwrap();

        assert_eq!(
            learner.entries(),
            vec![("ร้านกาแฟ".to_string(), "บันเทิง".to_string())]
        );
    }

    #[test]
    fn test_learn_from_edit_uses_stored_counterparty() {
        let mut learner = PreferenceLearner::new(PreferenceMap::new());
        let tx = expense("ร้านกาแฟ", "อาหาร", Some("ร้านกาแฟ"));

        let key = learner.learn_from_edit(&tx, "บันเทิง").unwrap();
        assert_eq!(key, Some("ร้านกาแฟ".to_string()));
        assert_eq!(learner.lookup("ร้านกาแฟ"), Some("บันเทิง".to_string()));
    }

    #[test]
    fn test_learn_from_edit_falls_back_to_note() {
        let mut learner = PreferenceLearner::new(PreferenceMap::new());
        let note = format!("{}โอนไปยัง ร้านป้าแดง", DUPLICATE_MARKER);
        let tx = expense(&note, "other", None);

        let key = learner.learn_from_edit(&tx, "อาหาร").unwrap();
        assert_eq!(key, Some("ร้านป้าแดง".to_string()));
    }

    #[test]
    fn test_learn_from_edit_noops() {
        let mut learner = PreferenceLearner::new(PreferenceMap::new());

        let unchanged = expense("ร้านกาแฟ", "อาหาร", Some("ร้านกาแฟ"));
        assert_eq!(learner.learn_from_edit(&unchanged, "อาหาร").unwrap(), None);

        let anonymous = expense("ก๋วยเตี๋ยว", "อาหาร", None);
        assert_eq!(learner.learn_from_edit(&anonymous, "other").unwrap(), None);

        assert!(learner.entries().is_empty());
    }

    #[test]
    fn test_json_store_persists_every_put() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut learner = PreferenceLearner::new(JsonPreferenceStore::open(&path).unwrap());
        learner.record("ร้านกาแฟ", "บันเทิง").unwrap();

        let reopened = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get("ร้านกาแฟ"), Some("บันเทิง".to_string()));
        assert_eq!(reopened.map().len(), 1);
    }
}
