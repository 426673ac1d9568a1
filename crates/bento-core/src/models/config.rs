//! Configuration structures for the inference engine and its stores.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::classify::CategoryCatalog;
use crate::error::{BentoError, Result};
use crate::ocr::DEFAULT_LANGUAGES;

/// Main configuration for bento.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BentoConfig {
    /// External OCR engine configuration.
    pub ocr: OcrConfig,

    /// Slip extraction configuration.
    pub extraction: ExtractionConfig,

    /// Category classifier configuration.
    pub classifier: ClassifierConfig,

    /// Ledger and preference file locations.
    pub storage: StorageConfig,
}

/// External OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognizer executable.
    pub command: String,

    /// Language hint passed to the recognizer.
    pub languages: String,

    /// Page segmentation mode, if the recognizer supports one.
    pub page_segmentation_mode: Option<u8>,

    /// Additional arguments appended to every invocation.
    pub extra_args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            languages: DEFAULT_LANGUAGES.to_string(),
            page_segmentation_mode: Some(6),
            extra_args: Vec::new(),
        }
    }
}

/// Slip extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Bare numbers below this value (without a decimal point) are penalized
    /// as likely reference digits.
    pub small_amount_threshold: Decimal,

    /// Detect multi-row statements before single-slip extraction.
    pub detect_statements: bool,

    /// Flag drafts that repeat ledger entries.
    pub check_duplicates: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            small_amount_threshold: Decimal::from(100),
            detect_statements: true,
            check_duplicates: true,
        }
    }
}

/// Category classifier configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Custom catalog JSON; the built-in catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
}

/// Ledger and preference file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the data files; platform data dir when unset.
    pub data_dir: Option<PathBuf>,

    /// Ledger file name.
    pub ledger_file: String,

    /// Learned preferences file name.
    pub preferences_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            ledger_file: "ledger.json".to_string(),
            preferences_file: "preferences.json".to_string(),
        }
    }
}

impl BentoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| BentoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the configured category catalog.
    pub fn load_catalog(&self) -> Result<CategoryCatalog> {
        match &self.classifier.catalog_path {
            Some(path) => CategoryCatalog::from_file(path),
            None => Ok(CategoryCatalog::default()),
        }
    }

    /// Resolve the data directory, falling back to `default_dir`.
    pub fn data_dir(&self, default_dir: &Path) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| default_dir.to_path_buf())
    }

    pub fn ledger_path(&self, default_dir: &Path) -> PathBuf {
        self.data_dir(default_dir).join(&self.storage.ledger_file)
    }

    pub fn preferences_path(&self, default_dir: &Path) -> PathBuf {
        self.data_dir(default_dir).join(&self.storage.preferences_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BentoConfig =
            serde_json::from_str(r#"{"ocr": {"languages": "tha"}}"#).unwrap();
        assert_eq!(config.ocr.languages, "tha");
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.extraction.small_amount_threshold, Decimal::from(100));
        assert_eq!(config.storage.ledger_file, "ledger.json");
    }

    #[test]
    fn test_paths() {
        let mut config = BentoConfig::default();
        let fallback = Path::new("/tmp/bento-default");
        assert_eq!(config.ledger_path(fallback), fallback.join("ledger.json"));

        config.storage.data_dir = Some(PathBuf::from("/data"));
        assert_eq!(
            config.preferences_path(fallback),
            PathBuf::from("/data/preferences.json")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = BentoConfig::default();
        config.extraction.detect_statements = false;
        config.save(&path).unwrap();

        let loaded = BentoConfig::from_file(&path).unwrap();
        assert!(!loaded.extraction.detect_statements);
        assert!(loaded.load_catalog().unwrap().rules().len() > 3);
    }
}
