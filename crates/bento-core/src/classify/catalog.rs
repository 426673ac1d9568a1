//! Versioned keyword/weight catalog driving category scoring.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BentoError, Result};
use crate::models::transaction::{INCOME_CATEGORY, OTHER_CATEGORY};

/// One category with its scoring keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category label stored on transactions.
    pub label: String,

    /// Points per matching keyword.
    pub weight: u32,

    /// Case-insensitive substrings that vote for this category.
    pub keywords: Vec<String>,

    /// Words accepted after an explicit category hint in chat input.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CategoryRule {
    pub fn new(label: &str, weight: u32, keywords: &[&str], aliases: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            weight,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Number of distinct keywords found in already-lowercased text.
    pub fn matches(&self, lowered: &str) -> u32 {
        self.keywords
            .iter()
            .filter(|k| lowered.contains(&k.to_lowercase()))
            .count() as u32
    }
}

/// Ordered expense categories. Declaration order breaks score ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub version: String,
    rules: Vec<CategoryRule>,
}

impl CategoryCatalog {
    pub fn new(version: impl Into<String>, rules: Vec<CategoryRule>) -> Self {
        Self {
            version: version.into(),
            rules,
        }
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&content)
            .map_err(|e| BentoError::Config(format!("{}: {}", path.display(), e)))?;
        catalog.check()?;
        Ok(catalog)
    }

    fn check(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.label.trim().is_empty() {
                return Err(BentoError::Config("category with empty label".to_string()));
            }
            if rule.label == INCOME_CATEGORY || rule.label == OTHER_CATEGORY {
                return Err(BentoError::Config(format!(
                    "category label {} is reserved",
                    rule.label
                )));
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Selectable expense labels, catalog order, then the catch-all.
    pub fn labels(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.label.as_str())
            .chain(std::iter::once(OTHER_CATEGORY))
            .collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        label == OTHER_CATEGORY || self.rules.iter().any(|r| r.label == label)
    }

    /// Map a hint word to a label: exact label or alias first, then the
    /// first alias the word starts with.
    pub fn resolve_hint(&self, hint: &str) -> Option<&str> {
        let hint = hint.trim().to_lowercase();
        if hint.is_empty() {
            return None;
        }
        if hint == OTHER_CATEGORY {
            return Some(OTHER_CATEGORY);
        }

        let exact = self.rules.iter().find(|r| {
            r.label.to_lowercase() == hint || r.aliases.iter().any(|a| a.to_lowercase() == hint)
        });
        exact
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.aliases.iter().any(|a| hint.starts_with(&a.to_lowercase())))
            })
            .map(|r| r.label.as_str())
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new(
            "1",
            vec![
                CategoryRule::new(
                    "อาหาร",
                    2,
                    &[
                        "ข้าว", "กิน", "กาแฟ", "ก๋วยเตี๋ยว", "อาหาร", "ชานม", "ขนม", "หมูกระทะ",
                        "ส้มตำ", "food", "coffee", "cafe", "restaurant", "grabfood", "lineman",
                        "foodpanda", "starbucks", "amazon cafe",
                    ],
                    &["อาหาร", "กิน", "food"],
                ),
                CategoryRule::new(
                    "เดินทาง",
                    2,
                    &[
                        "เดินทาง", "แท็กซี่", "taxi", "grab", "bolt", "bts", "mrt", "รถไฟฟ้า",
                        "ทางด่วน", "น้ำมัน", "ปตท", "ptt", "shell", "เชลล์", "บางจาก", "bangchak",
                        "caltex", "esso", "วินมอเตอร์ไซค์", "ค่ารถ", "ตั๋ว",
                    ],
                    &["เดินทาง", "รถ", "travel", "transport"],
                ),
                CategoryRule::new(
                    "ช้อปปิ้ง",
                    1,
                    &[
                        "ซื้อ", "เสื้อ", "รองเท้า", "กระเป๋า", "shopee", "lazada", "ห้าง",
                        "central", "เซ็นทรัล", "lotus", "โลตัส", "big c", "บิ๊กซี", "makro",
                        "แม็คโคร", "7-eleven", "เซเว่น", "shopping", "uniqlo",
                    ],
                    &["ช้อปปิ้ง", "ช้อป", "shopping"],
                ),
                CategoryRule::new(
                    "บันเทิง",
                    1,
                    &[
                        "หนัง", "ภาพยนตร์", "เกม", "game", "netflix", "spotify", "youtube",
                        "คอนเสิร์ต", "concert", "major cineplex", "sf cinema", "คาราโอเกะ",
                        "เหล้า", "เบียร์", "ปาร์ตี้",
                    ],
                    &["บันเทิง", "เที่ยว", "entertainment", "fun"],
                ),
                CategoryRule::new(
                    "บิล/สาธารณูปโภค",
                    2,
                    &[
                        "ค่าไฟ", "ค่าน้ำ", "ไฟฟ้า", "ประปา", "ค่าเน็ต", "อินเทอร์เน็ต",
                        "internet", "ais fibre", "truemove", "true online", "dtac",
                        "ค่าโทรศัพท์", "ค่าโทร", "ค่าเช่า", "ค่าส่วนกลาง", "บิล", "bill",
                    ],
                    &["บิล", "ค่าน้ำค่าไฟ", "bill", "bills"],
                ),
                CategoryRule::new(
                    "สุขภาพ",
                    2,
                    &[
                        "โรงพยาบาล", "รพ.", "คลินิก", "ร้านยา", "ค่ายา", "หมอ", "ทันตกรรม",
                        "hospital", "clinic", "pharmacy", "fitness", "ฟิตเนส",
                    ],
                    &["สุขภาพ", "หาหมอ", "health"],
                ),
                CategoryRule::new(
                    "ประกัน",
                    3,
                    &[
                        "ประกัน", "insurance", "เบี้ยประกัน", "เมืองไทยประกัน", "aia", "fwd",
                        "allianz", "กรุงเทพประกันภัย", "วิริยะ",
                    ],
                    &["ประกัน", "insurance"],
                ),
                CategoryRule::new(
                    "การศึกษา",
                    2,
                    &[
                        "ค่าเทอม", "หนังสือ", "คอร์ส", "course", "เรียน", "tuition", "school",
                        "โรงเรียน", "มหาวิทยาลัย", "udemy",
                    ],
                    &["การศึกษา", "เรียน", "education"],
                ),
                CategoryRule::new(
                    "ลอตเตอรี่",
                    3,
                    &["สลาก", "ลอตเตอรี่", "ล็อตเตอรี่", "lottery", "หวย", "กองสลาก"],
                    &["ลอตเตอรี่", "หวย", "lottery"],
                ),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_labels() {
        let catalog = CategoryCatalog::default();
        let labels = catalog.labels();

        assert_eq!(labels.first(), Some(&"อาหาร"));
        assert_eq!(labels.last(), Some(&OTHER_CATEGORY));
        assert!(!labels.contains(&INCOME_CATEGORY));
        assert!(catalog.contains("ประกัน"));
        assert!(!catalog.contains("unknown"));
    }

    #[test]
    fn test_resolve_hint() {
        let catalog = CategoryCatalog::default();
        assert_eq!(catalog.resolve_hint("กิน"), Some("อาหาร"));
        assert_eq!(catalog.resolve_hint("Travel"), Some("เดินทาง"));
        assert_eq!(catalog.resolve_hint("หวยงวดนี้"), Some("ลอตเตอรี่"));
        assert_eq!(catalog.resolve_hint("other"), Some(OTHER_CATEGORY));
        assert_eq!(catalog.resolve_hint("อะไรก็ได้"), None);
    }

    #[test]
    fn test_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"version": "2", "rules": [{"label": "pets", "weight": 1, "keywords": ["dog food"]}]}"#,
        )
        .unwrap();

        let catalog = CategoryCatalog::from_file(&path).unwrap();
        assert_eq!(catalog.version, "2");
        assert_eq!(catalog.rules()[0].aliases, Vec::<String>::new());
        assert_eq!(catalog.labels(), vec!["pets", OTHER_CATEGORY]);
    }

    #[test]
    fn test_reserved_labels_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"version": "2", "rules": [{"label": "income", "weight": 1, "keywords": []}]}"#,
        )
        .unwrap();

        assert!(CategoryCatalog::from_file(&path).is_err());
    }
}
