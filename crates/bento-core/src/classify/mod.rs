//! Category classification: keyword scoring plus learned overrides.

pub mod catalog;
pub mod preferences;

pub use catalog::{CategoryCatalog, CategoryRule};
pub use preferences::{
    normalize_counterparty, JsonPreferenceStore, PreferenceLearner, PreferenceMap, PreferenceStore,
};

use tracing::trace;

use crate::models::transaction::{TransactionKind, INCOME_CATEGORY, OTHER_CATEGORY};

/// Maps free text and an optional counterparty to a category label.
///
/// The catalog and the preference store are owned by the classifier, so two
/// classifiers never share hidden state.
#[derive(Debug, Clone, Default)]
pub struct CategoryClassifier<S = PreferenceMap> {
    catalog: CategoryCatalog,
    learner: PreferenceLearner<S>,
}

impl CategoryClassifier<PreferenceMap> {
    /// Classifier with no learned preferences.
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self::with_store(catalog, PreferenceMap::new())
    }
}

impl<S: PreferenceStore> CategoryClassifier<S> {
    pub fn with_store(catalog: CategoryCatalog, store: S) -> Self {
        Self {
            catalog,
            learner: PreferenceLearner::new(store),
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn learner(&self) -> &PreferenceLearner<S> {
        &self.learner
    }

    pub fn learner_mut(&mut self) -> &mut PreferenceLearner<S> {
        &mut self.learner
    }

    /// Classify `text`.
    ///
    /// Income is always [`INCOME_CATEGORY`]. A learned preference for the
    /// counterparty wins next. Otherwise each rule scores matches x weight;
    /// the first strictly highest positive score wins, else
    /// [`OTHER_CATEGORY`].
    pub fn classify(&self, text: &str, kind: TransactionKind, counterparty: Option<&str>) -> String {
        if kind == TransactionKind::Income {
            return INCOME_CATEGORY.to_string();
        }

        if let Some(category) = counterparty.and_then(|c| self.learner.lookup(c)) {
            trace!("Preference hit for {:?}: {}", counterparty, category);
            return category;
        }

        let mut best: Option<(&str, u32)> = None;
        for (label, score) in self.scores(text) {
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((label, score));
            }
        }

        best.map_or_else(|| OTHER_CATEGORY.to_string(), |(label, _)| label.to_string())
    }

    /// Score of every catalog rule against `text`, catalog order.
    pub fn scores<'c>(&'c self, text: &str) -> Vec<(&'c str, u32)> {
        let lowered = text.to_lowercase();
        self.catalog
            .rules()
            .iter()
            .map(|rule| (rule.label.as_str(), rule.matches(&lowered).saturating_mul(rule.weight)))
            .collect()
    }

    /// Category named by an explicit hint word, if any.
    pub fn resolve_hint(&self, hint: &str) -> Option<&str> {
        self.catalog.resolve_hint(hint)
    }
}
