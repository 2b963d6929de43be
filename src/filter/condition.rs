use crate::model::PropertyBag;
use crate::normalize::StringProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One keyword or a list of them. Blank entries are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct Keywords(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Nothing,
    One(String),
    Many(Vec<Option<String>>),
}

impl From<OneOrMany> for Keywords {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Nothing => Self::default(),
            OneOrMany::One(keyword) => Self::from(keyword),
            OneOrMany::Many(keywords) => keywords.into_iter().flatten().collect(),
        }
    }
}

impl Keywords {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|k| k.trim().is_empty())
    }

    /// Trimmed, lower-cased, non-blank keywords.
    #[must_use]
    pub fn lowered(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, keywords: I) {
        self.0.extend(keywords);
    }
}

impl From<&str> for Keywords {
    fn from(keyword: &str) -> Self {
        Self(vec![keyword.to_string()])
    }
}

impl From<String> for Keywords {
    fn from(keyword: String) -> Self {
        Self(vec![keyword])
    }
}

impl From<Vec<String>> for Keywords {
    fn from(keywords: Vec<String>) -> Self {
        Self(keywords)
    }
}

impl FromIterator<String> for Keywords {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

type PredicateFn = dyn Fn(&PropertyBag, &StringProfile) -> bool + Send + Sync;

/// Caller-supplied check run after every other clause.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&PropertyBag, &StringProfile) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn call(&self, bag: &PropertyBag, profile: &StringProfile) -> bool {
        (self.0)(bag, profile)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Element query. Every clause is optional and all present clauses must
/// hold. Heights are in metres, areas in m² and volumes in m³.
///
/// Field names are accepted in camelCase or snake_case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Condition {
    pub category: Keywords,
    #[serde(alias = "category_keywords")]
    pub category_keywords: Keywords,
    #[serde(alias = "include_keywords")]
    pub include_keywords: Keywords,
    #[serde(alias = "exclude_keywords")]
    pub exclude_keywords: Keywords,
    /// Extra include keyword.
    #[serde(alias = "name_contains", skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    pub level: Keywords,
    pub material: Keywords,
    #[serde(alias = "min_height", skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(alias = "max_height", skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    #[serde(alias = "min_area", skip_serializing_if = "Option::is_none")]
    pub min_area: Option<f64>,
    #[serde(alias = "max_area", skip_serializing_if = "Option::is_none")]
    pub max_area: Option<f64>,
    #[serde(alias = "min_volume", skip_serializing_if = "Option::is_none")]
    pub min_volume: Option<f64>,
    #[serde(alias = "max_volume", skip_serializing_if = "Option::is_none")]
    pub max_volume: Option<f64>,
    #[serde(skip)]
    pub custom_predicate: Option<Predicate>,
}

impl Condition {
    /// Category keywords from both category clauses, lower-cased.
    #[must_use]
    pub fn category_terms(&self) -> Vec<String> {
        let mut terms = self.category.lowered();
        terms.extend(self.category_keywords.lowered());
        terms
    }

    /// Include keywords plus `name_contains`, lower-cased.
    #[must_use]
    pub fn include_terms(&self) -> Vec<String> {
        let mut terms = self.include_keywords.lowered();
        if let Some(name) = self.name_contains.as_deref() {
            terms.extend(Keywords::from(name).lowered());
        }
        terms
    }

    #[must_use]
    pub fn with_predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&PropertyBag, &StringProfile) -> bool + Send + Sync + 'static,
    {
        self.custom_predicate = Some(Predicate::new(f));
        self
    }
}
