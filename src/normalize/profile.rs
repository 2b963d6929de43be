use super::Normalizer;
use crate::model::PropertyBag;
use indexmap::IndexSet;

/// Searchable text derived from one property bag's category and name keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringProfile {
    /// Distinct category values, in candidate-key order.
    pub categories: Vec<String>,
    /// Distinct name values followed by any category values not already listed.
    pub searchable: Vec<String>,
    /// Lower-cased category values joined with `" | "`.
    pub category_text: String,
    /// Lower-cased searchable values joined with `" | "`.
    pub searchable_text: String,
}

impl StringProfile {
    #[must_use]
    pub fn build(normalizer: &Normalizer, bag: &PropertyBag) -> Self {
        let categories: IndexSet<String> =
            normalizer.category.present_texts(bag).into_iter().collect();

        let mut searchable: IndexSet<String> =
            normalizer.name.present_texts(bag).into_iter().collect();
        searchable.extend(categories.iter().cloned());

        let join_lower = |values: &IndexSet<String>| {
            values
                .iter()
                .map(|v| v.to_lowercase())
                .collect::<Vec<_>>()
                .join(" | ")
        };

        Self {
            category_text: join_lower(&categories),
            searchable_text: join_lower(&searchable),
            categories: categories.into_iter().collect(),
            searchable: searchable.into_iter().collect(),
        }
    }
}
