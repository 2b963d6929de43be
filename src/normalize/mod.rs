//! Property normalizer: resolves semantic fields out of free-form,
//! bilingual property bags.

pub mod keys;
pub mod numeric;
pub mod profile;
pub mod resolver;
pub mod thickness;

pub use keys::{FieldKeys, FieldSpec, COMMON_PROPERTIES, WALL_PROPERTIES};
pub use numeric::{
    parse_number, round3, value_to_metres, value_to_millimetres, value_to_number, LengthUnit,
};
pub use profile::StringProfile;
pub use resolver::{resolve_length, resolve_numeric, resolve_string, FieldResolver, Strategy};
pub use thickness::thickness_from_text;

use crate::error::ConfigError;
use crate::model::PropertyBag;
use std::sync::LazyLock;

static STANDARD: LazyLock<Normalizer> = LazyLock::new(|| {
    Normalizer::new(&FieldKeys::default()).expect("built-in field keys compile")
});

/// One compiled resolver per semantic field.
#[derive(Debug, Clone)]
pub struct Normalizer {
    pub category: FieldResolver,
    pub name: FieldResolver,
    pub type_name: FieldResolver,
    pub level: FieldResolver,
    pub material: FieldResolver,
    pub width: FieldResolver,
    pub thickness: FieldResolver,
    pub height: FieldResolver,
    pub area: FieldResolver,
    pub volume: FieldResolver,
    category_backfill: Vec<String>,
    wall_tokens: Vec<String>,
}

impl Normalizer {
    pub fn new(keys: &FieldKeys) -> Result<Self, ConfigError> {
        Ok(Self {
            category: FieldResolver::new(Strategy::Text, &keys.category)?.with_substring_match(),
            name: FieldResolver::new(Strategy::Text, &keys.name)?.with_substring_match(),
            type_name: FieldResolver::new(Strategy::Text, &keys.type_name)?,
            level: FieldResolver::new(Strategy::Text, &keys.level)?,
            material: FieldResolver::new(Strategy::Text, &keys.material)?,
            width: FieldResolver::new(Strategy::Numeric, &keys.width)?,
            thickness: FieldResolver::new(Strategy::Numeric, &keys.thickness)?,
            height: FieldResolver::new(Strategy::Length, &keys.height)?,
            area: FieldResolver::new(Strategy::Numeric, &keys.area)?,
            volume: FieldResolver::new(Strategy::Numeric, &keys.volume)?,
            category_backfill: keys.category_backfill.clone(),
            wall_tokens: keys.wall_tokens.iter().map(|t| t.to_lowercase()).collect(),
        })
    }

    /// Normalizer built from the built-in bilingual key tables.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Category text, matching candidate keys exactly and then by substring.
    #[must_use]
    pub fn resolve_category(&self, bag: &PropertyBag) -> Option<String> {
        non_empty(self.category.text(bag))
    }

    /// Element name, matching candidate keys exactly and then by substring.
    #[must_use]
    pub fn resolve_name(&self, bag: &PropertyBag) -> Option<String> {
        non_empty(self.name.text(bag))
    }

    /// Category a row's own metadata names for itself.
    #[must_use]
    pub fn backfill_category(&self, bag: &PropertyBag) -> Option<String> {
        non_empty(resolve_string(bag, &self.category_backfill))
    }

    /// Thickness as written in the bag, or read out of the given texts.
    #[must_use]
    pub fn thickness_raw(&self, bag: &PropertyBag, texts: &[Option<&str>]) -> Option<f64> {
        self.thickness.number(bag).or_else(|| {
            texts
                .iter()
                .flatten()
                .find_map(|text| thickness_from_text(text))
        })
    }

    /// Thickness in millimetres as a row carries it: written units are
    /// converted and bare numbers are millimetres. Falls back to the texts.
    #[must_use]
    pub fn row_thickness_mm(&self, bag: &PropertyBag, texts: &[Option<&str>]) -> Option<f64> {
        self.thickness
            .candidates(bag)
            .find_map(value_to_millimetres)
            .or_else(|| {
                texts
                    .iter()
                    .flatten()
                    .find_map(|text| thickness_from_text(text))
            })
    }

    /// Thickness in millimetres, with unit hints honoured, or read out of the
    /// given texts.
    #[must_use]
    pub fn thickness_mm(&self, bag: &PropertyBag, texts: &[Option<&str>]) -> Option<f64> {
        self.thickness
            .candidates(bag)
            .find_map(value_to_metres)
            .map(|metres| metres * 1000.0)
            .or_else(|| {
                texts
                    .iter()
                    .flatten()
                    .find_map(|text| thickness_from_text(text))
            })
    }

    /// Height in metres.
    #[must_use]
    pub fn height_m(&self, bag: &PropertyBag) -> Option<f64> {
        self.height.number(bag)
    }

    /// Whether `text` names a wall.
    #[must_use]
    pub fn is_wall_text(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.wall_tokens.iter().any(|t| lower.contains(t.as_str()))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::standard().clone()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;
    use pretty_assertions::assert_eq;

    fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), PropertyValue::from(*v)))
            .collect()
    }

    #[test]
    fn resolves_bilingual_fields() {
        let n = Normalizer::standard();
        let b = bag(&[
            ("카테고리", "Revit 벽"),
            ("이름", "기본 벽"),
            ("체적", "2.5"),
            ("면적", "10,5"),
            ("미연결 높이", "3000"),
        ]);

        assert_eq!(n.resolve_category(&b), Some("Revit 벽".to_string()));
        assert_eq!(n.resolve_name(&b), Some("기본 벽".to_string()));
        assert_eq!(n.volume.number(&b), Some(2.5));
        assert_eq!(n.area.number(&b), Some(10.5));
        assert_eq!(n.height_m(&b), Some(3.0));
    }

    #[test]
    fn thickness_falls_back_to_name_text() {
        let n = Normalizer::standard();
        let b = bag(&[("Category", "Walls")]);
        assert_eq!(n.thickness_raw(&b, &[Some("Basic Wall T180")]), Some(180.0));
        assert_eq!(n.thickness_raw(&b, &[None, Some("Interior")]), None);
    }

    #[test]
    fn thickness_mm_honours_units() {
        let n = Normalizer::standard();
        assert_eq!(n.thickness_mm(&bag(&[("두께", "0.2 m")]), &[]), Some(200.0));
        assert_eq!(n.thickness_mm(&bag(&[("Width", "150")]), &[]), Some(150.0));
    }

    #[test]
    fn width_keys_outrank_thickness_keys() {
        let n = Normalizer::standard();
        let b = bag(&[("Thickness", "180"), ("두께", "190"), ("Width", "200")]);
        assert_eq!(n.thickness_raw(&b, &[]), Some(200.0));
        assert_eq!(n.row_thickness_mm(&b, &[]), Some(200.0));
    }

    #[test]
    fn wall_tokens_are_case_insensitive() {
        let n = Normalizer::standard();
        assert!(n.is_wall_text("Basic WALL"));
        assert!(n.is_wall_text("Revit 벽체"));
        assert!(!n.is_wall_text("Floors"));
    }
}
