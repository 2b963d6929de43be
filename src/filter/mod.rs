//! Condition filter engine over the property database.

pub mod condition;

pub use condition::{Condition, Keywords, Predicate};

use crate::model::{
    ElementRecord, PropertyBag, PropertyDatabase, PropertyValue, WALL_RECORD_CATEGORY,
};
use crate::normalize::{value_to_metres, Normalizer, StringProfile};
use crate::parser::NAME_KEY;
use tracing::debug;

/// Whether `bag` satisfies `condition` under the built-in field keys.
#[must_use]
pub fn passes(bag: &PropertyBag, condition: &Condition) -> bool {
    passes_with(Normalizer::standard(), bag, condition)
}

/// Whether `bag` satisfies every clause of `condition`.
///
/// A range bound never excludes an element whose value did not resolve.
#[must_use]
pub fn passes_with(normalizer: &Normalizer, bag: &PropertyBag, condition: &Condition) -> bool {
    let profile = StringProfile::build(normalizer, bag);

    let categories = condition.category_terms();
    if !categories.is_empty() && !category_matches(&profile, &categories) {
        return false;
    }

    let include = condition.include_terms();
    if !include.iter().all(|k| profile.searchable_text.contains(k.as_str())) {
        return false;
    }

    let exclude = condition.exclude_keywords.lowered();
    if exclude.iter().any(|k| profile.searchable_text.contains(k.as_str())) {
        return false;
    }

    let levels = condition.level.lowered();
    if !levels.is_empty() {
        let level = normalizer.level.text(bag).unwrap_or_default().to_lowercase();
        if level.is_empty() || !levels.iter().any(|k| level.contains(k.as_str())) {
            return false;
        }
    }

    let materials = condition.material.lowered();
    if !materials.is_empty() {
        let found = normalizer.material.present_texts(bag).iter().any(|value| {
            let value = value.to_lowercase();
            materials.iter().any(|k| value.contains(k.as_str()))
        });
        if !found {
            return false;
        }
    }

    let ranges = [
        (normalizer.height.number(bag), condition.min_height, condition.max_height),
        (normalizer.area.number(bag), condition.min_area, condition.max_area),
        (normalizer.volume.number(bag), condition.min_volume, condition.max_volume),
    ];
    if !ranges.iter().all(|(value, min, max)| within(*value, *min, *max)) {
        return false;
    }

    match &condition.custom_predicate {
        Some(predicate) => predicate.call(bag, &profile),
        None => true,
    }
}

/// Ids of every element in `db` satisfying `condition`, ascending.
#[must_use]
pub fn filter_by_condition(db: &PropertyDatabase, condition: &Condition) -> Vec<u64> {
    filter_by_condition_with(Normalizer::standard(), db, condition)
}

#[must_use]
pub fn filter_by_condition_with(
    normalizer: &Normalizer,
    db: &PropertyDatabase,
    condition: &Condition,
) -> Vec<u64> {
    let ids: Vec<u64> = db
        .iter()
        .filter(|(_, bag)| passes_with(normalizer, bag, condition))
        .map(|(id, _)| *id)
        .collect();
    debug!(matched = ids.len(), total = db.len(), "condition applied");
    ids
}

/// Wall records built from the property database.
///
/// Thickness resolves in millimetres from the thickness keys, then from the
/// element's name or type name. Elements without thickness or volume are
/// left out. Thickness is rounded to a whole millimetre; width and height
/// are in millimetres as well.
#[must_use]
pub fn wall_records(db: &PropertyDatabase, normalizer: &Normalizer) -> Vec<ElementRecord> {
    let mut records = Vec::new();

    for (id, bag) in db {
        let profile = StringProfile::build(normalizer, bag);
        if !normalizer.is_wall_text(&profile.category_text)
            && !normalizer.is_wall_text(&profile.searchable_text)
        {
            continue;
        }

        let name = normalizer.resolve_name(bag);
        let type_name = normalizer.type_name.text(bag).filter(|s| !s.is_empty());
        let Some(thickness) =
            normalizer.thickness_mm(bag, &[name.as_deref(), type_name.as_deref()])
        else {
            debug!(id, "wall without thickness skipped");
            continue;
        };
        let Some(volume) = normalizer.volume.number(bag) else {
            debug!(id, "wall without volume skipped");
            continue;
        };

        records.push(ElementRecord {
            id: *id,
            name: bag
                .get(NAME_KEY)
                .or_else(|| bag.get("Name"))
                .map(PropertyValue::to_trimmed)
                .or(name),
            category: normalizer
                .resolve_category(bag)
                .unwrap_or_else(|| WALL_RECORD_CATEGORY.to_string()),
            type_name,
            level: normalizer.level.text(bag).filter(|s| !s.is_empty()),
            width: normalizer
                .width
                .candidates(bag)
                .find_map(value_to_metres)
                .map(|m| m * 1000.0),
            thickness: Some(thickness.round()),
            height: normalizer.height_m(bag).map(|m| m * 1000.0),
            area: normalizer.area.number(bag),
            volume: Some(volume),
            meta: bag.clone(),
        });
    }

    records
}

fn category_matches(profile: &StringProfile, terms: &[String]) -> bool {
    if profile.category_text.is_empty() {
        return false;
    }
    if terms.iter().any(|t| profile.category_text.contains(t.as_str())) {
        return true;
    }

    profile.categories.iter().any(|actual| {
        let actual = normalize_category(actual);
        !actual.is_empty()
            && terms.iter().any(|term| {
                let term = normalize_category(term);
                !term.is_empty() && (actual.contains(&term) || term.contains(&actual))
            })
    })
}

/// Lower-cases and strips whitespace and the words "revit", "category" and
/// "카테고리" so that "Revit 벽" and "벽" compare equal.
#[must_use]
pub fn normalize_category(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<String>()
        .replace("revit", "")
        .replace("category", "")
        .replace("카테고리", "")
}

fn within(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    let Some(value) = value else {
        return true;
    };
    !min.is_some_and(|min| value < min) && !max.is_some_and(|max| value > max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), PropertyValue::from(*v)))
            .collect()
    }

    fn wall() -> PropertyBag {
        bag(&[
            ("__name", "Basic Wall [301]"),
            ("Category", "Revit Walls"),
            ("Level", "1F"),
            ("Structural Material", "Concrete C24"),
            ("Unconnected Height", "3000 mm"),
            ("Volume", "2.5"),
        ])
    }

    #[test]
    fn empty_condition_passes() {
        assert!(passes(&wall(), &Condition::default()));
    }

    #[test]
    fn category_matches_by_substring_or_normalized_form() {
        let by_substring = Condition {
            category: "walls".into(),
            ..Condition::default()
        };
        let normalized = Condition {
            category: "RevitWalls Category".into(),
            ..Condition::default()
        };
        let other = Condition {
            category: "Doors".into(),
            ..Condition::default()
        };
        assert!(passes(&wall(), &by_substring));
        assert!(passes(&wall(), &normalized));
        assert!(!passes(&wall(), &other));
        assert!(!passes(&bag(&[("Volume", "1")]), &by_substring));
    }

    #[test]
    fn include_and_exclude_keywords_use_searchable_text() {
        let include = Condition {
            include_keywords: vec!["basic".to_string(), "walls".to_string()].into(),
            ..Condition::default()
        };
        let exclude = Condition {
            exclude_keywords: "301".into(),
            ..Condition::default()
        };
        assert!(passes(&wall(), &include));
        assert!(!passes(&wall(), &exclude));
    }

    #[test]
    fn level_and_material_match_substrings() {
        let good = Condition {
            level: "1f".into(),
            material: "concrete".into(),
            ..Condition::default()
        };
        let bad_level = Condition {
            level: "2F".into(),
            ..Condition::default()
        };
        assert!(passes(&wall(), &good));
        assert!(!passes(&wall(), &bad_level));
    }

    #[test]
    fn range_bounds_use_normalized_values() {
        let tall = Condition {
            min_height: Some(3.5),
            ..Condition::default()
        };
        let bulky = Condition {
            min_volume: Some(2.0),
            max_volume: Some(3.0),
            ..Condition::default()
        };
        assert!(!passes(&wall(), &tall));
        assert!(passes(&wall(), &bulky));
    }

    #[test]
    fn missing_values_never_fail_range_bounds() {
        let condition = Condition {
            min_volume: Some(10.0),
            min_area: Some(100.0),
            ..Condition::default()
        };
        assert!(passes(&bag(&[("Name", "Door")]), &condition));
    }

    #[test]
    fn custom_predicate_runs_last() {
        let condition = Condition::default()
            .with_predicate(|bag, profile| bag.contains_key("Level") && !profile.categories.is_empty());
        assert!(passes(&wall(), &condition));
        assert!(!passes(&bag(&[("Level", "1F")]), &condition));
    }

    #[test]
    fn filter_returns_matching_ids() {
        let mut db = PropertyDatabase::new();
        db.insert(2, wall());
        db.insert(1, bag(&[("Category", "Doors")]));
        db.insert(3, wall());

        let condition = Condition {
            category: "wall".into(),
            ..Condition::default()
        };
        assert_eq!(filter_by_condition(&db, &condition), vec![2, 3]);
    }

    #[test]
    fn wall_records_resolve_thickness_in_millimetres() {
        let mut db = PropertyDatabase::new();
        db.insert(
            1,
            bag(&[("__name", "Basic Wall"), ("Category", "Revit 벽"), ("두께", "0.2 m"), ("체적", "1.25")]),
        );
        db.insert(
            2,
            bag(&[("__name", "기본 벽 T150"), ("Category", "Revit 벽"), ("Volume", "0.5")]),
        );
        db.insert(3, bag(&[("__name", "Wall no volume"), ("Width", "200")]));
        db.insert(4, bag(&[("Category", "Doors"), ("Volume", "1")]));

        let records = wall_records(&db, Normalizer::standard());
        let summary: Vec<(u64, Option<f64>, Option<f64>)> =
            records.iter().map(|r| (r.id, r.thickness, r.volume)).collect();
        assert_eq!(summary, vec![(1, Some(200.0), Some(1.25)), (2, Some(150.0), Some(0.5))]);
        assert_eq!(records[0].name.as_deref(), Some("Basic Wall"));
        assert_eq!(records[0].category, "Revit 벽");
    }
}
