//! Ordered detector cascade. The first rule that fires decides the intent.

use super::action::{GroupBy, Intent, MetadataRequest, Mode, ViewKind};
use super::vocabulary::Vocabulary;
use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

// "mm" is tried before "m" so that "7000mm" keeps its unit.
static HEIGHT_FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(mm|m)").expect("height filter pattern"));

/// Derived property lists of this size or smaller count as small.
const SMALL_PROPERTY_SET: usize = 4;

/// A chat message with its lower-cased form.
#[derive(Debug, Clone)]
pub struct Message<'a> {
    pub raw: &'a str,
    pub lower: String,
}

impl<'a> Message<'a> {
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    #[must_use]
    pub fn has_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        keywords
            .iter()
            .any(|k| !k.as_ref().is_empty() && self.lower.contains(k.as_ref()))
    }
}

/// One predicate-to-intent rule.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub detect: fn(&Vocabulary, &Message<'_>) -> Option<Intent>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Rules in priority order. Wall stats outrank the isolate rule so that a
/// full stats request is never read as a view command.
pub const RULES: &[Rule] = &[
    Rule {
        name: "wall_stats",
        detect: wall_stats,
    },
    Rule {
        name: "wall_isolate",
        detect: wall_isolate,
    },
    Rule {
        name: "wall_metadata",
        detect: wall_metadata,
    },
];

/// Wall + thickness + volume + table keywords.
#[must_use]
pub fn wall_stats(vocab: &Vocabulary, msg: &Message<'_>) -> Option<Intent> {
    let fires = msg.has_any(&vocab.wall)
        && msg.has_any(&vocab.thickness)
        && msg.has_any(&vocab.volume)
        && msg.has_any(&vocab.table);

    fires.then(|| Intent::WallStats {
        category: vocab.wall_category.clone(),
    })
}

/// Wall + show + only keywords, with an optional height threshold.
#[must_use]
pub fn wall_isolate(vocab: &Vocabulary, msg: &Message<'_>) -> Option<Intent> {
    if !(msg.has_any(&vocab.wall) && msg.has_any(&vocab.show) && msg.has_any(&vocab.only)) {
        return None;
    }

    Some(Intent::FilterIsolate {
        category: vocab.wall_category.clone(),
        mode: Mode::Isolate,
        height_mm: height_filter_mm(msg.raw),
    })
}

/// Wall keyword with a table or quantity keyword.
#[must_use]
pub fn wall_metadata(vocab: &Vocabulary, msg: &Message<'_>) -> Option<Intent> {
    if !(msg.has_any(&vocab.wall) && (msg.has_any(&vocab.table) || msg.has_any(&vocab.quantity))) {
        return None;
    }

    let group_by = msg.has_any(&vocab.thickness_group).then_some(GroupBy::Thickness);
    let view = group_by.map(|_| {
        if msg.has_any(&vocab.chart) {
            ViewKind::Chart
        } else {
            ViewKind::Table
        }
    });

    Some(Intent::MetadataRequest(MetadataRequest {
        category: vocab.wall_category.clone(),
        properties: relevant_properties(vocab, msg),
        mode: if msg.has_any(&vocab.hide) {
            Mode::Hide
        } else {
            Mode::Isolate
        },
        group_by,
        view,
    }))
}

/// Properties worth requesting for the message, base set first.
#[must_use]
pub fn relevant_properties(vocab: &Vocabulary, msg: &Message<'_>) -> Vec<String> {
    let mut props: IndexSet<&str> = vocab.base_properties.iter().map(String::as_str).collect();
    let wants_dimensions = msg.has_any(&vocab.dimension);

    for rule in &vocab.property_rules {
        if rule.requires_dimension && !wants_dimensions {
            continue;
        }
        if msg.has_any(&rule.triggers) {
            props.extend(rule.properties.iter().map(String::as_str));
        }
    }

    if props.len() <= SMALL_PROPERTY_SET && msg.has_any(&vocab.info) {
        return vocab.default_properties.clone();
    }
    props.into_iter().map(ToString::to_string).collect()
}

/// Height threshold in millimetres: `"7m"` gives 7000, `"3500 mm"` 3500.
#[must_use]
pub fn height_filter_mm(text: &str) -> Option<f64> {
    let caps = HEIGHT_FILTER.captures(text)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    Some(if unit == "m" { value * 1000.0 } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(rule: fn(&Vocabulary, &Message<'_>) -> Option<Intent>, text: &str) -> Option<Intent> {
        rule(&Vocabulary::default(), &Message::new(text))
    }

    #[test]
    fn stats_rule_needs_all_four_keyword_groups() {
        assert!(run(wall_stats, "벽 두께별 체적 표 만들어줘").is_some());
        assert!(run(wall_stats, "Wall thickness and volume table").is_some());
        assert!(run(wall_stats, "벽 두께 체적 알려줘").is_none());
    }

    #[test]
    fn isolate_rule_reads_height_threshold() {
        assert_eq!(
            run(wall_isolate, "7m 이상 벽만 보여줘"),
            Some(Intent::FilterIsolate {
                category: "Revit 벽".to_string(),
                mode: Mode::Isolate,
                height_mm: Some(7000.0),
            })
        );
        assert_eq!(run(wall_isolate, "벽 보여줘"), None);
        assert_eq!(run(wall_isolate, "show only walls"), run(wall_isolate, "SHOW ONLY WALLS"));
    }

    #[test]
    fn height_units_prefer_millimetres() {
        assert_eq!(height_filter_mm("7000mm"), Some(7000.0));
        assert_eq!(height_filter_mm("3.5 m"), Some(3500.0));
        assert_eq!(height_filter_mm("벽만"), None);
    }

    #[test]
    fn metadata_rule_derives_properties_from_keywords() {
        let Some(Intent::MetadataRequest(request)) = run(wall_metadata, "벽 레벨 높이 목록") else {
            panic!("expected a metadata request");
        };
        assert_eq!(
            request.properties,
            vec![
                "Category", "카테고리", "Name", "이름", "Level", "레벨", "층", "Height",
                "Unconnected Height", "미연결 높이",
            ]
        );
        assert_eq!(request.group_by, None);
        assert_eq!(request.mode, Mode::Isolate);
    }

    #[test]
    fn dimension_properties_need_a_dimension_keyword() {
        let vocab = Vocabulary::default();
        let props = relevant_properties(&vocab, &Message::new("wall type list"));
        assert_eq!(props, vec!["Category", "카테고리", "Name", "이름", "Type", "Type Name", "타입 이름"]);
    }

    #[test]
    fn small_set_with_info_keyword_uses_defaults() {
        let vocab = Vocabulary::default();
        assert_eq!(
            relevant_properties(&vocab, &Message::new("벽 정보 목록")),
            vocab.default_properties
        );
        assert_eq!(relevant_properties(&vocab, &Message::new("벽 목록")).len(), 4);
    }

    #[test]
    fn thickness_grouping_picks_view_and_mode() {
        let Some(Intent::MetadataRequest(request)) = run(wall_metadata, "벽 두께별 수량 차트, 나머지 숨기기")
        else {
            panic!("expected a metadata request");
        };
        assert_eq!(request.group_by, Some(GroupBy::Thickness));
        assert_eq!(request.view, Some(ViewKind::Chart));
        assert_eq!(request.mode, Mode::Hide);
    }
}
