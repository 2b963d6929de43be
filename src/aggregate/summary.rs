use crate::model::{
    CategoryAggregate, ElementRecord, ThicknessAggregate, ThicknessSummary, UNKNOWN_CATEGORY,
};
use crate::normalize::round3;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Records of a generic collection with their per-category rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub records: Vec<ElementRecord>,
    pub category_aggregates: Vec<CategoryAggregate>,
}

/// Wall records with their per-thickness rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSummary {
    pub records: Vec<ElementRecord>,
    pub thickness_aggregates: Vec<ThicknessAggregate>,
    pub grouped_summary: Vec<ThicknessSummary>,
}

#[derive(Default)]
struct Totals {
    count: usize,
    area: f64,
    volume: f64,
}

impl Totals {
    fn add(&mut self, record: &ElementRecord) {
        self.count += 1;
        self.area += record.area.unwrap_or(0.0);
        self.volume += record.volume.unwrap_or(0.0);
    }
}

/// Groups every record by category in first-seen order.
///
/// Records without a category fall under [`UNKNOWN_CATEGORY`]. Missing area
/// or volume adds nothing to the totals but the record is still counted.
#[must_use]
pub fn summarize_by_category(records: &[ElementRecord]) -> Vec<CategoryAggregate> {
    let mut groups: IndexMap<&str, Totals> = IndexMap::new();
    for record in records {
        let key = match record.category.trim() {
            "" => UNKNOWN_CATEGORY,
            category => category,
        };
        groups.entry(key).or_default().add(record);
    }

    groups
        .into_iter()
        .map(|(category, totals)| CategoryAggregate {
            category: category.to_string(),
            count: totals.count,
            area: round3(totals.area),
            volume: round3(totals.volume),
        })
        .collect()
}

/// Groups records by thickness rounded to whole millimetres, ascending.
///
/// Records without a thickness are left out entirely.
#[must_use]
pub fn summarize_by_thickness(records: &[ElementRecord]) -> Vec<ThicknessAggregate> {
    let mut groups: BTreeMap<i64, Totals> = BTreeMap::new();
    for record in records {
        let Some(thickness) = record.thickness else {
            continue;
        };
        groups.entry(thickness.round() as i64).or_default().add(record);
    }

    groups
        .into_iter()
        .map(|(thickness, totals)| ThicknessAggregate {
            thickness,
            count: totals.count,
            area: round3(totals.area),
            volume: round3(totals.volume),
        })
        .collect()
}

#[must_use]
pub fn collection_summary(records: Vec<ElementRecord>) -> CollectionSummary {
    CollectionSummary {
        category_aggregates: summarize_by_category(&records),
        records,
    }
}

#[must_use]
pub fn wall_summary(records: Vec<ElementRecord>) -> WallSummary {
    let thickness_aggregates = summarize_by_thickness(&records);
    WallSummary {
        grouped_summary: thickness_aggregates.iter().map(ThicknessSummary::from).collect(),
        thickness_aggregates,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: u64, category: &str, thickness: Option<f64>, volume: Option<f64>) -> ElementRecord {
        ElementRecord {
            thickness,
            volume,
            ..ElementRecord::new(id, category)
        }
    }

    #[test]
    fn thickness_groups_are_sorted_ascending() {
        let records = [
            record(1, "Wall", Some(200.0), Some(1.0)),
            record(2, "Wall", Some(150.0), Some(1.0)),
            record(3, "Wall", Some(150.4), Some(0.5)),
            record(4, "Wall", Some(300.0), None),
        ];

        let keys: Vec<i64> = summarize_by_thickness(&records).iter().map(|a| a.thickness).collect();
        assert_eq!(keys, vec![150, 200, 300]);
        assert_eq!(summarize_by_thickness(&records)[0].count, 2);
        assert_eq!(summarize_by_thickness(&records)[0].volume, 1.5);
    }

    #[test]
    fn thickness_grouping_skips_records_without_thickness() {
        let records = [
            record(1, "Wall", Some(150.0), Some(2.0)),
            record(2, "Wall", None, Some(5.0)),
        ];

        assert_eq!(
            summarize_by_thickness(&records),
            vec![ThicknessAggregate {
                thickness: 150,
                count: 1,
                area: 0.0,
                volume: 2.0,
            }]
        );
    }

    #[test]
    fn category_grouping_counts_records_without_volume() {
        let records = [
            record(1, "Wall", None, Some(3.0)),
            record(2, "Wall", None, None),
        ];

        assert_eq!(
            summarize_by_category(&records),
            vec![CategoryAggregate {
                category: "Wall".to_string(),
                count: 2,
                area: 0.0,
                volume: 3.0,
            }]
        );
    }

    #[test]
    fn category_groups_keep_first_seen_order() {
        let records = [
            record(1, "Walls", None, None),
            record(2, "Doors", None, None),
            record(3, "", None, None),
            record(4, "Walls", None, None),
        ];

        let categories: Vec<String> = summarize_by_category(&records)
            .into_iter()
            .map(|a| a.category)
            .collect();
        assert_eq!(categories, vec!["Walls", "Doors", UNKNOWN_CATEGORY]);
    }

    #[test]
    fn totals_are_rounded_to_three_places() {
        let records = [
            record(1, "Wall", Some(100.0), Some(0.1)),
            record(2, "Wall", Some(100.0), Some(0.2)),
        ];
        assert_eq!(summarize_by_category(&records)[0].volume, 0.3);
    }

    #[test]
    fn wall_summary_names_chart_fields_by_unit() {
        let summary = wall_summary(vec![record(1, "Wall", Some(150.0), Some(2.5))]);
        assert_eq!(
            summary.grouped_summary,
            vec![ThicknessSummary {
                thickness_mm: 150,
                count: 1,
                volume_sum_m3: 2.5,
            }]
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("thicknessAggregates").is_some());
        assert_eq!(json["groupedSummary"][0]["thickness_mm"], 150);
    }
}
