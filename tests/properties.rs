//! Behaviour that holds across the parser, aggregation and filter modules.

use bim_assistant::aggregate::{summarize_by_category, summarize_by_thickness, Collector};
use bim_assistant::error::CollectError;
use bim_assistant::filter::{passes, Condition};
use bim_assistant::intent::{Classifier, Intent};
use bim_assistant::model::{ElementRecord, PropertyBag, PropertyValue, ThicknessAggregate};
use bim_assistant::normalize::{resolve_length, Normalizer};
use bim_assistant::parser::{parse_row, Scope};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn record(category: &str, thickness: Option<f64>, volume: Option<f64>) -> ElementRecord {
    ElementRecord {
        thickness,
        volume,
        ..ElementRecord::new(1, category)
    }
}

#[test]
fn oversized_batch_is_rejected_before_parsing() {
    let rows: Vec<Value> = (0..5001)
        .map(|i| json!(format!("{i},\"Wall\",\"Revit 벽\",\"Volume:1\"")))
        .collect();

    let err = Collector::default().collect(&Value::Array(rows), Scope::Generic).unwrap_err();
    assert_eq!(err, CollectError::TooManyRows { count: 5001, max: 5000 });
}

#[test]
fn rows_without_meta_never_reach_aggregates() {
    let rows = json!([
        { "id": 1, "name": "A", "category": "Revit 벽" },
        { "id": 2, "name": "B", "category": "Revit 벽", "meta": "Volume:1.0" },
        "3,\"C\",\"Revit 벽\"",
    ]);

    assert_eq!(parse_row(&rows[0], Scope::Generic, Normalizer::standard()), None);

    let records = Collector::default().collect(&rows, Scope::Generic).unwrap();
    let aggregates = summarize_by_category(&records);
    assert_eq!(aggregates.len(), 1);
    assert_eq!(aggregates[0].count, 1);
}

#[test]
fn thickness_groups_are_ascending_for_any_input_order() {
    let records: Vec<_> = [200.0, 150.0, 150.0, 300.0]
        .into_iter()
        .map(|t| record("Revit 벽", Some(t), Some(1.0)))
        .collect();

    let keys: Vec<i64> = summarize_by_thickness(&records).iter().map(|a| a.thickness).collect();
    assert_eq!(keys, vec![150, 200, 300]);
}

#[test]
fn thickness_grouping_drops_records_without_thickness() {
    let records = vec![
        record("Revit 벽", Some(150.0), Some(2.0)),
        record("Revit 벽", None, Some(5.0)),
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
    let records = vec![record("Wall", None, Some(3.0)), record("Wall", None, None)];

    let aggregates = summarize_by_category(&records);
    assert_eq!(aggregates.len(), 1);
    assert_eq!(aggregates[0].count, 2);
    assert_eq!(aggregates[0].volume, 3.0);
}

#[test]
fn stats_keywords_outrank_show_and_only() {
    let classifier = Classifier::default();
    for message in [
        "벽 두께 체적 표",
        "벽만 보여줘 두께 체적 표로",
        "show only wall thickness volume table",
    ] {
        assert!(
            matches!(classifier.classify(message), Intent::WallStats { .. }),
            "{message}"
        );
    }
}

#[test]
fn message_without_wall_keyword_has_no_intent() {
    assert_eq!(Classifier::default().classify("날씨 어때?"), Intent::None);
}

#[test]
fn missing_value_never_fails_a_range() {
    let bag: PropertyBag = [("Category".to_string(), PropertyValue::from("Revit 벽"))]
        .into_iter()
        .collect();
    let condition = Condition {
        min_volume: Some(10.0),
        min_height: Some(100.0),
        ..Condition::default()
    };

    assert!(passes(&bag, &condition));
}

#[test]
fn delimited_row_round_trips_into_thickness_aggregate() {
    let row = json!(r#"42,"Wall-Interior","Revit 벽","Category:Revit 벽|Thickness:150|Volume:2.500""#);

    let record = parse_row(&row, Scope::Generic, Normalizer::standard()).unwrap();
    assert_eq!(record.id, 42);
    assert_eq!(record.category, "Revit 벽");
    assert_eq!(record.thickness, Some(150.0));
    assert_eq!(record.volume, Some(2.5));

    assert_eq!(
        summarize_by_thickness(&[record]),
        vec![ThicknessAggregate {
            thickness: 150,
            count: 1,
            area: 0.0,
            volume: 2.5,
        }]
    );
}

// Characterisation of the unit-less length heuristic: small magnitudes are
// already metres, large ones are millimetres.
#[test]
fn unitless_length_heuristic() {
    let bag = |value: f64| -> PropertyBag {
        [("Height".to_string(), PropertyValue::from(value))].into_iter().collect()
    };

    assert_eq!(resolve_length(&bag(7.0), &["Height"], None), Some(7.0));
    assert_eq!(resolve_length(&bag(7000.0), &["Height"], None), Some(7.0));
}
