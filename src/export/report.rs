//! Table and chart payloads for the result renderers.

use crate::aggregate::{CollectionSummary, WallSummary};
use crate::model::{CategoryAggregate, ElementRecord, PropertyDatabase, ThicknessAggregate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    RenderTable,
    RenderChart,
}

/// A titled table; cells are JSON scalars and missing values are empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableAction {
    pub action: RenderKind,
    pub title: String,
    pub description: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Bar chart as parallel label and dataset arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAction {
    pub action: RenderKind,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Every payload derived from a wall summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallReport {
    pub walls: TableAction,
    pub grouped: TableAction,
    pub chart: ChartAction,
}

impl TableAction {
    fn new(title: &str, description: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            action: RenderKind::RenderTable,
            title: title.to_string(),
            description: description.to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
            rows,
        }
    }
}

/// Display text of a table cell.
#[must_use]
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(value: Option<f64>) -> Value {
    value.map_or_else(|| Value::String(String::new()), Value::from)
}

fn text(value: Option<&str>) -> Value {
    Value::String(value.unwrap_or_default().to_string())
}

/// Element list. Wall lists leave out the category column.
#[must_use]
pub fn element_table(records: &[ElementRecord], walls: bool) -> TableAction {
    let rows = records
        .iter()
        .map(|r| {
            let mut row = vec![Value::from(r.id)];
            if !walls {
                row.push(Value::String(r.category.clone()));
            }
            row.extend([
                text(r.level.as_deref()),
                number(r.width),
                number(r.thickness_or_width()),
                number(r.height),
                number(r.volume),
            ]);
            row
        })
        .collect();

    if walls {
        TableAction::new(
            "벽체 목록",
            "추출된 모든 벽체",
            &["ID", "Level", "Width", "Thickness", "Height", "Volume"],
            rows,
        )
    } else {
        TableAction::new(
            "요소 목록",
            "추출된 모든 요소",
            &["ID", "Category", "Level", "Width", "Thickness", "Height", "Volume"],
            rows,
        )
    }
}

#[must_use]
pub fn category_table(aggregates: &[CategoryAggregate]) -> TableAction {
    let rows = aggregates
        .iter()
        .map(|a| {
            vec![
                Value::String(a.category.clone()),
                Value::from(a.count),
                Value::from(a.area),
                Value::from(a.volume),
            ]
        })
        .collect();
    TableAction::new(
        "카테고리별 집계",
        "카테고리별 개수/면적/체적 합계",
        &["Category", "Count", "Area", "Volume"],
        rows,
    )
}

#[must_use]
pub fn thickness_table(aggregates: &[ThicknessAggregate]) -> TableAction {
    let rows = aggregates
        .iter()
        .map(|a| vec![Value::from(a.thickness), Value::from(a.count), Value::from(a.volume)])
        .collect();
    TableAction::new(
        "벽체 두께별 집계",
        "두께별 개수와 체적 합계",
        &["Thickness (mm)", "Count", "Volume (m3)"],
        rows,
    )
}

#[must_use]
pub fn thickness_chart(aggregates: &[ThicknessAggregate]) -> ChartAction {
    ChartAction {
        action: RenderKind::RenderChart,
        chart_type: "bar".to_string(),
        title: "두께별 체적".to_string(),
        labels: aggregates.iter().map(|a| a.thickness.to_string()).collect(),
        datasets: vec![
            Dataset {
                label: "Volume".to_string(),
                data: aggregates.iter().map(|a| a.volume).collect(),
            },
            Dataset {
                label: "Count".to_string(),
                data: aggregates.iter().map(|a| a.count as f64).collect(),
            },
        ],
    }
}

/// One row per id with the requested properties as columns.
#[must_use]
pub fn metadata_table(db: &PropertyDatabase, ids: &[u64], properties: &[String]) -> TableAction {
    let mut columns = vec!["ID".to_string()];
    columns.extend(properties.iter().cloned());

    let rows = ids
        .iter()
        .filter_map(|id| db.get(id).map(|bag| (id, bag)))
        .map(|(id, bag)| {
            let mut row = vec![Value::from(*id)];
            row.extend(properties.iter().map(|p| {
                Value::String(bag.get(p).map(ToString::to_string).unwrap_or_default())
            }));
            row
        })
        .collect();

    TableAction {
        action: RenderKind::RenderTable,
        title: "모델 정보".to_string(),
        description: format!("{}개 요소의 속성", ids.len()),
        columns,
        rows,
    }
}

#[must_use]
pub fn collection_report(summary: &CollectionSummary) -> (TableAction, TableAction) {
    (
        element_table(&summary.records, false),
        category_table(&summary.category_aggregates),
    )
}

#[must_use]
pub fn wall_report(summary: &WallSummary) -> WallReport {
    WallReport {
        walls: element_table(&summary.records, true),
        grouped: thickness_table(&summary.thickness_aggregates),
        chart: thickness_chart(&summary.thickness_aggregates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::wall_summary;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn wall(id: u64, thickness: Option<f64>, width: Option<f64>, volume: f64) -> ElementRecord {
        ElementRecord {
            thickness,
            width,
            volume: Some(volume),
            ..ElementRecord::new(id, "Revit 벽")
        }
    }

    #[test]
    fn wall_table_falls_back_to_width_and_blanks_missing_cells() {
        let table = element_table(&[wall(7, None, Some(200.0), 1.5)], true);
        assert_eq!(table.columns, vec!["ID", "Level", "Width", "Thickness", "Height", "Volume"]);
        assert_eq!(table.rows[0], vec![json!(7), json!(""), json!(200.0), json!(200.0), json!(""), json!(1.5)]);
    }

    #[test]
    fn chart_has_parallel_arrays() {
        let summary = wall_summary(vec![
            wall(1, Some(200.0), None, 1.0),
            wall(2, Some(150.0), None, 2.0),
            wall(3, Some(150.0), None, 0.5),
        ]);
        let chart = thickness_chart(&summary.thickness_aggregates);

        assert_eq!(chart.labels, vec!["150", "200"]);
        assert_eq!(chart.datasets[0].data, vec![2.5, 1.0]);
        assert_eq!(chart.datasets[1].data, vec![2.0, 1.0]);

        let value = serde_json::to_value(&chart).unwrap();
        assert_eq!(value["action"], "render_chart");
        assert_eq!(value["type"], "bar");
    }

    #[test]
    fn metadata_table_skips_unknown_ids() {
        let mut db = PropertyDatabase::new();
        db.insert(1, [("Level".to_string(), "1F".into())].into_iter().collect());

        let table = metadata_table(&db, &[1, 99], &["Level".to_string(), "Volume".to_string()]);
        assert_eq!(table.columns, vec!["ID", "Level", "Volume"]);
        assert_eq!(table.rows, vec![vec![json!(1), json!("1F"), json!("")]]);
        assert_eq!(cell_text(&table.rows[0][0]), "1");
    }
}
