use crate::filter::Condition;
use serde::{Deserialize, Serialize};

/// How selected elements are shown in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Isolate,
    Hide,
}

/// Attribute a metadata request groups its rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    Thickness,
}

/// How grouped results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Table,
    Chart,
}

/// A metadata request derived from a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    pub category: String,
    pub properties: Vec<String>,
    pub mode: Mode,
    pub group_by: Option<GroupBy>,
    pub view: Option<ViewKind>,
}

/// Structured reading of one chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Show only the walls, optionally taller than `height_mm`.
    FilterIsolate {
        category: String,
        mode: Mode,
        height_mm: Option<f64>,
    },
    /// Thickness/volume table of the walls.
    WallStats { category: String },
    MetadataRequest(MetadataRequest),
    None,
}

/// Wire name of the action a client should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Filter,
    CalculateWallStats,
    RequestMetadata,
}

/// Height clauses are inclusive, like `Condition::min_height`.
pub const MIN_HEIGHT_OP: &str = ">=";

/// Numeric clause attached to a filter action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub op: String,
    pub value_mm: f64,
}

/// Action object sent back with a chat reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAction {
    pub action: ActionKind,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FieldFilter>>,
}

/// Reply text plus the action, if any, for one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub action: Option<ChatAction>,
}

impl Intent {
    /// Wall category the intent targets, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::FilterIsolate { category, .. } | Self::WallStats { category } => {
                Some(category.as_str())
            }
            Self::MetadataRequest(request) => Some(request.category.as_str()),
            Self::None => None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::FilterIsolate { mode, .. } => *mode,
            Self::MetadataRequest(request) => request.mode,
            Self::WallStats { .. } | Self::None => Mode::Isolate,
        }
    }

    /// Whether the intent asks for a per-thickness rollup.
    #[must_use]
    pub fn wants_thickness_stats(&self) -> bool {
        match self {
            Self::WallStats { .. } => true,
            Self::MetadataRequest(request) => request.group_by == Some(GroupBy::Thickness),
            _ => false,
        }
    }

    #[must_use]
    pub fn to_action(&self) -> Option<ChatAction> {
        match self {
            Self::FilterIsolate {
                category,
                mode,
                height_mm,
            } => Some(ChatAction {
                action: ActionKind::Filter,
                category: category.clone(),
                mode: Some(*mode),
                properties: None,
                group_by: None,
                view: None,
                filters: height_mm.map(|value_mm| {
                    vec![FieldFilter {
                        field: "Height".to_string(),
                        op: MIN_HEIGHT_OP.to_string(),
                        value_mm,
                    }]
                }),
            }),
            Self::WallStats { category } => Some(ChatAction {
                action: ActionKind::CalculateWallStats,
                category: category.clone(),
                mode: None,
                properties: None,
                group_by: None,
                view: None,
                filters: None,
            }),
            Self::MetadataRequest(request) => Some(ChatAction {
                action: if request.group_by.is_some() {
                    ActionKind::CalculateWallStats
                } else {
                    ActionKind::RequestMetadata
                },
                category: request.category.clone(),
                mode: Some(request.mode),
                properties: Some(request.properties.clone()),
                group_by: request.group_by,
                view: request.view,
                filters: None,
            }),
            Self::None => None,
        }
    }

    /// Element filter selecting what the intent talks about. Heights are
    /// compared in metres by the filter engine.
    #[must_use]
    pub fn to_condition(&self) -> Option<Condition> {
        let category = self.category()?;
        let min_height = match self {
            Self::FilterIsolate { height_mm, .. } => height_mm.map(|mm| mm / 1000.0),
            _ => None,
        };
        Some(Condition {
            category: category.into(),
            min_height,
            ..Condition::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn filter_action_serializes_height_clause() {
        let intent = Intent::FilterIsolate {
            category: "Revit 벽".to_string(),
            mode: Mode::Isolate,
            height_mm: Some(7000.0),
        };

        assert_eq!(
            serde_json::to_value(intent.to_action()).unwrap(),
            json!({
                "action": "filter",
                "category": "Revit 벽",
                "mode": "isolate",
                "filters": [{ "field": "Height", "op": ">=", "value_mm": 7000.0 }]
            })
        );
    }

    #[test]
    fn grouped_metadata_request_becomes_wall_stats_action() {
        let intent = Intent::MetadataRequest(MetadataRequest {
            category: "Revit 벽".to_string(),
            properties: vec!["Category".to_string()],
            mode: Mode::Hide,
            group_by: Some(GroupBy::Thickness),
            view: Some(ViewKind::Chart),
        });

        let action = serde_json::to_value(intent.to_action()).unwrap();
        assert_eq!(action["action"], "calculate_wall_stats");
        assert_eq!(action["group_by"], "Thickness");
        assert_eq!(action["view"], "chart");
        assert_eq!(action["mode"], "hide");
        assert!(intent.wants_thickness_stats());
    }

    #[test]
    fn height_filter_converts_to_metres_for_conditions() {
        let intent = Intent::FilterIsolate {
            category: "Revit 벽".to_string(),
            mode: Mode::Isolate,
            height_mm: Some(3500.0),
        };
        let condition = intent.to_condition().unwrap();
        assert_eq!(condition.min_height, Some(3.5));
        assert_eq!(condition.category.to_vec(), vec!["Revit 벽".to_string()]);
        assert!(Intent::None.to_condition().is_none());
    }
}
