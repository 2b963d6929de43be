use super::PropertyBag;
use serde::Serialize;

/// Category assigned to generic records whose row and metadata name none.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Category assigned to wall-scoped records whose row and metadata name none.
pub const WALL_RECORD_CATEGORY: &str = "Revit 벽체";

/// Normalized view of one building element.
///
/// Wall records carry `width`, `thickness` and `height` in millimetres while
/// `area` and `volume` stay in m² and m³. Records built from the live
/// property database follow the same convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: u64,
    pub name: Option<String>,
    pub category: String,
    pub type_name: Option<String>,
    pub level: Option<String>,
    pub width: Option<f64>,
    pub thickness: Option<f64>,
    pub height: Option<f64>,
    pub area: Option<f64>,
    pub volume: Option<f64>,
    pub meta: PropertyBag,
}

impl ElementRecord {
    #[must_use]
    pub fn new(id: u64, category: impl Into<String>) -> Self {
        Self {
            id,
            name: None,
            category: category.into(),
            type_name: None,
            level: None,
            width: None,
            thickness: None,
            height: None,
            area: None,
            volume: None,
            meta: PropertyBag::new(),
        }
    }

    /// Thickness for display, falling back to width when no thickness resolved.
    #[must_use]
    pub fn thickness_or_width(&self) -> Option<f64> {
        self.thickness.or(self.width)
    }
}
