pub mod csv;
pub mod json;
pub mod report;

pub use crate::error::ExportError;
pub use csv::{export_csv, write_csv};
pub use json::export_json;
pub use report::{
    category_table, cell_text, collection_report, element_table, metadata_table, thickness_chart,
    thickness_table, wall_report, ChartAction, Dataset, RenderKind, TableAction, WallReport,
};
