//! Collection of row batches into element records, and grouped rollups.

pub mod summary;

pub use summary::{
    collection_summary, summarize_by_category, summarize_by_thickness, wall_summary,
    CollectionSummary, WallSummary,
};

use crate::error::CollectError;
use crate::model::ElementRecord;
use crate::normalize::Normalizer;
use crate::parser::{parse_row, Scope};
use serde_json::Value;
use tracing::{info, warn};

/// Largest row batch accepted by default.
pub const DEFAULT_MAX_ROWS: usize = 5000;

/// Turns row batches into element records under a row ceiling.
#[derive(Debug, Clone)]
pub struct Collector {
    normalizer: Normalizer,
    max_rows: usize,
}

impl Collector {
    #[must_use]
    pub fn new(normalizer: Normalizer, max_rows: usize) -> Self {
        Self {
            normalizer,
            max_rows,
        }
    }

    #[must_use]
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Parses a JSON array of rows, keeping input order and dropping rows
    /// that do not parse.
    ///
    /// The batch is rejected as a whole, before any row is parsed, when it
    /// is not an array, is empty, or holds more rows than the ceiling.
    ///
    /// # Example
    ///
    /// ```
    /// use bim_assistant::aggregate::{summarize_by_thickness, Collector};
    /// use bim_assistant::parser::Scope;
    /// use serde_json::json;
    ///
    /// let rows = json!([r#"42,"Wall-Interior","Revit 벽","Thickness:150|Volume:2.5""#]);
    /// let records = Collector::default().collect(&rows, Scope::Wall)?;
    /// assert_eq!(summarize_by_thickness(&records)[0].thickness, 150);
    /// # Ok::<(), bim_assistant::error::CollectError>(())
    /// ```
    pub fn collect(&self, rows: &Value, scope: Scope) -> Result<Vec<ElementRecord>, CollectError> {
        let Some(rows) = rows.as_array() else {
            warn!("rejecting row batch that is not an array");
            return Err(CollectError::NotAList);
        };
        if rows.len() > self.max_rows {
            warn!(rows = rows.len(), max = self.max_rows, "rejecting oversized row batch");
            return Err(CollectError::TooManyRows {
                count: rows.len(),
                max: self.max_rows,
            });
        }
        if rows.is_empty() {
            warn!("rejecting empty row batch");
            return Err(CollectError::EmptyBatch);
        }

        let records: Vec<ElementRecord> = rows
            .iter()
            .filter_map(|row| parse_row(row, scope, &self.normalizer))
            .collect();

        info!(
            rows = rows.len(),
            records = records.len(),
            scope = ?scope,
            "row batch collected"
        );
        Ok(records)
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(Normalizer::default(), DEFAULT_MAX_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rejects_batches_by_shape() {
        let collector = Collector::default();
        assert_eq!(
            collector.collect(&json!({"rows": []}), Scope::Generic),
            Err(CollectError::NotAList)
        );
        assert_eq!(collector.collect(&json!([]), Scope::Generic), Err(CollectError::EmptyBatch));
    }

    #[test]
    fn rejects_oversized_batch() {
        let collector = Collector::new(Normalizer::default(), 2);
        let rows = json!([
            {"id": 1, "meta": "Volume:1"},
            {"id": 2, "meta": "Volume:1"},
            {"id": 3, "meta": "Volume:1"}
        ]);
        assert_eq!(
            collector.collect(&rows, Scope::Generic),
            Err(CollectError::TooManyRows { count: 3, max: 2 })
        );
    }

    #[test]
    fn keeps_input_order_and_drops_unparseable_rows() {
        let rows = json!([
            {"id": 9, "meta": "Category:Doors"},
            "no,meta",
            {"id": 4, "meta": "Category:Walls"}
        ]);
        let ids: Vec<u64> = Collector::default()
            .collect(&rows, Scope::Generic)
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![9, 4]);
    }
}
