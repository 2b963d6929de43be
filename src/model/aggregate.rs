use serde::Serialize;

/// Per-category rollup. `area` and `volume` are totals rounded to 3 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub count: usize,
    pub area: f64,
    pub volume: f64,
}

/// Per-thickness rollup keyed by thickness rounded to whole millimetres.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThicknessAggregate {
    pub thickness: i64,
    pub count: usize,
    pub area: f64,
    pub volume: f64,
}

/// Chart-facing row of a thickness rollup, named for its units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThicknessSummary {
    pub thickness_mm: i64,
    pub count: usize,
    pub volume_sum_m3: f64,
}

impl From<&ThicknessAggregate> for ThicknessSummary {
    fn from(agg: &ThicknessAggregate) -> Self {
        Self {
            thickness_mm: agg.thickness,
            count: agg.count,
            volume_sum_m3: agg.volume,
        }
    }
}
