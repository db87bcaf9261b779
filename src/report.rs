//! Command results handed to the output writers.

use crate::core::LayerKind;
use crate::priority::CategorySummary;
use crate::scenario::{Histogram, SummaryStatistics};
use crate::style::{ColorMode, LegendEntry};
use serde::Serialize;
use std::path::PathBuf;

/// Statistics of one scenario column over the grid layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub layer: String,
    pub scenario: String,
    pub column: String,
    /// The requested label was unknown and the fallback scenario was used
    pub fallback_used: bool,
    pub feature_count: usize,
    pub statistics: SummaryStatistics,
    /// Features at or above the threshold
    pub above_threshold: usize,
    /// Features below the threshold or without a value
    pub below_threshold: usize,
    pub histogram: Histogram,
    pub legend: Vec<LegendEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_output: Option<PathBuf>,
}

/// Priority breakdown of a transmission line layer.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityReport {
    pub layer: String,
    pub score_attr: String,
    pub feature_count: usize,
    pub categories: Vec<CategorySummary>,
    pub legend: Vec<LegendEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_output: Option<PathBuf>,
}

impl PriorityReport {
    pub fn total_cost(&self) -> f64 {
        self.categories.iter().map(|c| c.total_cost).sum()
    }

    pub fn total_connections(&self) -> f64 {
        self.categories.iter().map(|c| c.total_connections).sum()
    }
}

/// One discovered and styled layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub kind: LayerKind,
    pub path: PathBuf,
    pub source_crs: String,
    pub feature_count: usize,
    pub mode: ColorMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayersReport {
    pub root: PathBuf,
    pub layers: Vec<LayerSummary>,
}

/// Render a value with enough precision for both normalised scenario
/// values and micro-scale priority scores.
pub fn format_value(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-3 {
        format!("{:.3e}", value)
    } else {
        format!("{:.4}", value)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_use_scientific_notation() {
        assert_eq!(format_value(0.0), "0.0000");
        assert_eq!(format_value(0.8), "0.8000");
        assert_eq!(format_value(1.161e-6), "1.161e-6");
    }

    #[test]
    fn priority_totals_sum_categories() {
        let report = fixtures::priority_report();
        assert_eq!(report.total_cost(), 7.5);
        assert_eq!(report.total_connections(), 300.0);
    }
}
