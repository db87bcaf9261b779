use super::tiers::{PriorityCategory, PriorityScale};
use crate::core::Feature;
use serde::{Deserialize, Serialize};

/// Per-category totals over a line layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: PriorityCategory,
    pub line_count: usize,
    pub total_cost: f64,
    pub total_connections: f64,
}

impl CategorySummary {
    fn empty(category: PriorityCategory) -> Self {
        Self {
            category,
            line_count: 0,
            total_cost: 0.0,
            total_connections: 0.0,
        }
    }
}

/// Group lines by priority category.
///
/// Always returns one row per category in rank order, including empty
/// ones. A line with a missing or non-numeric score counts as "No
/// priority"; a missing cost or connection value contributes zero.
pub fn aggregate_by_category(
    features: &[Feature],
    scale: &PriorityScale,
    score_attr: &str,
    cost_attr: &str,
    connections_attr: &str,
) -> Vec<CategorySummary> {
    let mut rows: Vec<CategorySummary> = PriorityCategory::ALL
        .iter()
        .map(|&c| CategorySummary::empty(c))
        .collect();

    for feature in features {
        let category = feature
            .number(score_attr)
            .map_or(PriorityCategory::NoPriority, |s| scale.classify(s));
        let row = &mut rows[category.rank()];
        row.line_count += 1;
        row.total_cost += feature.number(cost_attr).unwrap_or(0.0);
        row.total_connections += feature.number(connections_attr).unwrap_or(0.0);
    }

    rows
}
