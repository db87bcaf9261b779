//! Priority categories and the breakpoint scale that assigns them.
use crate::style::color::Rgb;
use serde::{Deserialize, Serialize};

/// Ordinal line-priority category. Declaration order is rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityCategory {
    NoPriority,
    LowPriority,
    MidPriority,
    MidHighPriority,
    HighPriority,
}

impl PriorityCategory {
    pub const ALL: [PriorityCategory; 5] = [
        PriorityCategory::NoPriority,
        PriorityCategory::LowPriority,
        PriorityCategory::MidPriority,
        PriorityCategory::MidHighPriority,
        PriorityCategory::HighPriority,
    ];

    /// Get category label for display
    pub fn label(&self) -> &'static str {
        match self {
            PriorityCategory::NoPriority => "No priority",
            PriorityCategory::LowPriority => "Low priority",
            PriorityCategory::MidPriority => "Mid priority",
            PriorityCategory::MidHighPriority => "Mid-High priority",
            PriorityCategory::HighPriority => "High priority",
        }
    }

    /// Get short legend label
    pub fn short_label(&self) -> &'static str {
        match self {
            PriorityCategory::NoPriority => "No priority",
            PriorityCategory::LowPriority => "Low",
            PriorityCategory::MidPriority => "Mid",
            PriorityCategory::MidHighPriority => "Mid-High",
            PriorityCategory::HighPriority => "High",
        }
    }

    /// Zero-based rank, 0 for "No priority".
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for PriorityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One bucket of the scale: scores up to and including `upper_bound`.
/// The last band has no upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityBand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    pub category: PriorityCategory,
    pub color: String,
}

impl PriorityBand {
    pub fn new(upper_bound: Option<f64>, category: PriorityCategory, color: &str) -> Self {
        Self {
            upper_bound,
            category,
            color: color.to_string(),
        }
    }

    fn contains(&self, score: f64) -> bool {
        self.upper_bound.is_none_or(|bound| score <= bound)
    }
}

/// Ordered breakpoints mapping scores to categories and legend colors.
///
/// Default breakpoints `[-inf, 0, 1.161e-6, 4.681e-6, 7.093e-6, inf]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityScale {
    pub bands: Vec<PriorityBand>,
}

impl Default for PriorityScale {
    fn default() -> Self {
        Self::new(default_bands())
    }
}

pub fn default_bands() -> Vec<PriorityBand> {
    vec![
        PriorityBand::new(Some(0.0), PriorityCategory::NoPriority, "#d3d3d3"),
        PriorityBand::new(Some(1.161e-6), PriorityCategory::LowPriority, "#ffffcc"),
        PriorityBand::new(Some(4.681e-6), PriorityCategory::MidPriority, "#ffeda0"),
        PriorityBand::new(Some(7.093e-6), PriorityCategory::MidHighPriority, "#feb24c"),
        PriorityBand::new(None, PriorityCategory::HighPriority, "#f03b20"),
    ]
}

impl PriorityScale {
    pub fn new(bands: Vec<PriorityBand>) -> Self {
        Self { bands }
    }

    /// Classify a score.
    ///
    /// Exact zero is checked first and is always "No priority". NaN is
    /// treated like a missing score ("No priority"). Scores past the last
    /// finite bound fall into the open-ended top band.
    pub fn classify(&self, score: f64) -> PriorityCategory {
        if score == 0.0 || score.is_nan() {
            return PriorityCategory::NoPriority;
        }
        self.bands
            .iter()
            .find(|band| band.contains(score))
            .or(self.bands.last())
            .map_or(PriorityCategory::HighPriority, |band| band.category)
    }

    pub fn band(&self, category: PriorityCategory) -> Option<&PriorityBand> {
        self.bands.iter().find(|b| b.category == category)
    }

    /// Legend color for a category; gray when the scale lacks the category.
    pub fn color(&self, category: PriorityCategory) -> &str {
        self.band(category).map_or("#808080", |b| b.color.as_str())
    }

    /// Structural problems with the scale, empty when it is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let categories: Vec<PriorityCategory> = self.bands.iter().map(|b| b.category).collect();
        if categories != PriorityCategory::ALL {
            problems.push(format!(
                "priority bands must list each category once in rank order \
                 (no_priority .. high_priority), found {} band(s)",
                self.bands.len()
            ));
        }

        let (last, bounded) = match self.bands.split_last() {
            Some(split) => split,
            None => return problems,
        };
        if last.upper_bound.is_some() {
            problems.push("the last priority band must not have an upper_bound".to_string());
        }
        for band in bounded {
            match band.upper_bound {
                None => problems.push(format!(
                    "priority band '{}' needs an upper_bound",
                    band.category.label()
                )),
                Some(bound) if !bound.is_finite() => problems.push(format!(
                    "priority band '{}' has a non-finite upper_bound",
                    band.category.label()
                )),
                Some(_) => {}
            }
        }
        let bounds: Vec<f64> = bounded.iter().filter_map(|b| b.upper_bound).collect();
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            problems.push("priority upper_bound values must be strictly increasing".to_string());
        }

        for band in &self.bands {
            if let Err(e) = Rgb::parse(&band.color) {
                problems.push(format!(
                    "priority band '{}' color: {}",
                    band.category.label(),
                    e
                ));
            }
        }
        problems
    }
}
