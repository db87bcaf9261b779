use crate::core::Layer;
use crate::error::{GridplanError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A planning scenario and the grid column holding its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    pub column: String,
}

impl Scenario {
    pub fn new(label: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            column: column.into(),
        }
    }
}

/// Outcome of a lenient lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Label of the scenario actually used
    pub label: &'a str,
    pub column: &'a str,
    /// True when the requested label was unknown and the fallback was used
    pub fallback_used: bool,
}

/// Scenario label to column mapping, with a designated fallback scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    /// Label of the scenario used when a lookup misses
    #[serde(default = "default_fallback")]
    pub fallback: String,

    #[serde(default = "default_mappings")]
    pub mappings: Vec<Scenario>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            mappings: default_mappings(),
        }
    }
}

fn default_fallback() -> String {
    "Base Case".to_string()
}

fn default_mappings() -> Vec<Scenario> {
    vec![
        Scenario::new("Base Case", "scenario_1"),
        Scenario::new("Industrial scenario", "scenario_2"),
        Scenario::new("Socio-environmental scenario", "scenario_3"),
    ]
}

impl ScenarioCatalog {
    pub fn new(fallback: impl Into<String>, mappings: Vec<Scenario>) -> Self {
        Self {
            fallback: fallback.into(),
            mappings,
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.mappings.iter().map(|s| s.label.as_str())
    }

    /// Exact lookup; labels compare case-insensitively after trimming.
    pub fn find(&self, label: &str) -> Option<&Scenario> {
        let wanted = label.trim();
        self.mappings
            .iter()
            .find(|s| s.label.eq_ignore_ascii_case(wanted))
    }

    /// Lenient lookup: an unknown label silently degrades to the fallback
    /// scenario. A warning is logged and `fallback_used` is set.
    ///
    /// A catalog whose fallback label is itself missing resolves to the
    /// first mapping; `validate` rejects such catalogs up front.
    pub fn resolve(&self, label: &str) -> Resolution<'_> {
        if let Some(scenario) = self.find(label) {
            return Resolution {
                label: &scenario.label,
                column: &scenario.column,
                fallback_used: false,
            };
        }

        let fallback = self.find(&self.fallback).or_else(|| self.mappings.first());
        tracing::warn!(
            requested = label,
            fallback = fallback.map(|s| s.label.as_str()).unwrap_or(""),
            "unknown scenario label, using fallback scenario"
        );
        Resolution {
            label: fallback.map_or("", |s| s.label.as_str()),
            column: fallback.map_or("", |s| s.column.as_str()),
            fallback_used: true,
        }
    }

    /// Column for `label`, falling back to the default scenario's column.
    pub fn resolve_column(&self, label: &str) -> &str {
        self.resolve(label).column
    }

    /// Strict lookup: unknown labels are a configuration error.
    pub fn resolve_strict(&self, label: &str) -> Result<&str> {
        self.find(label).map(|s| s.column.as_str()).ok_or_else(|| {
            GridplanError::config_with_field(
                format!(
                    "unknown scenario '{}' (known: {})",
                    label.trim(),
                    self.labels().collect::<Vec<_>>().join(", ")
                ),
                "scenario",
            )
        })
    }

    /// Structural problems with the catalog, empty when it is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.mappings.is_empty() {
            problems.push("scenarios.mappings must define at least one scenario".to_string());
        }

        let mut labels = HashSet::new();
        let mut columns = HashSet::new();
        for scenario in &self.mappings {
            if scenario.label.trim().is_empty() {
                problems.push("scenario label must not be empty".to_string());
            } else if !labels.insert(scenario.label.trim().to_lowercase()) {
                problems.push(format!("duplicate scenario label '{}'", scenario.label));
            }
            if scenario.column.trim().is_empty() {
                problems.push(format!("scenario '{}' has an empty column", scenario.label));
            } else if !columns.insert(scenario.column.as_str()) {
                problems.push(format!(
                    "column '{}' is mapped by more than one scenario",
                    scenario.column
                ));
            }
        }

        if !self.mappings.is_empty() && self.find(&self.fallback).is_none() {
            problems.push(format!(
                "fallback scenario '{}' is not one of the mapped scenarios",
                self.fallback
            ));
        }
        problems
    }

    /// Scenario columns that no feature of `layer` carries.
    pub fn missing_columns<'a>(&'a self, layer: &Layer) -> Vec<&'a str> {
        self.mappings
            .iter()
            .map(|s| s.column.as_str())
            .filter(|column| !layer.has_column(column))
            .collect()
    }
}
