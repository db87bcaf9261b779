use super::Feature;
use crate::io::crs::Crs;
use serde::{Deserialize, Serialize};

/// What a layer depicts; drives default styling and tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Polygon grid cells with scenario-value columns
    Grid,
    /// Transmission lines (existing or greenfield with priority scores)
    TransmissionLines,
    Substations,
    Railways,
    IndustrialParks,
    Other,
}

impl LayerKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grid => "Grid",
            Self::TransmissionLines => "Transmission lines",
            Self::Substations => "Substations",
            Self::Railways => "Railways",
            Self::IndustrialParks => "Industrial parks",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    pub crs: Crs,
    pub features: Vec<Feature>,
}

impl Layer {
    pub fn new(name: impl Into<String>, kind: LayerKind, crs: Crs, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            kind,
            crs,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Finite numeric values of `column`, in feature order. Features where
    /// the column is absent or non-numeric are skipped.
    pub fn column_values(&self, column: &str) -> Vec<f64> {
        self.features
            .iter()
            .filter_map(|f| f.number(column))
            .collect()
    }

    /// True when at least one feature carries `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.features.iter().any(|f| f.has_attribute(column))
    }
}
