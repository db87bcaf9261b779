use crate::core::LayerKind;
use serde::{Deserialize, Serialize};

/// Maps data files to layer kinds during discovery (`[[layers]]`).
///
/// `pattern` is a glob matched against the lowercased file stem. Rules are
/// tried in order and the first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRule {
    pub pattern: String,
    pub kind: LayerKind,

    /// Display name; defaults to the file stem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Fixed color for auxiliary layers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LayerRule {
    pub fn new(pattern: &str, kind: LayerKind, color: Option<&str>) -> Self {
        Self {
            pattern: pattern.to_string(),
            kind,
            name: None,
            color: color.map(str::to_string),
        }
    }
}

pub fn default_layer_rules() -> Vec<LayerRule> {
    vec![
        LayerRule::new("grid*", LayerKind::Grid, None),
        LayerRule::new("*line*", LayerKind::TransmissionLines, None),
        LayerRule::new("*substation*", LayerKind::Substations, Some("blue")),
        LayerRule::new("*rail*", LayerKind::Railways, Some("purple")),
        LayerRule::new("*industr*", LayerKind::IndustrialParks, Some("#8c510a")),
    ]
}
