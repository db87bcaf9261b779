use serde::{Deserialize, Serialize};

/// Lower bound (inclusive) of a voltage tier and its line color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageTier {
    pub min_kv: f64,
    pub color: String,
}

impl VoltageTier {
    pub fn new(min_kv: f64, color: &str) -> Self {
        Self {
            min_kv,
            color: color.to_string(),
        }
    }
}

/// Border emphasis for features at or above the active threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_highlight_enabled")]
    pub enabled: bool,

    #[serde(default = "default_highlight_color")]
    pub color: String,

    /// Minimum stroke weight of a highlighted feature. Strokes that are
    /// already heavier are doubled instead.
    #[serde(default = "default_highlight_weight")]
    pub weight: f64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: default_highlight_enabled(),
            color: default_highlight_color(),
            weight: default_highlight_weight(),
        }
    }
}

fn default_highlight_enabled() -> bool {
    true
}

fn default_highlight_color() -> String {
    "#000000".to_string()
}

fn default_highlight_weight() -> f64 {
    2.0
}

/// Map styling configuration (`[style]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Color of the lowest value of the continuous ramp
    #[serde(default = "default_ramp_low")]
    pub ramp_low: String,

    /// Color of the highest value of the continuous ramp
    #[serde(default = "default_ramp_high")]
    pub ramp_high: String,

    /// Fill for features whose styling attribute is missing
    #[serde(default = "default_unknown_color")]
    pub unknown_color: String,

    #[serde(default = "default_polygon_weight")]
    pub polygon_weight: f64,

    #[serde(default = "default_polygon_opacity")]
    pub polygon_opacity: f64,

    #[serde(default = "default_line_weight")]
    pub line_weight: f64,

    #[serde(default = "default_line_opacity")]
    pub line_opacity: f64,

    #[serde(default = "default_voltage_attr")]
    pub voltage_attr: String,

    #[serde(default = "default_status_attr")]
    pub status_attr: String,

    /// Tiers checked from the highest `min_kv` down
    #[serde(default = "default_voltage_tiers")]
    pub voltage_tiers: Vec<VoltageTier>,

    /// Color of lines below the lowest tier
    #[serde(default = "default_voltage_base_color")]
    pub voltage_base_color: String,

    #[serde(default = "default_status_existing")]
    pub status_existing: String,

    #[serde(default = "default_status_under_construction")]
    pub status_under_construction: String,

    #[serde(default = "default_status_other")]
    pub status_other: String,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            ramp_low: default_ramp_low(),
            ramp_high: default_ramp_high(),
            unknown_color: default_unknown_color(),
            polygon_weight: default_polygon_weight(),
            polygon_opacity: default_polygon_opacity(),
            line_weight: default_line_weight(),
            line_opacity: default_line_opacity(),
            voltage_attr: default_voltage_attr(),
            status_attr: default_status_attr(),
            voltage_tiers: default_voltage_tiers(),
            voltage_base_color: default_voltage_base_color(),
            status_existing: default_status_existing(),
            status_under_construction: default_status_under_construction(),
            status_other: default_status_other(),
            highlight: HighlightConfig::default(),
        }
    }
}

fn default_ramp_low() -> String {
    "white".to_string()
}

fn default_ramp_high() -> String {
    "red".to_string()
}

fn default_unknown_color() -> String {
    "#808080".to_string()
}

fn default_polygon_weight() -> f64 {
    0.2
}

fn default_polygon_opacity() -> f64 {
    0.7
}

fn default_line_weight() -> f64 {
    3.0
}

fn default_line_opacity() -> f64 {
    0.9
}

fn default_voltage_attr() -> String {
    "voltage_kv".to_string()
}

fn default_status_attr() -> String {
    "status".to_string()
}

pub fn default_voltage_tiers() -> Vec<VoltageTier> {
    vec![VoltageTier::new(220.0, "red"), VoltageTier::new(110.0, "orange")]
}

fn default_voltage_base_color() -> String {
    "green".to_string()
}

fn default_status_existing() -> String {
    "green".to_string()
}

fn default_status_under_construction() -> String {
    "orange".to_string()
}

fn default_status_other() -> String {
    "gray".to_string()
}
