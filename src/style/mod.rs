//! Per-feature map styling.
//!
//! A [`StyleResolver`] is built once per layer from configuration and then
//! maps each feature to a [`StyleDescriptor`] without touching shared state.

pub mod color;
mod resolver;

pub use color::Rgb;
pub use resolver::{LegendEntry, StyleResolver, ThresholdHighlight};

use serde::{Deserialize, Serialize};

/// Renderer-facing style of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub fill_color: String,
    pub stroke_color: String,
    pub weight: f64,
    pub opacity: f64,
}

/// How a resolver picks the fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Linear ramp over the range of a numeric column
    Continuous,
    /// Voltage tiers on line features
    Voltage,
    /// Construction status on line features
    Status,
    /// Line priority category
    Priority,
    /// One color for the whole layer
    Fixed,
}

impl ColorMode {
    pub fn label(&self) -> &'static str {
        match self {
            ColorMode::Continuous => "continuous",
            ColorMode::Voltage => "voltage",
            ColorMode::Status => "status",
            ColorMode::Priority => "priority",
            ColorMode::Fixed => "fixed",
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
