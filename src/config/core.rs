use serde::{Deserialize, Serialize};

use super::layers::{default_layer_rules, LayerRule};
use super::style::StyleConfig;
use super::thresholds::ThresholdsConfig;
use crate::error::Result;
use crate::io::crs::Crs;
use crate::priority::tiers::default_bands;
use crate::priority::{PriorityBand, PriorityScale};
use crate::scenario::ScenarioCatalog;

/// Root configuration structure for gridplan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridplanConfig {
    /// Scenario label to grid column mapping
    #[serde(default)]
    pub scenarios: ScenarioCatalog,

    /// Line priority attributes and breakpoints
    #[serde(default)]
    pub priority: PriorityConfig,

    /// Map styling
    #[serde(default)]
    pub style: StyleConfig,

    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub input: InputConfig,

    /// Layer discovery rules
    #[serde(default = "default_layer_rules")]
    pub layers: Vec<LayerRule>,
}

impl Default for GridplanConfig {
    fn default() -> Self {
        Self {
            scenarios: ScenarioCatalog::default(),
            priority: PriorityConfig::default(),
            style: StyleConfig::default(),
            thresholds: ThresholdsConfig::default(),
            input: InputConfig::default(),
            layers: default_layer_rules(),
        }
    }
}

/// Attribute names and breakpoints for line prioritisation (`[priority]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityConfig {
    #[serde(default = "default_score_attr")]
    pub score_attr: String,

    #[serde(default = "default_cost_attr")]
    pub cost_attr: String,

    #[serde(default = "default_connections_attr")]
    pub connections_attr: String,

    /// Ordered bands, one per category, the last without `upper_bound`
    #[serde(default = "default_bands")]
    pub bands: Vec<PriorityBand>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            score_attr: default_score_attr(),
            cost_attr: default_cost_attr(),
            connections_attr: default_connections_attr(),
            bands: default_bands(),
        }
    }
}

impl PriorityConfig {
    pub fn scale(&self) -> PriorityScale {
        PriorityScale::new(self.bands.clone())
    }
}

fn default_score_attr() -> String {
    "line_prior".to_string()
}

fn default_cost_attr() -> String {
    "cost".to_string()
}

fn default_connections_attr() -> String {
    "connections".to_string()
}

/// Input handling (`[input]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// CRS assumed for layers that do not declare one, e.g. `"EPSG:32636"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_crs: Option<String>,
}

impl InputConfig {
    pub fn default_crs(&self) -> Result<Option<Crs>> {
        self.default_crs.as_deref().map(Crs::parse).transpose()
    }
}
