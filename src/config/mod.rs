//! Configuration loaded from `.gridplan.toml`.
//!
//! Every section is optional and falls back to defaults that reproduce the
//! standard planning study: three scenarios, five priority bands, a
//! white-to-red ramp and the 220/110 kV voltage tiers.

mod core;
mod layers;
mod loader;
mod style;
mod thresholds;
pub mod validation;

pub use core::{GridplanConfig, InputConfig, PriorityConfig};
pub use layers::{default_layer_rules, LayerRule};
pub use loader::{
    directory_ancestors, find_config_file, load_config, load_config_from, parse_config,
    user_config_file, CONFIG_FILE_NAME,
};
pub use style::{default_voltage_tiers, HighlightConfig, StyleConfig, VoltageTier};
pub use thresholds::ThresholdsConfig;
pub use validation::{validate_config, validate_config_result};
