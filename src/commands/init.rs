use crate::config::CONFIG_FILE_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r##"# gridplan configuration

[scenarios]
# Scenario used when a requested label is unknown (with --lenient)
fallback = "Base Case"

[[scenarios.mappings]]
label = "Base Case"
column = "scenario_1"

[[scenarios.mappings]]
label = "Industrial scenario"
column = "scenario_2"

[[scenarios.mappings]]
label = "Socio-environmental scenario"
column = "scenario_3"

[priority]
score_attr = "line_prior"
cost_attr = "cost"
connections_attr = "connections"

[[priority.bands]]
upper_bound = 0.0
category = "no_priority"
color = "#d3d3d3"

[[priority.bands]]
upper_bound = 1.161e-6
category = "low_priority"
color = "#ffffcc"

[[priority.bands]]
upper_bound = 4.681e-6
category = "mid_priority"
color = "#ffeda0"

[[priority.bands]]
upper_bound = 7.093e-6
category = "mid_high_priority"
color = "#feb24c"

[[priority.bands]]
category = "high_priority"
color = "#f03b20"

[style]
ramp_low = "white"
ramp_high = "red"
unknown_color = "#808080"
polygon_weight = 0.2
polygon_opacity = 0.7
line_weight = 3.0
line_opacity = 0.9
voltage_attr = "voltage_kv"
status_attr = "status"
voltage_base_color = "green"
status_existing = "green"
status_under_construction = "orange"
status_other = "gray"

[[style.voltage_tiers]]
min_kv = 220.0
color = "red"

[[style.voltage_tiers]]
min_kv = 110.0
color = "orange"

[style.highlight]
enabled = true
color = "#000000"
# Minimum highlighted stroke weight; heavier strokes are doubled instead
weight = 2.0

[thresholds]
# Default threshold = min + fraction * (max - min)
fraction = 0.8
histogram_bins = 10

[input]
# CRS assumed for layers that declare none, e.g. "EPSG:32636"
# default_crs = "EPSG:4326"

[[layers]]
pattern = "grid*"
kind = "grid"

[[layers]]
pattern = "*line*"
kind = "transmission_lines"

[[layers]]
pattern = "*substation*"
kind = "substations"
color = "blue"

[[layers]]
pattern = "*rail*"
kind = "railways"
color = "purple"

[[layers]]
pattern = "*industr*"
kind = "industrial_parks"
color = "#8c510a"
"##;

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

/// Write the default configuration into `dir`, refusing to overwrite an
/// existing file unless `force` is set.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file {} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!(path = %config_path.display(), "wrote default configuration");
    Ok(config_path)
}
