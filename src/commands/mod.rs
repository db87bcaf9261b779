pub mod init;
pub mod layers;
pub mod priority;
pub mod report;
pub mod scenario;
pub mod validate;

use crate::config::{load_config, validate_config_result, GridplanConfig};
use crate::core::{Layer, LayerKind};
use crate::io::{read_layer_with, reproject, Crs, ReadOptions};
use crate::observability::{set_phase, AnalysisPhase};
use anyhow::{Context, Result};
use std::path::Path;

/// Load the configuration and reject it before any layer is touched.
pub(crate) fn load_checked_config(path: Option<&Path>) -> Result<GridplanConfig> {
    let _phase = set_phase(AnalysisPhase::Configuration);
    let config = load_config(path)?;
    validate_config_result(&config)?;
    Ok(config)
}

/// Combine a `--source-crs` override with the configured default.
pub(crate) fn read_options(
    config: &GridplanConfig,
    source_crs: Option<&str>,
) -> Result<ReadOptions> {
    Ok(ReadOptions {
        source_crs: source_crs.map(Crs::parse).transpose()?,
        default_crs: config.input.default_crs()?,
    })
}

/// Read a layer and bring it to WGS84. Returns the layer together with the
/// CRS it was stored in.
pub(crate) fn load_layer(
    path: &Path,
    kind: LayerKind,
    options: &ReadOptions,
) -> Result<(Layer, Crs)> {
    let layer = read_layer_with(path, kind, options)
        .with_context(|| format!("Failed to load layer {}", path.display()))?;
    let source_crs = layer.crs;
    let _phase = set_phase(AnalysisPhase::Reprojection);
    Ok((reproject(layer), source_crs))
}
