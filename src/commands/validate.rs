use super::{load_layer, read_options};
use crate::config::{load_config, validate_config, GridplanConfig};
use crate::core::LayerKind;
use crate::error::GridplanError;
use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter};
use crate::observability::{set_phase, AnalysisPhase};
use anyhow::Result;
use std::path::PathBuf;

pub struct ValidateConfig {
    pub config: Option<PathBuf>,
    pub grid: Option<PathBuf>,
    pub source_crs: Option<String>,
    pub formatting: FormattingConfig,
}

/// Every configuration problem, plus the scenario columns `grid` lacks.
pub fn collect_problems(
    config: &GridplanConfig,
    grid: Option<&crate::core::Layer>,
) -> Vec<String> {
    let mut problems = validate_config(config);
    if let Some(layer) = grid {
        problems.extend(
            config
                .scenarios
                .missing_columns(layer)
                .into_iter()
                .map(|column| {
                    format!(
                        "grid layer '{}' has no scenario column '{}'",
                        layer.name, column
                    )
                }),
        );
    }
    problems
}

pub fn validate_project(cmd: ValidateConfig) -> Result<()> {
    let formatter = ColoredFormatter::new(cmd.formatting);
    let config = {
        let _phase = set_phase(AnalysisPhase::Configuration);
        load_config(cmd.config.as_deref())?
    };

    let grid = match &cmd.grid {
        Some(path) => {
            let options = read_options(&config, cmd.source_crs.as_deref())?;
            Some(load_layer(path, LayerKind::Grid, &options)?.0)
        }
        None => None,
    };

    let problems = collect_problems(&config, grid.as_ref());
    if !problems.is_empty() {
        return Err(GridplanError::validations(problems).into());
    }

    println!(
        "{} {}",
        formatter.emoji("✅", "[OK]"),
        formatter.success("Configuration is valid")
    );
    if let Some(layer) = &grid {
        println!(
            "{}",
            formatter.dim(&format!(
                "{} scenario column(s) present on {} ({} features)",
                config.scenarios.mappings.len(),
                layer.name,
                layer.len()
            ))
        );
    }
    Ok(())
}
