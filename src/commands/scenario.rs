use super::{load_checked_config, load_layer, read_options};
use crate::config::GridplanConfig;
use crate::core::{Layer, LayerKind};
use crate::error::{ErrorCode, GridplanError};
use crate::formatting::FormattingConfig;
use crate::io::{create_writer, open_output, write_styled_collection, OutputFormat, Tooltip};
use crate::observability::{set_phase, AnalysisPhase};
use crate::report::ScenarioReport;
use crate::scenario::{compute_statistics, histogram, partition_by_threshold, threshold_at};
use crate::style::StyleResolver;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct ScenarioConfig {
    pub grid: PathBuf,
    pub scenario: Option<String>,
    pub threshold: Option<f64>,
    pub bins: Option<usize>,
    pub lenient: bool,
    pub map_out: Option<PathBuf>,
    pub source_crs: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

/// Options of one scenario analysis, independent of where the grid came from.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRequest<'a> {
    /// Scenario label; the configured fallback scenario when absent
    pub label: Option<&'a str>,
    /// Explicit threshold; derived from `thresholds.fraction` when absent
    pub threshold: Option<f64>,
    pub bins: Option<usize>,
    /// Degrade unknown labels to the fallback scenario instead of failing
    pub lenient: bool,
}

/// Resolve the scenario column, summarise it and build the matching
/// continuous style.
pub fn analyze_scenario(
    layer: &Layer,
    config: &GridplanConfig,
    request: &ScenarioRequest<'_>,
) -> Result<(ScenarioReport, StyleResolver)> {
    let catalog = &config.scenarios;
    let requested = request.label.unwrap_or(&catalog.fallback);
    let (label, column, fallback_used) = if request.lenient {
        let resolution = catalog.resolve(requested);
        (resolution.label, resolution.column, resolution.fallback_used)
    } else {
        let column = catalog.resolve_strict(requested)?;
        let label = catalog.find(requested).map_or(requested, |s| s.label.as_str());
        (label, column, false)
    };

    if !layer.has_column(column) {
        return Err(GridplanError::analysis(
            ErrorCode::ANALYSIS_MISSING_COLUMN,
            format!(
                "layer '{}' has no column '{}' for scenario '{}'",
                layer.name, column, label
            ),
            AnalysisPhase::Statistics,
        )
        .into());
    }

    let _phase = set_phase(AnalysisPhase::Statistics);
    let values = layer.column_values(column);
    let threshold = match request.threshold {
        Some(threshold) => threshold,
        None => {
            let range = compute_statistics(&values, f64::INFINITY)
                .map_err(|e| e.for_column(column))?;
            threshold_at(range.min, range.max, config.thresholds.fraction)
        }
    };
    let statistics =
        compute_statistics(&values, threshold).map_err(|e| e.for_column(column))?;
    let bins = request.bins.unwrap_or(config.thresholds.histogram_bins);
    let histogram = histogram(&values, bins).map_err(|e| e.for_column(column))?;
    let partition = partition_by_threshold(&layer.features, column, threshold);

    tracing::info!(
        scenario = label,
        column,
        threshold,
        above = partition.above.len(),
        "summarised scenario column"
    );

    let resolver = StyleResolver::continuous(column, statistics.min, statistics.max, &config.style)?
        .with_highlight(column, threshold, &config.style.highlight)?;

    let report = ScenarioReport {
        layer: layer.name.clone(),
        scenario: label.to_string(),
        column: column.to_string(),
        fallback_used,
        feature_count: layer.len(),
        statistics,
        above_threshold: partition.above.len(),
        below_threshold: partition.below.len(),
        histogram,
        legend: resolver.legend(),
        map_output: None,
    };
    Ok((report, resolver))
}

pub fn run_scenario(cmd: ScenarioConfig) -> Result<()> {
    let config = load_checked_config(cmd.config.as_deref())?;
    let options = read_options(&config, cmd.source_crs.as_deref())?;
    let (layer, _) = load_layer(&cmd.grid, LayerKind::Grid, &options)?;

    let request = ScenarioRequest {
        label: cmd.scenario.as_deref(),
        threshold: cmd.threshold,
        bins: cmd.bins,
        lenient: cmd.lenient,
    };
    let (mut report, resolver) = analyze_scenario(&layer, &config, &request)?;

    if let Some(path) = cmd.map_out {
        let tooltip = Tooltip::new().field(&report.column, "Value:");
        write_styled_collection(&path, &layer, &resolver, &tooltip)
            .with_context(|| format!("Failed to write styled grid to {}", path.display()))?;
        report.map_output = Some(path);
    }

    let sink = open_output(cmd.output.as_deref())?;
    let mut writer = create_writer(cmd.format, sink, cmd.formatting);
    writer.write_scenario(&report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttributeValue, Feature};
    use crate::io::Crs;

    fn grid() -> Layer {
        let cell = |s1: f64, s2: f64| {
            Feature::from_attributes([
                ("scenario_1", AttributeValue::Number(s1)),
                ("scenario_2", AttributeValue::Number(s2)),
            ])
        };
        let mut features: Vec<Feature> = (0..=10)
            .map(|i| cell(i as f64 / 10.0, 1.0 - i as f64 / 10.0))
            .collect();
        features.push(Feature::from_attributes([("scenario_1", AttributeValue::Null)]));
        Layer::new("grid", LayerKind::Grid, Crs::Wgs84, features)
    }

    #[test]
    fn default_scenario_is_the_fallback() {
        let config = GridplanConfig::default();
        let (report, resolver) =
            analyze_scenario(&grid(), &config, &ScenarioRequest::default()).unwrap();
        assert_eq!(report.scenario, "Base Case");
        assert_eq!(report.column, "scenario_1");
        assert!(!report.fallback_used);
        assert_eq!(report.statistics.count, 11);
        assert!((report.statistics.threshold - 0.8).abs() < 1e-12);
        assert_eq!(report.above_threshold, 3);
        assert_eq!(report.below_threshold, 9);
        assert_eq!(report.histogram.total(), 11);
        assert!(resolver.highlight().is_some());
    }

    #[test]
    fn explicit_threshold_and_bins_win() {
        let request = ScenarioRequest {
            label: Some("industrial scenario"),
            threshold: Some(0.5),
            bins: Some(4),
            lenient: false,
        };
        let (report, _) =
            analyze_scenario(&grid(), &GridplanConfig::default(), &request).unwrap();
        assert_eq!(report.scenario, "Industrial scenario");
        assert_eq!(report.column, "scenario_2");
        assert_eq!(report.statistics.threshold, 0.5);
        assert_eq!(report.histogram.counts.len(), 4);
    }

    #[test]
    fn unknown_label_fails_unless_lenient() {
        let config = GridplanConfig::default();
        let mut request = ScenarioRequest {
            label: Some("High Demand"),
            ..ScenarioRequest::default()
        };
        assert!(analyze_scenario(&grid(), &config, &request).is_err());

        request.lenient = true;
        let (report, _) = analyze_scenario(&grid(), &config, &request).unwrap();
        assert!(report.fallback_used);
        assert_eq!(report.column, "scenario_1");
    }

    #[test]
    fn missing_column_is_an_analysis_error() {
        let request = ScenarioRequest {
            label: Some("Socio-environmental scenario"),
            ..ScenarioRequest::default()
        };
        let err = analyze_scenario(&grid(), &GridplanConfig::default(), &request).unwrap_err();
        let err = err.downcast_ref::<GridplanError>().unwrap();
        assert_eq!(err.code(), ErrorCode::ANALYSIS_MISSING_COLUMN);
    }
}
