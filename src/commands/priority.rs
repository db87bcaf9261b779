use super::{load_checked_config, load_layer, read_options};
use crate::config::GridplanConfig;
use crate::core::{Layer, LayerKind};
use crate::error::{ErrorCode, GridplanError};
use crate::formatting::FormattingConfig;
use crate::io::{create_writer, open_output, write_styled_collection, OutputFormat, Tooltip};
use crate::observability::{set_phase, AnalysisPhase};
use crate::priority::aggregate_by_category;
use crate::report::PriorityReport;
use crate::style::StyleResolver;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct PriorityConfig {
    pub lines: PathBuf,
    pub score_attr: Option<String>,
    pub cost_attr: Option<String>,
    pub connections_attr: Option<String>,
    pub map_out: Option<PathBuf>,
    pub source_crs: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

/// Attribute names used to read a line layer.
#[derive(Debug, Clone, Copy)]
pub struct PriorityAttributes<'a> {
    pub score: &'a str,
    pub cost: &'a str,
    pub connections: &'a str,
}

impl<'a> PriorityAttributes<'a> {
    pub fn from_config(config: &'a GridplanConfig) -> Self {
        Self {
            score: &config.priority.score_attr,
            cost: &config.priority.cost_attr,
            connections: &config.priority.connections_attr,
        }
    }
}

/// Bucket every line of `layer` and build the priority style.
pub fn analyze_priority(
    layer: &Layer,
    config: &GridplanConfig,
    attrs: PriorityAttributes<'_>,
) -> Result<(PriorityReport, StyleResolver)> {
    if !layer.is_empty() && !layer.has_column(attrs.score) {
        return Err(GridplanError::analysis(
            ErrorCode::ANALYSIS_MISSING_COLUMN,
            format!("layer '{}' has no score column '{}'", layer.name, attrs.score),
            AnalysisPhase::Classification,
        )
        .into());
    }

    let _phase = set_phase(AnalysisPhase::Classification);
    let scale = config.priority.scale();
    let categories = aggregate_by_category(
        &layer.features,
        &scale,
        attrs.score,
        attrs.cost,
        attrs.connections,
    );
    for row in &categories {
        tracing::debug!(
            category = row.category.label(),
            lines = row.line_count,
            cost = row.total_cost,
            "priority category"
        );
    }

    let resolver = StyleResolver::priority(attrs.score, &scale, &config.style)?;
    let report = PriorityReport {
        layer: layer.name.clone(),
        score_attr: attrs.score.to_string(),
        feature_count: layer.len(),
        categories,
        legend: resolver.legend(),
        map_output: None,
    };
    Ok((report, resolver))
}

pub fn run_priority(cmd: PriorityConfig) -> Result<()> {
    let config = load_checked_config(cmd.config.as_deref())?;
    let options = read_options(&config, cmd.source_crs.as_deref())?;
    let (layer, _) = load_layer(&cmd.lines, LayerKind::TransmissionLines, &options)?;

    let defaults = PriorityAttributes::from_config(&config);
    let attrs = PriorityAttributes {
        score: cmd.score_attr.as_deref().unwrap_or(defaults.score),
        cost: cmd.cost_attr.as_deref().unwrap_or(defaults.cost),
        connections: cmd.connections_attr.as_deref().unwrap_or(defaults.connections),
    };
    let (mut report, resolver) = analyze_priority(&layer, &config, attrs)?;

    if let Some(path) = cmd.map_out {
        let tooltip = Tooltip::new()
            .field(attrs.score, "Line Priority:")
            .field(attrs.cost, "Cost:")
            .field(attrs.connections, "Connections:")
            .retain_present(&layer);
        write_styled_collection(&path, &layer, &resolver, &tooltip)
            .with_context(|| format!("Failed to write styled lines to {}", path.display()))?;
        report.map_output = Some(path);
    }

    let sink = open_output(cmd.output.as_deref())?;
    let mut writer = create_writer(cmd.format, sink, cmd.formatting);
    writer.write_priority(&report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttributeValue, Feature};
    use crate::io::Crs;
    use crate::priority::PriorityCategory;

    fn lines() -> Layer {
        let line = |score: AttributeValue, cost: f64| {
            Feature::from_attributes([
                ("line_prior", score),
                ("cost", AttributeValue::Number(cost)),
            ])
        };
        Layer::new(
            "greenfield_lines_prior",
            LayerKind::TransmissionLines,
            Crs::Wgs84,
            vec![
                line(AttributeValue::Number(0.0), 1.0),
                line(AttributeValue::Number(1.0e-6), 2.0),
                line(AttributeValue::Number(9.0e-6), 3.0),
                line(AttributeValue::Null, 4.0),
            ],
        )
    }

    #[test]
    fn buckets_lines_and_sums_cost() {
        let config = GridplanConfig::default();
        let (report, resolver) =
            analyze_priority(&lines(), &config, PriorityAttributes::from_config(&config)).unwrap();

        let counts: Vec<(PriorityCategory, usize)> = report
            .categories
            .iter()
            .map(|c| (c.category, c.line_count))
            .collect();
        assert_eq!(
            counts,
            vec![
                (PriorityCategory::NoPriority, 2),
                (PriorityCategory::LowPriority, 1),
                (PriorityCategory::MidPriority, 0),
                (PriorityCategory::MidHighPriority, 0),
                (PriorityCategory::HighPriority, 1),
            ]
        );
        assert_eq!(report.total_cost(), 10.0);
        assert_eq!(report.total_connections(), 0.0);
        assert_eq!(report.legend.len(), 5);
        assert_eq!(resolver.mode(), crate::style::ColorMode::Priority);
    }

    #[test]
    fn unknown_score_attribute_is_rejected() {
        let config = GridplanConfig::default();
        let attrs = PriorityAttributes {
            score: "priority_index",
            ..PriorityAttributes::from_config(&config)
        };
        let err = analyze_priority(&lines(), &config, attrs).unwrap_err();
        assert!(err.to_string().contains("priority_index"));
    }
}
