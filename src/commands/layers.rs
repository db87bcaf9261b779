use super::{load_checked_config, load_layer, read_options};
use crate::config::GridplanConfig;
use crate::core::{Layer, LayerKind};
use crate::formatting::FormattingConfig;
use crate::io::{
    create_writer, discover_layers, open_output, write_styled_collection, DiscoveredLayer,
    OutputFormat, Tooltip,
};
use crate::report::{LayerSummary, LayersReport};
use crate::scenario::compute_statistics;
use crate::style::StyleResolver;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// How non-prioritised transmission lines are colored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineMode {
    #[default]
    Voltage,
    Status,
}

pub struct LayersConfig {
    pub dir: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub line_mode: LineMode,
    pub source_crs: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

/// Pick the resolver and tooltip for a discovered layer.
///
/// Grid layers ramp the fallback scenario's column. Line layers carrying
/// the priority score use the priority scale, other lines follow
/// `line_mode`. Everything else gets the rule color.
pub fn resolve_layer_style(
    layer: &Layer,
    discovered: &DiscoveredLayer,
    config: &GridplanConfig,
    line_mode: LineMode,
) -> Result<(StyleResolver, Tooltip)> {
    let style = &config.style;
    match discovered.rule.kind {
        LayerKind::Grid => {
            let column = config.scenarios.resolve_column(&config.scenarios.fallback);
            match compute_statistics(&layer.column_values(column), f64::INFINITY) {
                Ok(range) => Ok((
                    StyleResolver::continuous(column, range.min, range.max, style)?,
                    Tooltip::new().field(column, "Value:"),
                )),
                Err(e) => {
                    tracing::warn!(layer = %layer.name, column, "{}, drawing grid unstyled", e);
                    Ok((
                        StyleResolver::fixed(&layer.name, &style.unknown_color, style)?,
                        Tooltip::new(),
                    ))
                }
            }
        }
        LayerKind::TransmissionLines if layer.has_column(&config.priority.score_attr) => {
            let score = config.priority.score_attr.as_str();
            Ok((
                StyleResolver::priority(score, &config.priority.scale(), style)?,
                Tooltip::new().field(score, "Line Priority:"),
            ))
        }
        LayerKind::TransmissionLines => match line_mode {
            LineMode::Voltage => Ok((
                StyleResolver::voltage(style)?,
                Tooltip::new()
                    .field(&style.voltage_attr, "Voltage (kV):")
                    .field(&style.status_attr, "Status:")
                    .retain_present(layer),
            )),
            LineMode::Status => Ok((
                StyleResolver::status(style)?,
                Tooltip::new()
                    .field(&style.status_attr, "Status:")
                    .field(&style.voltage_attr, "Voltage (kV):")
                    .retain_present(layer),
            )),
        },
        kind => {
            let color = discovered
                .rule
                .color
                .as_deref()
                .unwrap_or(&style.unknown_color);
            Ok((
                StyleResolver::fixed(kind.label(), color, style)?,
                Tooltip::new().field("name", "Name:").retain_present(layer),
            ))
        }
    }
}

fn output_path(out_dir: &Path, name: &str) -> PathBuf {
    out_dir.join(format!("{}.geojson", name))
}

pub fn run_layers(cmd: LayersConfig) -> Result<()> {
    let config = load_checked_config(cmd.config.as_deref())?;
    let options = read_options(&config, cmd.source_crs.as_deref())?;
    let discovered = discover_layers(&cmd.dir, &config.layers)
        .with_context(|| format!("Failed to discover layers in {}", cmd.dir.display()))?;
    tracing::info!(count = discovered.len(), root = %cmd.dir.display(), "discovered layers");

    let mut layers = Vec::with_capacity(discovered.len());
    for item in &discovered {
        let name = item.name();
        let (mut layer, source_crs) = load_layer(&item.path, item.rule.kind, &options)?;
        layer.name = name.clone();
        let (resolver, tooltip) = resolve_layer_style(&layer, item, &config, cmd.line_mode)
            .with_context(|| format!("Failed to style layer {}", name))?;

        let output = match &cmd.out_dir {
            Some(dir) => {
                let path = output_path(dir, &name);
                write_styled_collection(&path, &layer, &resolver, &tooltip)
                    .with_context(|| format!("Failed to write styled layer {}", name))?;
                Some(path)
            }
            None => None,
        };

        layers.push(LayerSummary {
            name,
            kind: item.rule.kind,
            path: item.path.clone(),
            source_crs: source_crs.to_string(),
            feature_count: layer.len(),
            mode: resolver.mode(),
            output,
        });
    }

    let report = LayersReport {
        root: cmd.dir,
        layers,
    };
    let sink = open_output(cmd.output.as_deref())?;
    let mut writer = create_writer(cmd.format, sink, cmd.formatting);
    writer.write_layers(&report)?;
    Ok(())
}
