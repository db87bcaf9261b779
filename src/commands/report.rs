use super::priority::{analyze_priority, PriorityAttributes};
use super::scenario::{analyze_scenario, ScenarioRequest};
use super::{load_checked_config, load_layer, read_options};
use crate::core::LayerKind;
use crate::io::output::OutputWriter;
use crate::io::open_output;
use crate::io::writers::MarkdownWriter;
use anyhow::Result;
use std::path::PathBuf;

pub struct ReportConfig {
    pub grid: PathBuf,
    pub lines: Option<PathBuf>,
    pub title: Option<String>,
    pub source_crs: Option<String>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// One Markdown document covering every configured scenario and, when a
/// line layer is given, the priority breakdown.
///
/// Scenarios whose column the grid lacks are skipped with a warning.
pub fn run_report(cmd: ReportConfig) -> Result<()> {
    let config = load_checked_config(cmd.config.as_deref())?;
    let options = read_options(&config, cmd.source_crs.as_deref())?;
    let (grid, _) = load_layer(&cmd.grid, LayerKind::Grid, &options)?;

    let sink = open_output(cmd.output.as_deref())?;
    let mut writer = match &cmd.title {
        Some(title) => MarkdownWriter::with_title(sink, title),
        None => MarkdownWriter::new(sink),
    };

    let mut written = 0;
    for scenario in &config.scenarios.mappings {
        if !grid.has_column(&scenario.column) {
            tracing::warn!(
                scenario = %scenario.label,
                column = %scenario.column,
                "grid has no column for scenario, skipping"
            );
            continue;
        }
        let request = ScenarioRequest {
            label: Some(&scenario.label),
            ..ScenarioRequest::default()
        };
        let (report, _) = analyze_scenario(&grid, &config, &request)?;
        writer.write_scenario(&report)?;
        written += 1;
    }
    if written == 0 {
        anyhow::bail!(
            "Grid layer {} carries none of the configured scenario columns",
            cmd.grid.display()
        );
    }

    if let Some(path) = &cmd.lines {
        let (lines, _) = load_layer(path, LayerKind::TransmissionLines, &options)?;
        let (report, _) =
            analyze_priority(&lines, &config, PriorityAttributes::from_config(&config))?;
        writer.write_priority(&report)?;
    }
    Ok(())
}
