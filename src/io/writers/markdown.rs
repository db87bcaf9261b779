use crate::io::output::OutputWriter;
use crate::report::{format_value, LayersReport, PriorityReport, ScenarioReport};
use crate::style::LegendEntry;
use std::io::Write;

const DEFAULT_TITLE: &str = "Grid Extension Planning Report";

/// Make free text safe inside a table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Markdown report. The document header is written once, before the first
/// section, so several reports can share one document.
pub struct MarkdownWriter<W: Write> {
    writer: W,
    title: String,
    header_written: bool,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_title(writer, DEFAULT_TITLE)
    }

    pub fn with_title(writer: W, title: &str) -> Self {
        Self {
            writer,
            title: title.to_string(),
            header_written: false,
        }
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        if self.header_written {
            return Ok(());
        }
        writeln!(self.writer, "# {}", self.title)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Version: {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.writer)?;
        self.header_written = true;
        Ok(())
    }

    fn write_row(&mut self, metric: &str, value: &str) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "| {} | {} |",
            escape_cell(metric),
            escape_cell(value)
        )?;
        Ok(())
    }

    fn write_legend(&mut self, legend: &[LegendEntry]) -> anyhow::Result<()> {
        if legend.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "### Legend")?;
        writeln!(self.writer)?;
        for entry in legend {
            writeln!(self.writer, "- `{}` {}", entry.color, entry.label)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_scenario(&mut self, report: &ScenarioReport) -> anyhow::Result<()> {
        self.write_header()?;
        let stats = &report.statistics;

        writeln!(self.writer, "## Scenario: {}", report.scenario)?;
        writeln!(self.writer)?;
        if report.fallback_used {
            writeln!(
                self.writer,
                "> The requested scenario is unknown; showing the fallback scenario."
            )?;
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        self.write_row("Layer", &report.layer)?;
        self.write_row("Column", &format!("`{}`", report.column))?;
        self.write_row("Cells", &report.feature_count.to_string())?;
        self.write_row("Cells with a value", &stats.count.to_string())?;
        self.write_row("Min", &format_value(stats.min))?;
        self.write_row("Max", &format_value(stats.max))?;
        self.write_row("Mean", &format_value(stats.mean))?;
        self.write_row("Median", &format_value(stats.median))?;
        self.write_row("Threshold", &format_value(stats.threshold))?;
        self.write_row("At or above threshold", &report.above_threshold.to_string())?;
        self.write_row("Below threshold", &report.below_threshold.to_string())?;
        writeln!(self.writer)?;

        writeln!(self.writer, "### Value distribution")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Range | Cells |")?;
        writeln!(self.writer, "|-------|-------|")?;
        for (lower, upper, count) in report.histogram.bins() {
            writeln!(
                self.writer,
                "| {} - {} | {} |",
                format_value(lower),
                format_value(upper),
                count
            )?;
        }
        writeln!(self.writer)?;

        self.write_legend(&report.legend)?;
        if let Some(path) = &report.map_output {
            writeln!(self.writer, "Styled layer: `{}`", path.display())?;
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_priority(&mut self, report: &PriorityReport) -> anyhow::Result<()> {
        self.write_header()?;

        writeln!(self.writer, "## Line priority: {}", report.layer)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Score attribute `{}`, {} line(s).",
            report.score_attr, report.feature_count
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Category | Lines | Cost | Connections |")?;
        writeln!(self.writer, "|----------|-------|------|-------------|")?;
        for row in &report.categories {
            writeln!(
                self.writer,
                "| {} | {} | {:.2} | {:.0} |",
                row.category.label(),
                row.line_count,
                row.total_cost,
                row.total_connections
            )?;
        }
        writeln!(
            self.writer,
            "| **Total** | **{}** | **{:.2}** | **{:.0}** |",
            report.feature_count,
            report.total_cost(),
            report.total_connections()
        )?;
        writeln!(self.writer)?;

        self.write_legend(&report.legend)?;
        if let Some(path) = &report.map_output {
            writeln!(self.writer, "Styled layer: `{}`", path.display())?;
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_layers(&mut self, report: &LayersReport) -> anyhow::Result<()> {
        self.write_header()?;

        writeln!(self.writer, "## Layers in `{}`", report.root.display())?;
        writeln!(self.writer)?;
        if report.layers.is_empty() {
            writeln!(self.writer, "No layer files matched the configured rules.")?;
            writeln!(self.writer)?;
            return Ok(());
        }
        writeln!(
            self.writer,
            "| Layer | Kind | Features | Source CRS | Styling | Output |"
        )?;
        writeln!(
            self.writer,
            "|-------|------|----------|------------|---------|--------|"
        )?;
        for layer in &report.layers {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                escape_cell(&layer.name),
                layer.kind,
                layer.feature_count,
                layer.source_crs,
                layer.mode,
                layer.output.as_ref().map_or_else(
                    || "-".to_string(),
                    |p| format!("`{}`", escape_cell(&p.display().to_string()))
                )
            )?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
