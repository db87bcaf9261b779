use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter};
use crate::io::output::OutputWriter;
use crate::report::{format_value, LayersReport, PriorityReport, ScenarioReport};
use crate::scenario::Histogram;
use crate::style::LegendEntry;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Cell, CellAlignment, Table};
use std::io::Write;

const BAR_WIDTH: usize = 30;
const RULE: &str = "═══════════════════════════════════════════";

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatter: ColoredFormatter,
    unicode: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, config: FormattingConfig) -> Self {
        Self {
            writer,
            formatter: ColoredFormatter::new(config),
            unicode: config.emoji.should_use_emoji(),
        }
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.unicode { UTF8_FULL } else { ASCII_FULL });
        table.set_header(header.to_vec());
        table
    }

    fn print_banner(&mut self, emoji: &str, fallback: &str, title: &str) -> anyhow::Result<()> {
        let rule = if self.unicode {
            RULE.to_string()
        } else {
            "=".repeat(43)
        };
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.header(&rule))?;
        writeln!(
            self.writer,
            "{} {}",
            self.formatter.emoji(emoji, fallback),
            self.formatter.header(title)
        )?;
        writeln!(self.writer, "{}", self.formatter.header(&rule))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_histogram(&mut self, histogram: &Histogram) -> anyhow::Result<()> {
        let max = histogram.max_count().max(1);
        let block = if self.unicode { "█" } else { "#" };
        writeln!(self.writer, "{}", self.formatter.bold("Value distribution"))?;
        for (lower, upper, count) in histogram.bins() {
            let len = (count * BAR_WIDTH).div_ceil(max);
            writeln!(
                self.writer,
                "  {:>10} - {:<10} {} {}",
                format_value(lower),
                format_value(upper),
                self.formatter.success(&block.repeat(len)),
                count
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_legend(&mut self, legend: &[LegendEntry]) -> anyhow::Result<()> {
        if legend.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "{}", self.formatter.bold("Legend"))?;
        for entry in legend {
            writeln!(self.writer, "  {}  {}", entry.color, entry.label)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_map_output(&mut self, path: Option<&std::path::Path>) -> anyhow::Result<()> {
        if let Some(path) = path {
            writeln!(
                self.writer,
                "{} Styled layer written to {}",
                self.formatter.emoji("🗺️ ", "[MAP]"),
                self.formatter.success(&path.display().to_string())
            )?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_scenario(&mut self, report: &ScenarioReport) -> anyhow::Result<()> {
        self.print_banner("📊", "[STATS]", &format!("SCENARIO: {}", report.scenario))?;

        if report.fallback_used {
            writeln!(
                self.writer,
                "{} {}",
                self.formatter.emoji("⚠️ ", "[WARN]"),
                self.formatter.warning(&format!(
                    "Requested scenario is unknown, showing '{}'",
                    report.scenario
                ))
            )?;
            writeln!(self.writer)?;
        }

        let stats = &report.statistics;
        let mut table = self.table(&["Metric", "Value"]);
        table
            .add_row(vec![Cell::new("Layer"), Cell::new(&report.layer)])
            .add_row(vec![Cell::new("Column"), Cell::new(&report.column)])
            .add_row(vec![Cell::new("Cells"), Cell::new(report.feature_count)])
            .add_row(vec![Cell::new("Cells with a value"), Cell::new(stats.count)])
            .add_row(vec![Cell::new("Min"), Cell::new(format_value(stats.min))])
            .add_row(vec![Cell::new("Max"), Cell::new(format_value(stats.max))])
            .add_row(vec![Cell::new("Mean"), Cell::new(format_value(stats.mean))])
            .add_row(vec![Cell::new("Median"), Cell::new(format_value(stats.median))])
            .add_row(vec![
                Cell::new("Threshold"),
                Cell::new(format_value(stats.threshold)),
            ])
            .add_row(vec![
                Cell::new("At or above threshold"),
                Cell::new(report.above_threshold),
            ])
            .add_row(vec![
                Cell::new("Below threshold"),
                Cell::new(report.below_threshold),
            ]);
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        self.print_histogram(&report.histogram)?;
        self.print_legend(&report.legend)?;
        self.print_map_output(report.map_output.as_deref())?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_priority(&mut self, report: &PriorityReport) -> anyhow::Result<()> {
        self.print_banner("⚡", "[LINES]", &format!("LINE PRIORITY: {}", report.layer))?;
        writeln!(
            self.writer,
            "{}",
            self.formatter.dim(&format!(
                "score attribute '{}', {} line(s)",
                report.score_attr, report.feature_count
            ))
        )?;
        writeln!(self.writer)?;

        let mut table = self.table(&["Category", "Lines", "Cost", "Connections"]);
        for row in &report.categories {
            table.add_row(vec![
                Cell::new(row.category.label()),
                Cell::new(row.line_count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.2}", row.total_cost)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.0}", row.total_connections))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
        table.add_row(vec![
            Cell::new("Total"),
            Cell::new(report.feature_count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", report.total_cost())).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}", report.total_connections()))
                .set_alignment(CellAlignment::Right),
        ]);
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;

        self.print_legend(&report.legend)?;
        self.print_map_output(report.map_output.as_deref())?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_layers(&mut self, report: &LayersReport) -> anyhow::Result<()> {
        self.print_banner(
            "🗂️ ",
            "[LAYERS]",
            &format!("LAYERS: {}", report.root.display()),
        )?;

        if report.layers.is_empty() {
            writeln!(
                self.writer,
                "{}",
                self.formatter
                    .warning("No layer files matched the configured rules.")
            )?;
            self.writer.flush()?;
            return Ok(());
        }

        let mut table = self.table(&["Layer", "Kind", "Features", "Source CRS", "Styling", "Output"]);
        for layer in &report.layers {
            table.add_row(vec![
                Cell::new(&layer.name),
                Cell::new(layer.kind),
                Cell::new(layer.feature_count).set_alignment(CellAlignment::Right),
                Cell::new(&layer.source_crs),
                Cell::new(layer.mode),
                Cell::new(
                    layer
                        .output
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
                ),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        writeln!(
            self.writer,
            "{} {} layer(s)",
            self.formatter.emoji("✅", "[OK]"),
            report.layers.len()
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    fn render(f: impl FnOnce(&mut TerminalWriter<&mut Vec<u8>>)) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = TerminalWriter::new(&mut buffer, FormattingConfig::plain());
            f(&mut writer);
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn plain_scenario_output_is_ascii() {
        let text = render(|w| w.write_scenario(&fixtures::scenario_report()).unwrap());
        assert!(text.is_ascii(), "unexpected non-ascii output:\n{text}");
        assert!(text.contains("[STATS] SCENARIO: Industrial scenario"));
        assert!(text.contains("scenario_2"));
        assert!(text.contains("0.8000"));
        assert!(!text.contains("[WARN]"));
    }

    #[test]
    fn histogram_bars_scale_to_largest_bin() {
        let text = render(|w| w.write_scenario(&fixtures::scenario_report()).unwrap());
        assert!(text.contains(&format!("{} 3", "#".repeat(BAR_WIDTH))));
        assert!(text.contains(&format!("{} 2", "#".repeat(20))));
    }

    #[test]
    fn fallback_is_flagged() {
        let mut report = fixtures::scenario_report();
        report.fallback_used = true;
        let text = render(|w| w.write_scenario(&report).unwrap());
        assert!(text.contains("[WARN] Requested scenario is unknown"));
    }

    #[test]
    fn priority_table_lists_categories_and_map() {
        let text = render(|w| w.write_priority(&fixtures::priority_report()).unwrap());
        for label in [
            "No priority",
            "Low priority",
            "Mid priority",
            "Mid-High priority",
            "High priority",
            "Total",
        ] {
            assert!(text.contains(label), "missing {label}");
        }
        assert!(text.contains("7.50"));
        assert!(text.contains("[MAP] Styled layer written to out/lines.geojson"));
    }

    #[test]
    fn empty_layers_report_warns() {
        let mut report = fixtures::layers_report();
        report.layers.clear();
        let text = render(|w| w.write_layers(&report).unwrap());
        assert!(text.contains("No layer files matched"));
    }

    #[test]
    fn layers_report_counts_layers() {
        let text = render(|w| w.write_layers(&fixtures::layers_report()).unwrap());
        assert!(text.contains("substations"));
        assert!(text.contains("EPSG:32636"));
        assert!(text.contains("[OK] 1 layer(s)"));
    }
}
