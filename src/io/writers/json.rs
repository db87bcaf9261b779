use crate::io::output::OutputWriter;
use crate::report::{LayersReport, PriorityReport, ScenarioReport};
use serde::Serialize;
use std::io::Write;

/// Pretty-printed JSON, one document per report.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_document<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_scenario(&mut self, report: &ScenarioReport) -> anyhow::Result<()> {
        self.write_document(report)
    }

    fn write_priority(&mut self, report: &PriorityReport) -> anyhow::Result<()> {
        self.write_document(report)
    }

    fn write_layers(&mut self, report: &LayersReport) -> anyhow::Result<()> {
        self.write_document(report)
    }
}
