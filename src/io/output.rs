use super::writers::{JsonWriter, MarkdownWriter, TerminalWriter};
use crate::error::GridplanError;
use crate::formatting::FormattingConfig;
use crate::report::{LayersReport, PriorityReport, ScenarioReport};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_scenario(&mut self, report: &ScenarioReport) -> anyhow::Result<()>;
    fn write_priority(&mut self, report: &PriorityReport) -> anyhow::Result<()>;
    fn write_layers(&mut self, report: &LayersReport) -> anyhow::Result<()>;
}

/// Open the report sink: a file when `path` is given, else stdout.
pub fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| GridplanError::from_io_error(e, Some(parent.to_path_buf())))?;
            }
            let file = fs::File::create(path)
                .map_err(|e| GridplanError::from_io_error(e, Some(path.to_path_buf())))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

pub fn create_writer<'a>(
    format: OutputFormat,
    sink: Box<dyn Write + 'a>,
    formatting: FormattingConfig,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink, formatting)),
    }
}
