use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridplan")]
#[command(
    about = "Scenario statistics, line prioritisation and map styling for grid-extension planning",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the nearest .gridplan.toml)
    #[arg(long, global = true, env = "GRIDPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// ASCII output without colors or emoji
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarise one scenario column of the grid layer
    Scenario {
        /// Grid layer (GeoJSON)
        grid: PathBuf,

        /// Scenario label (defaults to the fallback scenario)
        #[arg(short, long)]
        scenario: Option<String>,

        /// Highlight threshold (defaults to min + fraction * (max - min))
        #[arg(long)]
        threshold: Option<f64>,

        /// Histogram bins
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        bins: Option<u16>,

        /// Fall back to the default scenario on an unknown label
        #[arg(long)]
        lenient: bool,

        /// Write the styled grid as GeoJSON
        #[arg(long = "map-out")]
        map_out: Option<PathBuf>,

        /// Override the CRS of the input layer, e.g. EPSG:32636
        #[arg(long = "source-crs")]
        source_crs: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Bucket transmission lines by priority score
    Priority {
        /// Line layer (GeoJSON)
        lines: PathBuf,

        /// Priority score attribute
        #[arg(long = "score-attr")]
        score_attr: Option<String>,

        /// Cost attribute
        #[arg(long = "cost-attr")]
        cost_attr: Option<String>,

        /// Connections attribute
        #[arg(long = "connections-attr")]
        connections_attr: Option<String>,

        /// Write the styled lines as GeoJSON
        #[arg(long = "map-out")]
        map_out: Option<PathBuf>,

        /// Override the CRS of the input layer, e.g. EPSG:32636
        #[arg(long = "source-crs")]
        source_crs: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Discover and style every layer in a data directory
    Layers {
        /// Data directory
        dir: PathBuf,

        /// Write one styled GeoJSON per layer into this directory
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,

        /// Coloring of lines without a priority score
        #[arg(long = "line-mode", value_enum, default_value = "voltage")]
        line_mode: LineMode,

        /// Override the CRS of every input layer
        #[arg(long = "source-crs")]
        source_crs: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Markdown report over every scenario and the line priorities
    Report {
        /// Grid layer (GeoJSON)
        #[arg(long)]
        grid: PathBuf,

        /// Line layer (GeoJSON)
        #[arg(long)]
        lines: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Override the CRS of the input layers
        #[arg(long = "source-crs")]
        source_crs: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize a .gridplan.toml configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration and optionally a grid layer against it
    Validate {
        /// Grid layer whose scenario columns are checked
        #[arg(long)]
        grid: Option<PathBuf>,

        /// Override the CRS of the grid layer
        #[arg(long = "source-crs")]
        source_crs: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LineMode {
    /// Voltage tiers
    Voltage,
    /// Construction status
    Status,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

impl From<LineMode> for crate::commands::layers::LineMode {
    fn from(m: LineMode) -> Self {
        match m {
            LineMode::Voltage => crate::commands::layers::LineMode::Voltage,
            LineMode::Status => crate::commands::layers::LineMode::Status,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
