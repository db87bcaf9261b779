//! Scenario statistics, line prioritisation and map styling for national
//! grid-extension planning.
//!
//! Layers are read from GeoJSON, reprojected to WGS84, summarised per
//! planning scenario or priority category and written back out as styled
//! GeoJSON together with terminal, JSON or Markdown reports.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod priority;
pub mod report;
pub mod scenario;
pub mod style;

pub use crate::config::{load_config, GridplanConfig};
pub use crate::core::{AttributeValue, Feature, Layer, LayerKind};
pub use crate::error::{ErrorCode, GridplanError, Result};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::io::{read_layer, reproject, write_styled_collection, Crs, Tooltip};
pub use crate::priority::{aggregate_by_category, PriorityCategory, PriorityScale};
pub use crate::scenario::{compute_statistics, histogram, ScenarioCatalog, SummaryStatistics};
pub use crate::style::{StyleDescriptor, StyleResolver};
