//! Layer input, styled layer output and report writers.

pub mod crs;
pub mod geojson_out;
pub mod output;
pub mod reader;
pub mod walker;
pub mod writers;

pub use crs::{reproject, Crs};
pub use geojson_out::{styled_collection, write_styled_collection, Tooltip};
pub use output::{create_writer, open_output, OutputFormat, OutputWriter};
pub use reader::{read_layer, read_layer_with, ReadOptions};
pub use walker::{discover_layers, DiscoveredLayer, LayerWalker};
