//! Core data model: features, attribute values and layers.

pub mod feature;
pub mod layer;

pub use feature::{AttributeValue, Attributes, Feature};
pub use layer::{Layer, LayerKind};
