//! Priority bucketizer for greenfield transmission lines.
//!
//! A continuous `line_prior` score is bucketed into five ordinal categories
//! using configurable right-inclusive breakpoints, then lines are
//! aggregated per category.

pub mod aggregation;
pub mod tiers;

pub use aggregation::{aggregate_by_category, CategorySummary};
pub use tiers::{PriorityBand, PriorityCategory, PriorityScale};
