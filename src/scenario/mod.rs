//! Scenario value classifier.
//!
//! A scenario label (what planners pick) maps to exactly one grid attribute
//! column. From that column we derive summary statistics, a default
//! threshold, an above/below partition and a histogram.

pub mod catalog;
pub mod histogram;
pub mod statistics;

pub use catalog::{Resolution, Scenario, ScenarioCatalog};
pub use histogram::{histogram, Histogram};
pub use statistics::{
    compute_statistics, default_threshold, partition_by_threshold, threshold_at, StatisticsError,
    SummaryStatistics, ThresholdPartition, DEFAULT_THRESHOLD_FRACTION,
};
