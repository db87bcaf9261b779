use crate::scenario::DEFAULT_THRESHOLD_FRACTION;
use serde::{Deserialize, Serialize};

/// Threshold and histogram settings (`[thresholds]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Position of the default threshold within `[min, max]`
    #[serde(default = "default_fraction")]
    pub fraction: f64,

    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            fraction: default_fraction(),
            histogram_bins: default_histogram_bins(),
        }
    }
}

fn default_fraction() -> f64 {
    DEFAULT_THRESHOLD_FRACTION
}

fn default_histogram_bins() -> usize {
    10
}
