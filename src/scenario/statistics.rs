use crate::core::Feature;
use crate::error::{ErrorCode, GridplanError};
use crate::observability::AnalysisPhase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction of the observed range used for the default threshold.
///
/// 0.8 highlights the top quintile of the range. It is not a statistically
/// derived cutoff.
pub const DEFAULT_THRESHOLD_FRACTION: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatisticsError {
    #[error("no finite values to summarise")]
    EmptyInput,
    #[error("histogram needs at least one bin")]
    ZeroBins,
}

impl StatisticsError {
    /// Attach the column name and lift into the crate error type.
    pub fn for_column(self, column: &str) -> GridplanError {
        GridplanError::analysis(
            ErrorCode::ANALYSIS_EMPTY_INPUT,
            format!("column '{}': {}", column, self),
            AnalysisPhase::Statistics,
        )
    }
}

/// Column summary for the active scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub threshold: f64,
    pub count_above_threshold: usize,
}

/// Summarise `values` against `threshold`.
///
/// Non-finite values are skipped. An input with no finite values is an
/// error rather than a row of NaNs. `count_above_threshold` counts values
/// `>= threshold`.
pub fn compute_statistics(
    values: &[f64],
    threshold: f64,
) -> Result<SummaryStatistics, StatisticsError> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(StatisticsError::EmptyInput);
    }
    finite.sort_by(f64::total_cmp);

    let count = finite.len();
    let min = finite[0];
    let max = finite[count - 1];
    let mean = mean_of(&finite);
    let median = if count % 2 == 1 {
        finite[count / 2]
    } else {
        (finite[count / 2 - 1] + finite[count / 2]) / 2.0
    };
    let count_above_threshold = finite.iter().filter(|&&v| v >= threshold).count();

    Ok(SummaryStatistics {
        count,
        min,
        max,
        mean,
        median,
        threshold,
        count_above_threshold,
    })
}

/// `min + fraction * (max - min)`.
pub fn threshold_at(min: f64, max: f64, fraction: f64) -> f64 {
    min + fraction * (max - min)
}

/// Default threshold: the start of the top 20% of the observed range.
pub fn default_threshold(min: f64, max: f64) -> f64 {
    threshold_at(min, max, DEFAULT_THRESHOLD_FRACTION)
}

/// Feature indices split by threshold membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThresholdPartition {
    /// Value `>= threshold`
    pub above: Vec<usize>,
    /// Value below the threshold, or missing
    pub below: Vec<usize>,
}

pub fn partition_by_threshold(
    features: &[Feature],
    column: &str,
    threshold: f64,
) -> ThresholdPartition {
    let (above, below) = (0..features.len())
        .partition(|&i| features[i].number(column).is_some_and(|v| v >= threshold));
    ThresholdPartition { above, below }
}

/// Arithmetic mean that stays finite when the plain sum would overflow.
fn mean_of(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AttributeValue;
    use proptest::prelude::*;

    #[test]
    fn summarises_odd_and_even_counts() {
        let stats = compute_statistics(&[3.0, 1.0, 2.0], 2.0).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.count_above_threshold, 2);

        let stats = compute_statistics(&[4.0, 1.0, 2.0, 3.0], 10.0).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.count_above_threshold, 0);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(compute_statistics(&[], 0.0), Err(StatisticsError::EmptyInput));
        assert_eq!(
            compute_statistics(&[f64::NAN, f64::INFINITY], 0.0),
            Err(StatisticsError::EmptyInput)
        );
    }

    #[test]
    fn non_finite_values_are_skipped() {
        let stats = compute_statistics(&[f64::NAN, 5.0, 1.0], 0.0).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 3.0);
    }

    #[test]
    fn mean_survives_sums_beyond_f64_range() {
        let stats = compute_statistics(&[f64::MAX, f64::MAX, 0.0], 0.0).unwrap();
        let expected = f64::MAX / 3.0 * 2.0;
        assert!(stats.mean.is_finite());
        assert!((stats.mean - expected).abs() <= expected * 1e-12);
        assert!(stats.mean < stats.max);

        let stats = compute_statistics(&[-f64::MAX, -f64::MAX], 0.0).unwrap();
        assert_eq!(stats.mean, -f64::MAX);
    }

    #[test]
    fn default_threshold_is_eighty_percent_of_range() {
        assert_eq!(default_threshold(0.0, 100.0), 80.0);
        assert_eq!(default_threshold(10.0, 20.0), 18.0);
        assert_eq!(threshold_at(0.0, 100.0, 0.5), 50.0);
    }

    #[test]
    fn partition_treats_missing_values_as_below() {
        let features = vec![
            Feature::from_attributes([("scenario_1", AttributeValue::Number(0.9))]),
            Feature::from_attributes([("scenario_1", AttributeValue::Number(0.2))]),
            Feature::from_attributes([("other", AttributeValue::Number(5.0))]),
            Feature::from_attributes([("scenario_1", AttributeValue::Number(0.8))]),
        ];
        let partition = partition_by_threshold(&features, "scenario_1", 0.8);
        assert_eq!(partition.above, vec![0, 3]);
        assert_eq!(partition.below, vec![1, 2]);
    }

    #[test]
    fn empty_input_maps_to_analysis_error() {
        let err = StatisticsError::EmptyInput.for_column("scenario_2");
        assert_eq!(err.code(), ErrorCode::ANALYSIS_EMPTY_INPUT);
        assert!(err.to_string().contains("scenario_2"));
    }

    proptest! {
        #[test]
        fn prop_mean_lies_between_min_and_max(
            values in prop::collection::vec(-1.0e9f64..1.0e9, 1..200),
            threshold in -1.0e9f64..1.0e9,
        ) {
            let stats = compute_statistics(&values, threshold).unwrap();
            let tolerance = 1e-9 * stats.min.abs().max(stats.max.abs()).max(1.0);
            prop_assert!(stats.min - tolerance <= stats.mean);
            prop_assert!(stats.mean <= stats.max + tolerance);
            prop_assert!(stats.min <= stats.median && stats.median <= stats.max);
            prop_assert!(stats.count_above_threshold <= stats.count);
        }

        #[test]
        fn prop_partition_is_total(values in prop::collection::vec(0.0f64..1.0, 0..50)) {
            let features: Vec<Feature> = values
                .iter()
                .map(|v| Feature::from_attributes([("v", AttributeValue::Number(*v))]))
                .collect();
            let partition = partition_by_threshold(&features, "v", 0.5);
            prop_assert_eq!(partition.above.len() + partition.below.len(), features.len());
        }
    }
}
