//! Fixed-width histogram of a scenario column.
//!
//! Bins are uniformly spaced over `[min, max]` and the max edge is
//! inclusive, so the largest value lands in the last bin.

use super::statistics::StatisticsError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges
    pub edges: Vec<f64>,
    /// Count per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(lower, upper, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin the finite values of `values` into `bins` uniform bins.
///
/// A degenerate range (every value equal) yields a single bin holding all
/// values regardless of `bins`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram, StatisticsError> {
    if bins == 0 {
        return Err(StatisticsError::ZeroBins);
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (min, max) = finite
        .iter()
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or(StatisticsError::EmptyInput)?;

    if max <= min {
        return Ok(Histogram {
            edges: vec![min, max],
            counts: vec![finite.len()],
        });
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { max } else { min + i as f64 * width })
        .collect();

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(Histogram { edges, counts })
}
