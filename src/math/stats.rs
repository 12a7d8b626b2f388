//! Summary statistics used for standardization and fold aggregation.
//!
//! ## Purpose
//!
//! This module provides the small set of descriptive statistics the crate
//! relies on: mean, sample standard deviation, standard error of the mean,
//! and rank-based binning of a numeric column into strata.
//!
//! ## Design notes
//!
//! * **Sample statistics**: Standard deviation uses the n - 1 denominator.
//! * **Selection over sorting**: Rank binning sorts indices once; no
//!   interpolation between order statistics.
//!
//! ## Invariants
//!
//! * `sample_std_dev` and `standard_error` are >= 0 for finite input.
//! * `rank_bins` assigns every index to exactly one bin, bin sizes differ by
//!   at most one, and bins are ordered by value.

use core::cmp::Ordering::Equal;
use num_traits::Float;

use crate::primitives::partition::group_sizes;

/// Arithmetic mean. Returns zero for an empty slice.
#[inline]
pub fn mean<T: Float>(vals: &[T]) -> T {
    if vals.is_empty() {
        return T::zero();
    }
    let sum = vals.iter().copied().fold(T::zero(), |acc, x| acc + x);
    sum / T::from(vals.len()).unwrap_or_else(T::one)
}

/// Sample standard deviation (n - 1 denominator).
///
/// Returns NaN for fewer than two values.
#[inline]
pub fn sample_std_dev<T: Float>(vals: &[T]) -> T {
    let n = vals.len();
    if n < 2 {
        return T::nan();
    }
    let m = mean(vals);
    let ss = vals
        .iter()
        .map(|&v| (v - m) * (v - m))
        .fold(T::zero(), |acc, x| acc + x);
    (ss / T::from(n - 1).unwrap_or_else(T::one)).sqrt()
}

/// Standard error of the mean: sample sd / √n.
#[inline]
pub fn standard_error<T: Float>(vals: &[T]) -> T {
    let n = vals.len();
    if n < 2 {
        return T::nan();
    }
    sample_std_dev(vals) / T::from(n).unwrap_or_else(T::one).sqrt()
}

/// Assign each value to one of `bins` groups by rank.
///
/// Values are ordered ascending (ties by position) and cut into contiguous,
/// nearly equal-size groups. Returns the bin number of each input position.
pub fn rank_bins<T: Float>(vals: &[T], bins: usize) -> Vec<usize> {
    let n = vals.len();
    let bins = bins.clamp(1, n.max(1));

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        vals[a]
            .partial_cmp(&vals[b])
            .unwrap_or(Equal)
            .then(a.cmp(&b))
    });

    let mut assignment = vec![0; n];
    let mut start = 0;
    for (bin, size) in group_sizes(n, bins, 0).into_iter().enumerate() {
        for &i in &order[start..start + size] {
            assignment[i] = bin;
        }
        start += size;
    }
    assignment
}
