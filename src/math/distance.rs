//! Distance metrics for neighbor search.
//!
//! ## Purpose
//!
//! This module provides the pairwise distance between two feature vectors.
//! Features are standardized before they reach the index, so every metric
//! here works on unit-free coordinates.
//!
//! ## Design notes
//!
//! * **Decoupling**: Distance calculation is separated from neighbor selection
//!   and from kernel weighting.
//! * **Minkowski family**: Euclidean (p = 2) and Manhattan (p = 1) have
//!   dedicated fast paths; Chebyshev is the p → ∞ limit.
//!
//! ## Invariants
//!
//! * Distance is always non-negative.
//! * Distance is zero if and only if points are identical.
//!
//! ## Non-goals
//!
//! * This module does not rescale features (handled by `standardize`).
//! * This module does not weight neighbors (handled by `kernel`).

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Distance Metric Enum
// ============================================================================

/// Distance metric for neighbor search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMetric<T> {
    /// Standard Euclidean distance: √(Σ(xᵢ - yᵢ)²)
    #[default]
    Euclidean,

    /// Manhattan distance (L1 norm): Σ|xᵢ - yᵢ|
    Manhattan,

    /// Chebyshev distance (L∞ norm): max|xᵢ - yᵢ|
    Chebyshev,

    /// Minkowski distance (Lp norm): (Σ|xᵢ - yᵢ|^p)^(1/p)
    /// p must be >= 1.0.
    Minkowski(T),
}

// ============================================================================
// Distance Computation Functions
// ============================================================================

impl<T: Float> DistanceMetric<T> {
    /// Distance between two points under this metric.
    #[inline]
    pub fn distance(&self, a: &[T], b: &[T]) -> T {
        match *self {
            DistanceMetric::Euclidean => Self::euclidean(a, b),
            DistanceMetric::Manhattan => Self::manhattan(a, b),
            DistanceMetric::Chebyshev => Self::chebyshev(a, b),
            DistanceMetric::Minkowski(p) => Self::minkowski(a, b, p),
        }
    }

    /// Compute Euclidean distance between two nD points.
    #[inline]
    pub fn euclidean(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| {
                let diff = ai - bi;
                diff * diff
            })
            .fold(T::zero(), |acc, x| acc + x)
            .sqrt()
    }

    /// Compute Manhattan distance (L1 norm).
    #[inline]
    pub fn manhattan(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| (ai - bi).abs())
            .fold(T::zero(), |acc, x| acc + x)
    }

    /// Compute Chebyshev distance (L-inf norm).
    #[inline]
    pub fn chebyshev(a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| (ai - bi).abs())
            .fold(T::zero(), T::max)
    }

    /// Compute Minkowski distance (Lp norm).
    #[inline]
    pub fn minkowski(a: &[T], b: &[T], p: T) -> T {
        debug_assert_eq!(a.len(), b.len());
        let sum_pow = a
            .iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| (ai - bi).abs().powf(p))
            .fold(T::zero(), |acc, x| acc + x);
        sum_pow.powf(T::one() / p)
    }
}
