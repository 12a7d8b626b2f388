//! Neighbor weighting kernels.
//!
//! ## Purpose
//!
//! This module turns neighbor distances into aggregation weights for both
//! regression (weighted mean) and classification (weighted vote).
//!
//! ## Design notes
//!
//! * **Bandwidth**: Distance-based kernels evaluate `u = d / b` where `b` is
//!   the distance of the (k+1)-th nearest neighbor, so `u ∈ [0, 1]`.
//! * **Fallback**: When no bandwidth is available, the bandwidth is zero, or
//!   every weight vanishes, all neighbors weigh equally.
//! * **Inverse**: Exact matches (d = 0) share all the weight.
//!
//! ## Invariants
//!
//! * Returned weights are finite, non-negative, and sum to a positive value.
//! * `Uniform` always yields equal weights.

use num_traits::Float;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kernel used to weight the k nearest neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeightFunction {
    /// Every neighbor weighs the same ("rectangular").
    #[default]
    Uniform,

    /// Linear decay: 1 - u
    Triangle,

    /// Parabolic decay: 3/4 (1 - u²)
    Epanechnikov,

    /// Standard normal density of u.
    Gaussian,

    /// Inverse distance: 1 / d
    Inverse,
}

impl WeightFunction {
    /// True for the rectangular kernel.
    pub fn is_uniform(&self) -> bool {
        matches!(self, WeightFunction::Uniform)
    }

    /// Kernel value at normalized distance `u`.
    #[inline]
    pub fn kernel<T: Float>(&self, u: T) -> T {
        let one = T::one();
        match self {
            WeightFunction::Uniform => one,
            WeightFunction::Triangle => (one - u).max(T::zero()),
            WeightFunction::Epanechnikov => {
                let three_quarters = T::from(0.75).unwrap_or(one);
                (three_quarters * (one - u * u)).max(T::zero())
            }
            WeightFunction::Gaussian => {
                let two = one + one;
                let norm = (two * T::from(core::f64::consts::PI).unwrap_or(one)).sqrt();
                (-(u * u) / two).exp() / norm
            }
            WeightFunction::Inverse => {
                if u > T::zero() {
                    one / u
                } else {
                    T::infinity()
                }
            }
        }
    }

    /// Weights for neighbors at `distances` (ascending).
    ///
    /// `bandwidth` is the distance of the next-nearest neighbor beyond the set.
    pub fn weights<T: Float>(&self, distances: &[T], bandwidth: Option<T>) -> Vec<T> {
        let uniform = || vec![T::one(); distances.len()];

        let weights: Vec<T> = match self {
            WeightFunction::Uniform => return uniform(),
            WeightFunction::Inverse => {
                if distances.iter().any(|&d| d <= T::zero()) {
                    distances
                        .iter()
                        .map(|&d| if d <= T::zero() { T::one() } else { T::zero() })
                        .collect()
                } else {
                    distances.iter().map(|&d| self.kernel(d)).collect()
                }
            }
            _ => match bandwidth {
                Some(b) if b > T::zero() && b.is_finite() => {
                    distances.iter().map(|&d| self.kernel(d / b)).collect()
                }
                _ => {
                    debug!(kernel = ?self, "No usable bandwidth; using uniform weights");
                    return uniform();
                }
            },
        };

        let total = weights.iter().copied().fold(T::zero(), |acc, w| acc + w);
        if total <= T::zero() || !total.is_finite() {
            debug!(kernel = ?self, "All neighbor weights vanished; using uniform weights");
            return uniform();
        }
        weights
    }
}
