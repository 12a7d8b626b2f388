//! Exhaustive nearest-neighbor index over a standardized reference set.
//!
//! ## Purpose
//!
//! This module stores the (already standardized) reference dataset and
//! answers "k nearest neighbors of this point" queries.
//!
//! ## Design notes
//!
//! * **Lazy learner**: Building the index only copies the reference data.
//! * **Brute force**: A query measures the distance to every stored row; the
//!   k smallest are picked by partial selection.
//! * **Deterministic ties**: Equal distances resolve by reference row order.
//!
//! ## Invariants
//!
//! * A successful `query(point, k)` returns exactly k distinct neighbors,
//!   ascending by distance.
//!
//! ## Non-goals
//!
//! * This module does not standardize (callers pass standardized data).
//! * This module does not aggregate neighbor labels (handled by `predictor`).

use num_traits::Float;

use crate::math::distance::DistanceMetric;
use crate::math::neighborhood::{Neighbor, NeighborSet};
use crate::primitives::dataset::{Dataset, Label};
use crate::primitives::errors::KnnError;

/// Reference set for k-nearest-neighbor queries.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnIndex<T> {
    reference: Dataset<T>,
    metric: DistanceMetric<T>,
}

impl<T: Float> KnnIndex<T> {
    /// Build an index with the default Euclidean metric.
    pub fn build(train: &Dataset<T>) -> Self {
        Self::build_with_metric(train, DistanceMetric::Euclidean)
    }

    /// Build an index with an explicit distance metric.
    pub fn build_with_metric(train: &Dataset<T>, metric: DistanceMetric<T>) -> Self {
        Self {
            reference: train.clone(),
            metric,
        }
    }

    /// Number of reference observations.
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// Always false: an index holds at least one observation.
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Feature dimension of the reference points.
    pub fn dimensions(&self) -> usize {
        self.reference.n_features()
    }

    /// The distance metric used by queries.
    pub fn metric(&self) -> DistanceMetric<T> {
        self.metric
    }

    /// The stored reference dataset.
    pub fn reference(&self) -> &Dataset<T> {
        &self.reference
    }

    /// Label of reference row `i`.
    pub fn label(&self, i: usize) -> Label<T> {
        self.reference.label(i)
    }

    /// The `k` nearest reference observations to `point`.
    ///
    /// Fails with [`KnnError::InvalidK`] unless `1 <= k <= self.len()`.
    pub fn query(&self, point: &[T], k: usize) -> Result<NeighborSet<T>, KnnError> {
        self.check_k(k)?;
        self.nearest(point, k)
    }

    /// Validate a neighbor count against the reference size.
    pub fn check_k(&self, k: usize) -> Result<(), KnnError> {
        if k < 1 || k > self.len() {
            return Err(KnnError::InvalidK {
                k,
                max: self.len(),
                fold: None,
            });
        }
        Ok(())
    }

    /// Up to `m` nearest observations, without range-checking `m`.
    pub(crate) fn nearest(&self, point: &[T], m: usize) -> Result<NeighborSet<T>, KnnError> {
        self.check_point(point)?;
        let candidates: Vec<Neighbor<T>> = self
            .reference
            .rows()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: self.metric.distance(point, row),
            })
            .collect();
        Ok(NeighborSet::select(candidates, m))
    }

    fn check_point(&self, point: &[T]) -> Result<(), KnnError> {
        if point.len() != self.dimensions() {
            return Err(KnnError::SchemaMismatch(format!(
                "query point has {} features, index has {}",
                point.len(),
                self.dimensions()
            )));
        }
        if let Some((i, v)) = point.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(KnnError::InvalidNumericValue(format!(
                "point[{}]={}",
                i,
                v.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }
}
