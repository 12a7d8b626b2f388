//! KNN regression and classification on top of a neighbor index.
//!
//! ## Purpose
//!
//! This module turns neighbor sets into predictions: a weighted mean of
//! numeric targets for regression, a weighted majority vote for
//! classification. Both modes share the same neighbor search.
//!
//! ## Design notes
//!
//! * **Tagged mode**: [`PredictionMode`] selects between the two aggregation
//!   paths; there is no trait hierarchy of model types.
//! * **Vote tie-break**: Among classes with equal vote weight the class whose
//!   neighbors have the smallest summed distance wins; a remaining tie goes
//!   to the smaller class code.
//! * **Probabilities**: Each class's share of the total vote weight
//!   (votes / k under uniform weights).
//!
//! ## Key concepts
//!
//! * **Bandwidth**: The (k+1)-th neighbor distance, queried alongside the k
//!   neighbors and handed to the kernel.
//!
//! ## Invariants
//!
//! * Batch predictions are aligned with input row order.
//! * Class probabilities sum to one.

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithms::index::KnnIndex;
use crate::math::kernel::WeightFunction;
use crate::math::neighborhood::Neighbor;
use crate::primitives::dataset::{Dataset, Label, Schema};
use crate::primitives::errors::KnnError;

// ============================================================================
// Prediction Types
// ============================================================================

/// Whether neighbors are aggregated as numeric targets or class votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PredictionMode {
    /// Weighted mean of numeric targets.
    #[default]
    Regression,

    /// Weighted majority vote over classes.
    Classification,
}

impl PredictionMode {
    /// Check that the label kind of `schema` supports this mode.
    pub fn check_schema(self, schema: &Schema) -> Result<(), KnnError> {
        match (self, schema.is_categorical()) {
            (PredictionMode::Regression, true) => Err(KnnError::SchemaMismatch(format!(
                "regression needs a numeric label, '{}' is categorical",
                schema.label_name()
            ))),
            (PredictionMode::Classification, false) => Err(KnnError::SchemaMismatch(format!(
                "classification needs a categorical label, '{}' is numeric",
                schema.label_name()
            ))),
            _ => Ok(()),
        }
    }
}

/// A predicted value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Prediction<T> {
    /// Regression estimate.
    Numeric(T),

    /// Predicted class code.
    Class(usize),
}

/// Prediction for one query row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PredictionResult<T> {
    /// Row of the query in the predicted dataset.
    pub row: usize,
    /// The predicted value.
    pub prediction: Prediction<T>,
    /// Per-class vote share, indexed by class code (empty for regression).
    pub probabilities: Vec<T>,
}

impl<T: Copy> PredictionResult<T> {
    /// The regression estimate, if any.
    pub fn value(&self) -> Option<T> {
        match self.prediction {
            Prediction::Numeric(v) => Some(v),
            Prediction::Class(_) => None,
        }
    }

    /// The predicted class code, if any.
    pub fn class(&self) -> Option<usize> {
        match self.prediction {
            Prediction::Class(c) => Some(c),
            Prediction::Numeric(_) => None,
        }
    }
}

/// The hyperparameters that define one KNN model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnnParams {
    /// Number of neighbors.
    pub k: usize,
    /// Neighbor weighting kernel.
    pub weight_function: WeightFunction,
    /// Regression or classification.
    pub mode: PredictionMode,
}

// ============================================================================
// Predictor
// ============================================================================

/// Produces predictions from a [`KnnIndex`].
#[derive(Debug, Clone, Copy)]
pub struct KnnPredictor<'a, T> {
    index: &'a KnnIndex<T>,
    weight_function: WeightFunction,
}

impl<'a, T: Float> KnnPredictor<'a, T> {
    /// Predictor with uniform neighbor weights.
    pub fn new(index: &'a KnnIndex<T>) -> Self {
        Self {
            index,
            weight_function: WeightFunction::Uniform,
        }
    }

    /// Use a different neighbor weighting kernel.
    pub fn with_weight_function(mut self, weight_function: WeightFunction) -> Self {
        self.weight_function = weight_function;
        self
    }

    /// The configured weighting kernel.
    pub fn weight_function(&self) -> WeightFunction {
        self.weight_function
    }

    /// Weighted mean of the `k` nearest neighbors' numeric targets.
    pub fn predict_regression(&self, point: &[T], k: usize) -> Result<T, KnnError> {
        self.check_mode(PredictionMode::Regression)?;
        self.index.check_k(k)?;
        let set = self.index.nearest(point, k + 1)?;
        let (neighbors, bandwidth) = set.split_at_k(k);
        Ok(self.regress(neighbors, bandwidth))
    }

    /// Weighted majority class among the `k` nearest neighbors.
    ///
    /// Returns the class code and the per-class vote shares.
    pub fn predict_classification(
        &self,
        point: &[T],
        k: usize,
    ) -> Result<(usize, Vec<T>), KnnError> {
        self.check_mode(PredictionMode::Classification)?;
        self.index.check_k(k)?;
        let set = self.index.nearest(point, k + 1)?;
        let (neighbors, bandwidth) = set.split_at_k(k);
        Ok(self.vote(neighbors, bandwidth))
    }

    /// Predict every row of `dataset`, preserving row order.
    pub fn predict_batch(
        &self,
        dataset: &Dataset<T>,
        k: usize,
        mode: PredictionMode,
    ) -> Result<Vec<PredictionResult<T>>, KnnError> {
        self.check_mode(mode)?;
        self.index.check_k(k)?;
        self.index
            .reference()
            .schema()
            .ensure_same_features(dataset.schema())?;

        dataset
            .rows()
            .enumerate()
            .map(|(row, point)| {
                let set = self.index.nearest(point, k + 1)?;
                let (neighbors, bandwidth) = set.split_at_k(k);
                Ok(self.aggregate(row, neighbors, bandwidth, mode))
            })
            .collect()
    }

    /// Aggregate an already selected neighbor list.
    ///
    /// `neighbors` must be sorted ascending and `bandwidth` is the next
    /// neighbor's distance. The mode must match the index labels.
    pub fn aggregate(
        &self,
        row: usize,
        neighbors: &[Neighbor<T>],
        bandwidth: Option<T>,
        mode: PredictionMode,
    ) -> PredictionResult<T> {
        match mode {
            PredictionMode::Regression => PredictionResult {
                row,
                prediction: Prediction::Numeric(self.regress(neighbors, bandwidth)),
                probabilities: Vec::new(),
            },
            PredictionMode::Classification => {
                let (class, probabilities) = self.vote(neighbors, bandwidth);
                PredictionResult {
                    row,
                    prediction: Prediction::Class(class),
                    probabilities,
                }
            }
        }
    }

    /// Check that the index labels support `mode`.
    pub fn check_mode(&self, mode: PredictionMode) -> Result<(), KnnError> {
        mode.check_schema(self.index.reference().schema())
    }

    // ------------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------------

    fn neighbor_weights(&self, neighbors: &[Neighbor<T>], bandwidth: Option<T>) -> Vec<T> {
        let distances: Vec<T> = neighbors.iter().map(|n| n.distance).collect();
        self.weight_function.weights(&distances, bandwidth)
    }

    fn regress(&self, neighbors: &[Neighbor<T>], bandwidth: Option<T>) -> T {
        let weights = self.neighbor_weights(neighbors, bandwidth);
        let (weighted_sum, total) = neighbors.iter().zip(weights.iter()).fold(
            (T::zero(), T::zero()),
            |(sum, total), (n, &w)| {
                let y = self.index.label(n.index).as_numeric().unwrap_or_else(T::zero);
                (sum + w * y, total + w)
            },
        );
        weighted_sum / total
    }

    fn vote(&self, neighbors: &[Neighbor<T>], bandwidth: Option<T>) -> (usize, Vec<T>) {
        let n_classes = self
            .index
            .reference()
            .classes()
            .map(|c| c.len())
            .unwrap_or(0);
        let weights = self.neighbor_weights(neighbors, bandwidth);

        let mut votes = vec![T::zero(); n_classes];
        let mut distance_sums = vec![T::zero(); n_classes];
        let mut counts = vec![0usize; n_classes];
        for (n, &w) in neighbors.iter().zip(weights.iter()) {
            if let Label::Class(c) = self.index.label(n.index) {
                votes[c] = votes[c] + w;
                distance_sums[c] = distance_sums[c] + n.distance;
                counts[c] += 1;
            }
        }

        let mut winner: Option<usize> = None;
        for c in (0..n_classes).filter(|&c| counts[c] > 0) {
            winner = match winner {
                None => Some(c),
                Some(best) => {
                    let more_votes = votes[c] > votes[best];
                    let closer = votes[c] == votes[best] && distance_sums[c] < distance_sums[best];
                    if more_votes || closer { Some(c) } else { Some(best) }
                }
            };
        }

        let total = votes.iter().copied().fold(T::zero(), |acc, v| acc + v);
        let probabilities = votes.iter().map(|&v| v / total).collect();
        (winner.unwrap_or(0), probabilities)
    }
}
