//! Feature standardization fitted on training data only.
//!
//! ## Purpose
//!
//! This module centers and scales each feature column to zero mean and unit
//! sample standard deviation, using parameters estimated from a designated
//! training dataset and applied unchanged to any other dataset.
//!
//! ## Design notes
//!
//! * **Leakage prevention**: [`Standardizer::fit`] is the only place
//!   parameters are estimated; [`Standardizer::transform`] never refits.
//! * **Schema binding**: Parameters remember the feature names they were fit
//!   on and refuse datasets with a different layout.
//! * **Pure**: Both operations take immutable inputs and return new values.
//!
//! ## Invariants
//!
//! * Every fitted standard deviation is finite and strictly positive.
//! * Transforming the training set yields column means ≈ 0 and sample
//!   standard deviations ≈ 1.
//!
//! ## Non-goals
//!
//! * This module does not drop or impute degenerate features; it reports them.

use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::stats::{mean, sample_std_dev};
use crate::primitives::dataset::{Dataset, Schema};
use crate::primitives::errors::KnnError;

/// Per-feature centering and scaling parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StandardizationParams<T> {
    feature_names: Vec<String>,
    means: Vec<T>,
    std_devs: Vec<T>,
}

impl<T: Float> StandardizationParams<T> {
    /// Feature names the parameters were fitted on.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Per-feature training means.
    pub fn means(&self) -> &[T] {
        &self.means
    }

    /// Per-feature training sample standard deviations.
    pub fn std_devs(&self) -> &[T] {
        &self.std_devs
    }

    /// Standardize a dataset with these parameters.
    pub fn transform(&self, dataset: &Dataset<T>) -> Result<Dataset<T>, KnnError> {
        Standardizer::transform(dataset, self)
    }

    /// Standardize a single feature vector.
    pub fn transform_point(&self, point: &[T]) -> Result<Vec<T>, KnnError> {
        if point.len() != self.means.len() {
            return Err(KnnError::SchemaMismatch(format!(
                "point has {} features, standardization was fitted on {}",
                point.len(),
                self.means.len()
            )));
        }
        Ok(point
            .iter()
            .zip(self.means.iter().zip(self.std_devs.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }

    fn check_schema(&self, schema: &Schema) -> Result<(), KnnError> {
        let names = schema.feature_names();
        if names.len() != self.feature_names.len() {
            return Err(KnnError::SchemaMismatch(format!(
                "dataset has {} features, standardization was fitted on {}",
                names.len(),
                self.feature_names.len()
            )));
        }
        if let Some((fitted, got)) = self
            .feature_names
            .iter()
            .zip(names.iter())
            .find(|(a, b)| a != b)
        {
            return Err(KnnError::SchemaMismatch(format!(
                "expected feature '{}', got '{}'",
                fitted, got
            )));
        }
        Ok(())
    }
}

/// Fits and applies z-score standardization.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standardizer;

impl Standardizer {
    /// Estimate per-feature mean and sample standard deviation from `training`.
    ///
    /// Fails with [`KnnError::DegenerateFeature`] when a column is constant
    /// and with [`KnnError::InsufficientData`] for fewer than two rows.
    pub fn fit<T: Float>(training: &Dataset<T>) -> Result<StandardizationParams<T>, KnnError> {
        let n = training.len();
        if n < 2 {
            return Err(KnnError::InsufficientData {
                required: 2,
                got: n,
                stratum: None,
            });
        }

        let names = training.schema().feature_names();
        let mut means = Vec::with_capacity(names.len());
        let mut std_devs = Vec::with_capacity(names.len());

        for (j, name) in names.iter().enumerate() {
            let column = training.column(j);
            let (lo, hi) = column
                .iter()
                .fold((T::infinity(), T::neg_infinity()), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let sd = sample_std_dev(&column);
            // Exact constancy check; the mean of identical values can round.
            if lo == hi || !sd.is_finite() || sd <= T::zero() {
                return Err(KnnError::DegenerateFeature {
                    feature: name.clone(),
                    fold: None,
                });
            }
            means.push(mean(&column));
            std_devs.push(sd);
        }

        Ok(StandardizationParams {
            feature_names: names.to_vec(),
            means,
            std_devs,
        })
    }

    /// Apply fitted parameters to any dataset.
    pub fn transform<T: Float>(
        dataset: &Dataset<T>,
        params: &StandardizationParams<T>,
    ) -> Result<Dataset<T>, KnnError> {
        params.check_schema(dataset.schema())?;

        let mut scaled = Vec::with_capacity(dataset.features().len());
        for row in dataset.rows() {
            scaled.extend(
                row.iter()
                    .zip(params.means.iter().zip(params.std_devs.iter()))
                    .map(|(&x, (&m, &s))| (x - m) / s),
            );
        }
        Ok(dataset.with_features(scaled))
    }
}
