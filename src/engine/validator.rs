//! Input validation for KNN configuration and tuning requests.
//!
//! ## Purpose
//!
//! This module checks configuration parameters and tuning requests before
//! any fold is split or any index is built: neighbor counts, fold counts,
//! metric/mode compatibility, distance parameters and proportions.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Cheap first**: Parameter checks run before anything touches the data.
//!
//! ## Key concepts
//!
//! * **Data-dependent bounds**: The upper bound on k depends on the size of
//!   each fold's training subset, so it is checked again per fold by the
//!   executor.
//!
//! ## Invariants
//!
//! * Validation is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform or repair invalid inputs.

use num_traits::Float;

use crate::algorithms::predictor::PredictionMode;
use crate::evaluation::metrics::Metric;
use crate::math::distance::DistanceMetric;
use crate::primitives::dataset::Schema;
use crate::primitives::errors::KnnError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for KNN configuration and tuning requests.
///
/// All methods fail fast upon identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate a single neighbor count before the data is known.
    ///
    /// The upper bound is reported as `usize::MAX` until a training set
    /// fixes it.
    pub fn validate_k(k: usize) -> Result<(), KnnError> {
        if k < 1 {
            return Err(KnnError::InvalidK {
                k,
                max: usize::MAX,
                fold: None,
            });
        }
        Ok(())
    }

    /// Validate a grid of candidate neighbor counts.
    pub fn validate_k_grid(k_grid: &[usize]) -> Result<(), KnnError> {
        if k_grid.is_empty() {
            return Err(KnnError::InvalidInput(
                "neighbor count grid is empty".to_string(),
            ));
        }
        k_grid.iter().try_for_each(|&k| Self::validate_k(k))
    }

    /// Validate a neighbor count against the number of training rows.
    pub fn validate_k_against(k: usize, n_train: usize) -> Result<(), KnnError> {
        if k < 1 || k > n_train {
            return Err(KnnError::InvalidK {
                k,
                max: n_train,
                fold: None,
            });
        }
        Ok(())
    }

    /// Validate the number of cross-validation folds.
    pub fn validate_fold_count(fold_count: usize) -> Result<(), KnnError> {
        if fold_count < 2 {
            return Err(KnnError::InvalidFoldCount(fold_count));
        }
        Ok(())
    }

    /// Validate that every metric applies to `mode`.
    pub fn validate_metrics(metrics: &[Metric], mode: PredictionMode) -> Result<(), KnnError> {
        if metrics.is_empty() {
            return Err(KnnError::InvalidInput("no metrics requested".to_string()));
        }
        if let Some(m) = metrics.iter().find(|m| m.mode() != mode) {
            return Err(KnnError::InvalidInput(format!(
                "metric '{}' does not apply to {:?}",
                m.name(),
                mode
            )));
        }
        Ok(())
    }

    /// Validate distance metric parameters.
    pub fn validate_distance_metric<T: Float>(metric: DistanceMetric<T>) -> Result<(), KnnError> {
        match metric {
            DistanceMetric::Minkowski(p) if !p.is_finite() || p < T::one() => Err(
                KnnError::InvalidMinkowskiP(p.to_f64().unwrap_or(f64::NAN)),
            ),
            _ => Ok(()),
        }
    }

    /// Validate a train proportion for a hold-out split.
    pub fn validate_proportion(prop: f64) -> Result<(), KnnError> {
        if !(prop > 0.0 && prop < 1.0) {
            return Err(KnnError::InvalidProportion(prop));
        }
        Ok(())
    }

    // ========================================================================
    // Data Validation
    // ========================================================================

    /// Resolve the positive class name to a class code.
    ///
    /// Defaults to the first class level. Numeric labels resolve to 0.
    pub fn resolve_positive_class(
        schema: &Schema,
        positive_class: Option<&str>,
    ) -> Result<usize, KnnError> {
        match (positive_class, schema.is_categorical()) {
            (Some(name), true) => schema.class_code(name).ok_or_else(|| {
                KnnError::SchemaMismatch(format!(
                    "positive class '{}' is not a level of '{}'",
                    name,
                    schema.label_name()
                ))
            }),
            _ => Ok(0),
        }
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), KnnError> {
        if let Some(param) = duplicate_param {
            return Err(KnnError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
