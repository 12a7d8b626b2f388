//! Error types for KNN prediction and tuning.
//!
//! ## Purpose
//!
//! This module defines the single error type returned by every fallible
//! operation in the crate. Each variant carries enough context (feature name,
//! fold id, neighbor count) for the caller to diagnose the failure.
//!
//! ## Design notes
//!
//! * **Recoverable**: Every variant describes a local condition the caller can
//!   act on. Nothing here is fatal to the process.
//! * **No auto-repair**: The crate never silently drops degenerate features or
//!   substitutes a value for an undefined metric.
//! * **Context attachment**: Errors raised while evaluating a fold are tagged
//!   with the fold id (and neighbor count) on their way out.
//!
//! ## Non-goals
//!
//! * This module does not log; callers decide how to report errors.

use thiserror::Error;

/// Error type for KNN operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnnError {
    /// The input dataset (or prediction/truth sequence) has no rows.
    #[error("Input dataset is empty")]
    EmptyInput,

    /// Generic invalid input with a description.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A value is NaN or infinite.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// A dataset or point does not match the shape or label kind of the fitted
    /// parameters, index or requested mode.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A feature has zero standard deviation in the training data.
    #[error(
        "Degenerate feature '{feature}': zero standard deviation in training data{}",
        fold_suffix(.fold)
    )]
    DegenerateFeature {
        /// Name of the constant feature.
        feature: String,
        /// Fold in which the feature was constant, if any.
        fold: Option<usize>,
    },

    /// Neighbor count outside `[1, max]`.
    ///
    /// `max` is `usize::MAX` when the check ran before any data was seen.
    #[error("Invalid k: {k} ({}){}", k_range(.max), fold_suffix(.fold))]
    InvalidK {
        /// The requested neighbor count.
        k: usize,
        /// Number of reference observations available.
        max: usize,
        /// Fold in which the check failed, if any.
        fold: Option<usize>,
    },

    /// A fold or stratum is too small for the requested partitioning.
    #[error(
        "Insufficient data{}: got {got} observations, need at least {required}",
        stratum_suffix(.stratum)
    )]
    InsufficientData {
        /// Minimum number of observations required.
        required: usize,
        /// Number of observations available.
        got: usize,
        /// Name of the offending stratum, if stratified.
        stratum: Option<String>,
    },

    /// A metric's denominator is zero.
    #[error("Undefined metric '{metric}': {reason}{}", fold_k_suffix(.fold, .k))]
    UndefinedMetric {
        /// Metric name.
        metric: &'static str,
        /// Why the metric is undefined.
        reason: String,
        /// Fold being evaluated, if any.
        fold: Option<usize>,
        /// Neighbor count being evaluated, if any.
        k: Option<usize>,
    },

    /// Cross-validation needs at least two folds.
    #[error("Invalid fold count: {0} (must be at least 2)")]
    InvalidFoldCount(usize),

    /// Minkowski order below one or non-finite.
    #[error("Invalid Minkowski order: {0} (must be >= 1 and finite)")]
    InvalidMinkowskiP(f64),

    /// Train/test proportion outside the open unit interval.
    #[error("Invalid proportion: {0} (must be > 0 and < 1)")]
    InvalidProportion(f64),

    /// A builder parameter was configured more than once.
    #[error(
        "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
    )]
    DuplicateParameter {
        /// Name of the duplicated parameter.
        parameter: &'static str,
    },
}

impl KnnError {
    /// Tag a fold-level error with the fold it occurred in.
    ///
    /// Existing context is never overwritten.
    pub fn in_fold(self, fold_id: usize) -> Self {
        match self {
            KnnError::DegenerateFeature { feature, fold } => KnnError::DegenerateFeature {
                feature,
                fold: fold.or(Some(fold_id)),
            },
            KnnError::InvalidK { k, max, fold } => KnnError::InvalidK {
                k,
                max,
                fold: fold.or(Some(fold_id)),
            },
            KnnError::UndefinedMetric {
                metric,
                reason,
                fold,
                k,
            } => KnnError::UndefinedMetric {
                metric,
                reason,
                fold: fold.or(Some(fold_id)),
                k,
            },
            other => other,
        }
    }

    /// Tag a metric error with the fold and neighbor count it was computed for.
    pub fn in_fold_at_k(self, fold_id: usize, k_value: usize) -> Self {
        match self.in_fold(fold_id) {
            KnnError::UndefinedMetric {
                metric,
                reason,
                fold,
                k,
            } => KnnError::UndefinedMetric {
                metric,
                reason,
                fold,
                k: k.or(Some(k_value)),
            },
            other => other,
        }
    }
}

fn fold_suffix(fold: &Option<usize>) -> String {
    match fold {
        Some(id) => format!(" (fold {})", id),
        None => String::new(),
    }
}

fn k_range(max: &usize) -> String {
    match *max {
        usize::MAX => "must be at least 1".to_string(),
        max => format!("must be in [1, {}]", max),
    }
}

fn fold_k_suffix(fold: &Option<usize>, k: &Option<usize>) -> String {
    match (fold, k) {
        (Some(id), Some(k)) => format!(" (fold {}, k = {})", id, k),
        (Some(id), None) => format!(" (fold {})", id),
        (None, Some(k)) => format!(" (k = {})", k),
        (None, None) => String::new(),
    }
}

fn stratum_suffix(stratum: &Option<String>) -> String {
    match stratum {
        Some(name) => format!(" in stratum '{}'", name),
        None => String::new(),
    }
}
