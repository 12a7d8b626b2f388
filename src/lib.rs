//! # KNN: k-Nearest-Neighbor Modeling with Cross-Validated Tuning for Rust
//!
//! A k-nearest-neighbor regression and classification toolkit with the
//! pieces needed to tune it honestly: leakage-free standardization, seeded
//! stratified k-fold splitting, fold-level metrics and model selection by the
//! best mean or the one-standard-error rule.
//!
//! ## What is KNN?
//!
//! k-nearest neighbors is a lazy, instance-based learner. It stores the
//! training rows and, to predict a new point, finds the k stored rows closest
//! to it in feature space:
//!
//! - **Regression** predicts the (weighted) mean of the neighbors' targets.
//! - **Classification** predicts the class with the largest (weighted) vote.
//!
//! Distances are only meaningful when features share a scale, so every
//! feature is standardized to zero mean and unit variance using statistics
//! from the training rows only.
//!
//! **How tuning works:**
//!
//! 1. Split the data into `f` folds (optionally stratified on a field)
//! 2. For each fold, fit the standardizer on the other `f - 1` folds
//! 3. Build one neighbor index and predict the held-out fold for every k
//! 4. Score each (fold, k) pair and aggregate mean and standard error per k
//! 5. Pick k by best mean or by the one-standard-error rule
//!
//! ## Quick Start
//!
//! ### Regression
//!
//! ```rust
//! use knn_rs::prelude::*;
//!
//! let rows: Vec<[f64; 1]> = (1..=20).map(|week| [week as f64]).collect();
//! let sales: Vec<f64> = (1..=20).map(|week| 2.0 * week as f64).collect();
//! let data = Dataset::regression(["week"], "sales", &rows, &sales)?;
//!
//! // Build the model
//! let model = Knn::new()
//!     .k(3)              // 3 nearest neighbors
//!     .fold_count(5)     // 5-fold cross-validation for tuning
//!     .seed(42)          // reproducible folds
//!     .build()?;
//!
//! // Fit and predict
//! let fitted = model.fit(&data)?;
//! let prediction = fitted.predict_point(&[10.0])?;
//!
//! // Neighbors of week 10 are weeks 9, 10 and 11
//! assert_eq!(prediction, Prediction::Numeric(20.0));
//! # Ok::<(), KnnError>(())
//! ```
//!
//! ### Classification
//!
//! ```rust
//! use knn_rs::prelude::*;
//!
//! let rows = [
//!     [1.0, 1.0], [1.2, 0.8], [0.9, 1.1],
//!     [5.0, 5.0], [5.2, 4.8], [4.9, 5.1],
//! ];
//! let labels = ["real", "real", "real", "fake", "fake", "fake"];
//! let data = Dataset::classification(["x", "y"], "kind", &rows, &labels)?;
//!
//! let model = Knn::new()
//!     .k(3)
//!     .mode(Classification)
//!     .build()?;
//!
//! let fitted = model.fit(&data)?;
//! let class = match fitted.predict_point(&[1.1, 0.9])? {
//!     Prediction::Class(code) => fitted.class_name(code),
//!     Prediction::Numeric(_) => None,
//! };
//! assert_eq!(class, Some("real"));
//! # Ok::<(), KnnError>(())
//! ```
//!
//! ### Tuning k
//!
//! ```rust
//! use knn_rs::prelude::*;
//!
//! let rows: Vec<[f64; 1]> = (1..=20).map(|week| [week as f64]).collect();
//! let sales: Vec<f64> = (1..=20).map(|week| 2.0 * week as f64).collect();
//! let data = Dataset::regression(["week"], "sales", &rows, &sales)?;
//!
//! let model = Knn::new().fold_count(5).seed(42).build()?;
//! let results = model.tune(&data, &[1, 3, 5], &[Rmse, Mae])?;
//!
//! let best = results.select_best(Rmse)?;
//! let simplest = results.select_by_one_std_err(Rmse, SmallerKIsSimpler)?;
//! assert!(simplest <= best);
//!
//! // Final fit with the chosen k
//! let fitted = model.with_params(results.finalize(simplest))?.fit(&data)?;
//! assert_eq!(fitted.params().k, simplest);
//!
//! println!("{}", results);
//! # Ok::<(), KnnError>(())
//! ```
//!
//! ## Builder Parameters
//!
//! | Parameter           | Default       | Description                                       |
//! |---------------------|---------------|---------------------------------------------------|
//! | `k`                 | 5             | Number of neighbors used by `fit`                 |
//! | `weight_function`   | `Uniform`     | Neighbor weighting kernel                         |
//! | `mode`              | `Regression`  | Regression or classification                      |
//! | `fold_count`        | 10            | Number of cross-validation folds                  |
//! | `stratify_by`       | none          | Label or feature to stratify folds and splits on  |
//! | `seed`              | 0             | Seed for fold assignment and splits               |
//! | `distance_metric`   | `Euclidean`   | Distance between standardized feature vectors     |
//! | `positive_class`    | first level   | Positive class for sensitivity and specificity    |
//!
//! Setting the same parameter twice is reported by `build()` as
//! [`KnnError::DuplicateParameter`].
//!
//! ### Weight functions
//!
//! Non-uniform kernels evaluate `u = d / b`, where `b` is the distance of the
//! (k+1)-th nearest neighbor:
//!
//! | Kernel         | Weight                 |
//! |----------------|------------------------|
//! | `Uniform`      | 1                      |
//! | `Triangle`     | 1 - u                  |
//! | `Epanechnikov` | 0.75 (1 - u²)          |
//! | `Gaussian`     | exp(-u²/2) / √(2π)     |
//! | `Inverse`      | 1 / d                  |
//!
//! When no usable bandwidth exists, or every weight vanishes, neighbors are
//! weighted equally.
//!
//! ### Metrics
//!
//! | Metric        | Mode           | Better  |
//! |---------------|----------------|---------|
//! | `Rmse`        | regression     | smaller |
//! | `Mae`         | regression     | smaller |
//! | `Rsq`         | regression     | larger  |
//! | `Accuracy`    | classification | larger  |
//! | `Sensitivity` | classification | larger  |
//! | `Specificity` | classification | larger  |
//!
//! A metric with a zero denominator (for example sensitivity on a fold
//! without positive rows) fails with [`KnnError::UndefinedMetric`] instead of
//! silently returning a number.
//!
//! ## Stratification
//!
//! `stratify_by` names either the label or a feature. A categorical label
//! stratifies by class, so every fold holds ⌊n_c / f⌋ or ⌈n_c / f⌉ rows of
//! each class c. A numeric label or feature is cut into rank quartiles first.
//!
//! ```rust
//! use knn_rs::prelude::*;
//!
//! let rows: Vec<[f64; 1]> = (0..12).map(|i| [i as f64]).collect();
//! let labels: Vec<&str> = (0..12).map(|i| if i < 4 { "yes" } else { "no" }).collect();
//! let data = Dataset::classification(["score"], "passed", &rows, &labels)?;
//!
//! let folds = FoldSplitter::split(&data, 4, Some("passed"), 7)?;
//! for fold in &folds {
//!     let yes = fold.validation.class_codes().unwrap_or(&[])
//!         .iter()
//!         .filter(|&&c| Some(c) == data.schema().class_code("yes"))
//!         .count();
//!     assert_eq!(yes, 1);
//! }
//! # Ok::<(), KnnError>(())
//! ```
//!
//! ## Parallel Execution
//!
//! With the default `parallel` feature, cross-validation folds run on the
//! rayon global thread pool. Results are aggregated in fold order, so they
//! are identical to a sequential run.
//!
//! ## Logging
//!
//! The crate emits `tracing` events: `info` for tuning start and finish,
//! `debug` per fold and for kernel fallbacks, `trace` for fold assignment.
//! Install any `tracing` subscriber to see them.
//!
//! ## Error Handling
//!
//! Every fallible operation returns `Result<_, KnnError>`. Errors raised
//! while evaluating a fold carry the fold id (and k, for metrics):
//!
//! ```rust
//! use knn_rs::prelude::*;
//!
//! let rows: Vec<[f64; 1]> = (0..10).map(|i| [i as f64]).collect();
//! let targets: Vec<f64> = (0..10).map(|i| i as f64).collect();
//! let data = Dataset::regression(["x"], "y", &rows, &targets)?;
//!
//! let model = Knn::new().fold_count(2).build()?;
//! match model.tune(&data, &[3, 8], &[Rmse]) {
//!     Err(KnnError::InvalidK { k, max, fold }) => {
//!         assert_eq!((k, max), (8, 5));
//!         assert!(fold.is_some());
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! # Ok::<(), KnnError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - Parallel fold evaluation via `rayon`
//! - `serde` - `Serialize`/`Deserialize` for configuration and result types
//! - `dev` - Exposes internal modules for testing

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, datasets with their schema, and folds.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains distance metrics, weighting kernels, summary statistics,
// standardization and neighbor selection.
mod math;

// Layer 3: Algorithms - core KNN algorithms.
//
// Contains the neighbor index and the regression/classification predictor.
mod algorithms;

// Layer 4: Evaluation - metrics, partitioning and selection.
//
// Contains prediction metrics, fold and train/test splitting, and tuning
// results with the best-mean and one-standard-error selection policies.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
//
// Contains parameter validation and the cross-validation executor.
mod engine;

// High-level fluent API for KNN modeling.
//
// Provides the `Knn` builder, `KnnModel` and `FittedKnn`.
mod api;

pub use api::*;

// ============================================================================
// Prelude
// ============================================================================

/// Standard KNN prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use knn_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        ComplexityOrder::{self, LargerKIsSimpler, SmallerKIsSimpler},
        Dataset,
        DistanceMetric::{self, Chebyshev, Euclidean, Manhattan, Minkowski},
        FittedKnn, FoldSplitter, KnnBuilder as Knn, KnnConfig, KnnError, KnnModel, KnnParams,
        Metric::{self, Accuracy, Mae, Rmse, Rsq, Sensitivity, Specificity},
        Prediction,
        PredictionMode::{self, Classification, Regression},
        PredictionResult, TuningResults,
        WeightFunction::{self, Epanechnikov, Gaussian, Inverse, Triangle, Uniform},
    };
}

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal core algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal evaluation and diagnostics.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
