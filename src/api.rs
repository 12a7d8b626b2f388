//! High-level API for KNN modeling.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for configuring a KNN model, and the model types that fit,
//! tune, predict and evaluate.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Validated**: Parameters are validated when `.build()` is called.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create a [`KnnBuilder`] via `Knn::new()`.
//! 2. Chain configuration methods (`.k()`, `.mode()`, `.fold_count()`, etc.).
//! 3. Call `.build()` to get a validated [`KnnModel`].
//! 4. `tune` it over a grid of k, pick a k, then `fit` the final model.

use core::fmt::Debug;
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::validator::Validator;

// Publicly re-exported types
pub use crate::algorithms::index::KnnIndex;
pub use crate::algorithms::predictor::{
    KnnParams, KnnPredictor, Prediction, PredictionMode, PredictionResult,
};
pub use crate::engine::executor::CrossValidator;
pub use crate::evaluation::cv::{ComplexityOrder, MetricReport, MetricSummary, TuningResults};
pub use crate::evaluation::folds::{FoldSplitter, Strata, train_test_split};
pub use crate::evaluation::metrics::{
    ConfusionMatrix, Direction, Metric, MetricsEngine, accuracy, mae, rmse, rsq, sensitivity,
    specificity,
};
pub use crate::math::distance::DistanceMetric;
pub use crate::math::kernel::WeightFunction;
pub use crate::math::neighborhood::{Neighbor, NeighborSet};
pub use crate::math::standardize::{StandardizationParams, Standardizer};
pub use crate::primitives::dataset::{Dataset, Label, Observation, Schema};
pub use crate::primitives::errors::KnnError;
pub use crate::primitives::partition::Fold;

// ============================================================================
// Configuration
// ============================================================================

/// Resolved KNN configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnnConfig<T> {
    /// Number of neighbors used by `fit`.
    pub k: usize,

    /// Neighbor weighting kernel.
    pub weight_function: WeightFunction,

    /// Regression or classification.
    pub mode: PredictionMode,

    /// Number of cross-validation folds.
    pub fold_count: usize,

    /// Field to stratify folds and splits on.
    pub stratify_by: Option<String>,

    /// Seed for fold assignment and splits.
    pub seed: u64,

    /// Distance between standardized feature vectors.
    pub distance_metric: DistanceMetric<T>,

    /// Positive class for sensitivity and specificity (first level if unset).
    pub positive_class: Option<String>,

    /// Run cross-validation folds in parallel.
    pub parallel: bool,
}

impl<T: Float> Default for KnnConfig<T> {
    fn default() -> Self {
        Self {
            k: 5,
            weight_function: WeightFunction::Uniform,
            mode: PredictionMode::Regression,
            fold_count: 10,
            stratify_by: None,
            seed: 0,
            distance_metric: DistanceMetric::Euclidean,
            positive_class: None,
            parallel: true,
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring a KNN model.
#[derive(Debug, Clone)]
pub struct KnnBuilder<T> {
    /// Number of neighbors.
    pub k: Option<usize>,

    /// Kernel weight function.
    pub weight_function: Option<WeightFunction>,

    /// Regression or classification.
    pub mode: Option<PredictionMode>,

    /// Number of cross-validation folds.
    pub fold_count: Option<usize>,

    /// Field to stratify on.
    pub stratify_by: Option<String>,

    /// Seed for fold assignment.
    pub seed: Option<u64>,

    /// Distance metric.
    pub distance_metric: Option<DistanceMetric<T>>,

    /// Positive class name.
    pub positive_class: Option<String>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for KnnBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> KnnBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            k: None,
            weight_function: None,
            mode: None,
            fold_count: None,
            stratify_by: None,
            seed: None,
            distance_metric: None,
            positive_class: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the number of neighbors.
    pub fn k(mut self, k: usize) -> Self {
        if self.k.is_some() {
            self.duplicate_param = Some("k");
        }
        self.k = Some(k);
        self
    }

    /// Set the neighbor weighting kernel.
    pub fn weight_function(mut self, wf: WeightFunction) -> Self {
        if self.weight_function.is_some() {
            self.duplicate_param = Some("weight_function");
        }
        self.weight_function = Some(wf);
        self
    }

    /// Set the prediction mode.
    pub fn mode(mut self, mode: PredictionMode) -> Self {
        if self.mode.is_some() {
            self.duplicate_param = Some("mode");
        }
        self.mode = Some(mode);
        self
    }

    /// Set the number of cross-validation folds.
    pub fn fold_count(mut self, fold_count: usize) -> Self {
        if self.fold_count.is_some() {
            self.duplicate_param = Some("fold_count");
        }
        self.fold_count = Some(fold_count);
        self
    }

    /// Stratify folds and splits on the named label or feature.
    pub fn stratify_by(mut self, field: &str) -> Self {
        if self.stratify_by.is_some() {
            self.duplicate_param = Some("stratify_by");
        }
        self.stratify_by = Some(field.to_string());
        self
    }

    /// Set the seed for fold assignment and splits.
    pub fn seed(mut self, seed: u64) -> Self {
        if self.seed.is_some() {
            self.duplicate_param = Some("seed");
        }
        self.seed = Some(seed);
        self
    }

    /// Set the distance metric.
    pub fn distance_metric(mut self, metric: DistanceMetric<T>) -> Self {
        if self.distance_metric.is_some() {
            self.duplicate_param = Some("distance_metric");
        }
        self.distance_metric = Some(metric);
        self
    }

    /// Set the positive class used by sensitivity and specificity.
    pub fn positive_class(mut self, class: &str) -> Self {
        if self.positive_class.is_some() {
            self.duplicate_param = Some("positive_class");
        }
        self.positive_class = Some(class.to_string());
        self
    }

    /// Set parallel execution mode.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    /// Validate the configuration and build a model.
    pub fn build(self) -> Result<KnnModel<T>, KnnError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let defaults = KnnConfig::default();
        let config = KnnConfig {
            k: self.k.unwrap_or(defaults.k),
            weight_function: self.weight_function.unwrap_or(defaults.weight_function),
            mode: self.mode.unwrap_or(defaults.mode),
            fold_count: self.fold_count.unwrap_or(defaults.fold_count),
            stratify_by: self.stratify_by,
            seed: self.seed.unwrap_or(defaults.seed),
            distance_metric: self.distance_metric.unwrap_or(defaults.distance_metric),
            positive_class: self.positive_class,
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };

        Validator::validate_k(config.k)?;
        Validator::validate_fold_count(config.fold_count)?;
        Validator::validate_distance_metric(config.distance_metric)?;

        Ok(KnnModel { config })
    }
}

// ============================================================================
// Model
// ============================================================================

/// A validated, unfitted KNN model.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnModel<T> {
    config: KnnConfig<T>,
}

impl<T: Float + Debug + Send + Sync> KnnModel<T> {
    /// The resolved configuration.
    pub fn config(&self) -> &KnnConfig<T> {
        &self.config
    }

    /// Same model with `params` (typically from [`TuningResults::finalize`]).
    pub fn with_params(&self, params: KnnParams) -> Result<Self, KnnError> {
        Validator::validate_k(params.k)?;
        let mut config = self.config.clone();
        config.k = params.k;
        config.weight_function = params.weight_function;
        config.mode = params.mode;
        Ok(Self { config })
    }

    /// The (k, weight function, mode) triple of this model.
    pub fn params(&self) -> KnnParams {
        KnnParams {
            k: self.config.k,
            weight_function: self.config.weight_function,
            mode: self.config.mode,
        }
    }

    /// Split `data` into train and test sets using the configured seed and
    /// stratification field.
    pub fn split(&self, data: &Dataset<T>, prop: f64) -> Result<(Dataset<T>, Dataset<T>), KnnError> {
        Validator::validate_proportion(prop)?;
        train_test_split(data, prop, self.config.stratify_by.as_deref(), self.config.seed)
    }

    /// Cross-validate every k in `k_grid` on `data`.
    pub fn tune(
        &self,
        data: &Dataset<T>,
        k_grid: &[usize],
        metrics: &[Metric],
    ) -> Result<TuningResults<T>, KnnError> {
        let validator = CrossValidator {
            mode: self.config.mode,
            weight_function: self.config.weight_function,
            distance_metric: self.config.distance_metric,
            seed: self.config.seed,
            positive_class: self.config.positive_class.clone(),
            parallel: self.config.parallel,
        };
        validator.tune(
            data,
            k_grid,
            self.config.fold_count,
            metrics,
            self.config.stratify_by.as_deref(),
        )
    }

    /// Standardize `train` and build the neighbor index.
    pub fn fit(&self, train: &Dataset<T>) -> Result<FittedKnn<T>, KnnError> {
        self.config.mode.check_schema(train.schema())?;
        Validator::validate_k_against(self.config.k, train.len())?;
        let positive_class = Validator::resolve_positive_class(
            train.schema(),
            self.config.positive_class.as_deref(),
        )?;

        let standardization = Standardizer::fit(train)?;
        let reference = standardization.transform(train)?;
        let index = KnnIndex::build_with_metric(&reference, self.config.distance_metric);

        Ok(FittedKnn {
            params: self.params(),
            standardization,
            index,
            positive_class,
        })
    }
}

// ============================================================================
// Fitted Model
// ============================================================================

/// A KNN model fitted on a training set.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedKnn<T> {
    params: KnnParams,
    standardization: StandardizationParams<T>,
    index: KnnIndex<T>,
    positive_class: usize,
}

impl<T: Float> FittedKnn<T> {
    /// The (k, weight function, mode) triple.
    pub fn params(&self) -> KnnParams {
        self.params
    }

    /// Means and standard deviations fitted on the training set.
    pub fn standardization(&self) -> &StandardizationParams<T> {
        &self.standardization
    }

    /// The index over the standardized training set.
    pub fn index(&self) -> &KnnIndex<T> {
        &self.index
    }

    /// Class code used as positive by sensitivity and specificity.
    pub fn positive_class(&self) -> usize {
        self.positive_class
    }

    /// Name of class `code`, for classification models.
    pub fn class_name(&self, code: usize) -> Option<&str> {
        self.index
            .reference()
            .classes()
            .and_then(|c| c.get(code))
            .map(String::as_str)
    }

    fn predictor(&self) -> KnnPredictor<'_, T> {
        KnnPredictor::new(&self.index).with_weight_function(self.params.weight_function)
    }

    /// Predict every row of `data`, in row order.
    pub fn predict(&self, data: &Dataset<T>) -> Result<Vec<PredictionResult<T>>, KnnError> {
        let standardized = self.standardization.transform(data)?;
        self.predictor()
            .predict_batch(&standardized, self.params.k, self.params.mode)
    }

    /// Predict a single raw (unstandardized) feature vector.
    pub fn predict_point(&self, point: &[T]) -> Result<Prediction<T>, KnnError> {
        let standardized = self.standardization.transform_point(point)?;
        let predictor = self.predictor();
        match self.params.mode {
            PredictionMode::Regression => Ok(Prediction::Numeric(
                predictor.predict_regression(&standardized, self.params.k)?,
            )),
            PredictionMode::Classification => Ok(Prediction::Class(
                predictor
                    .predict_classification(&standardized, self.params.k)?
                    .0,
            )),
        }
    }

    /// Score predictions on `data` for every metric in `metrics`.
    pub fn evaluate(&self, data: &Dataset<T>, metrics: &[Metric]) -> Result<Vec<(Metric, T)>, KnnError> {
        Validator::validate_metrics(metrics, self.params.mode)?;
        self.index
            .reference()
            .schema()
            .ensure_same_labels(data.schema())?;
        let predictions = self.predict(data)?;
        let engine = MetricsEngine::new(self.positive_class);
        metrics
            .iter()
            .map(|&m| Ok((m, engine.evaluate(m, &predictions, data)?)))
            .collect()
    }
}
