//! Execution engine for k-fold neighbor-count tuning.
//!
//! ## Purpose
//!
//! This module provides [`CrossValidator`], which splits a dataset into
//! folds, fits a standardizer and neighbor index per fold, predicts every
//! validation row for every candidate k and scores the predictions.
//!
//! ## Design notes
//!
//! * **No leakage**: Standardization parameters are fitted on each fold's
//!   training rows only and applied to its validation rows.
//! * **One build per fold**: Each fold builds one index and queries each
//!   validation row once for the largest k (plus one for the bandwidth);
//!   every smaller k reads a prefix of that neighbor list.
//! * **Fold parallelism**: With the `parallel` feature, folds run on the
//!   rayon global pool. Each fold owns its standardizer and index, so there
//!   is no shared mutable state.
//! * **Context on errors**: Errors raised inside a fold carry its id, and
//!   metric errors also carry k.
//!
//! ## Invariants
//!
//! * Results are identical with and without parallel execution.
//!
//! ## Non-goals
//!
//! * This module does not choose a final k (handled by `evaluation::cv`).

use num_traits::Float;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::algorithms::index::KnnIndex;
use crate::algorithms::predictor::{KnnPredictor, PredictionMode, PredictionResult};
use crate::engine::validator::Validator;
use crate::evaluation::cv::{MetricReport, TuningResults};
use crate::evaluation::folds::FoldSplitter;
use crate::evaluation::metrics::{Metric, MetricsEngine};
use crate::math::distance::DistanceMetric;
use crate::math::kernel::WeightFunction;
use crate::math::neighborhood::NeighborSet;
use crate::math::standardize::Standardizer;
use crate::primitives::dataset::Dataset;
use crate::primitives::errors::KnnError;
use crate::primitives::partition::Fold;

// ============================================================================
// Cross Validator
// ============================================================================

/// Runs k-fold cross-validation over a grid of neighbor counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidator<T> {
    /// Regression or classification.
    pub mode: PredictionMode,

    /// Neighbor weighting kernel.
    pub weight_function: WeightFunction,

    /// Distance between standardized feature vectors.
    pub distance_metric: DistanceMetric<T>,

    /// Seed for fold assignment.
    pub seed: u64,

    /// Positive class for sensitivity and specificity (first level if unset).
    pub positive_class: Option<String>,

    /// Evaluate folds in parallel when the `parallel` feature is enabled.
    pub parallel: bool,
}

impl<T: Float> Default for CrossValidator<T> {
    fn default() -> Self {
        Self {
            mode: PredictionMode::default(),
            weight_function: WeightFunction::default(),
            distance_metric: DistanceMetric::Euclidean,
            seed: 0,
            positive_class: None,
            parallel: true,
        }
    }
}

impl<T: Float + Send + Sync> CrossValidator<T> {
    /// Cross-validator for `mode` with default settings.
    pub fn new(mode: PredictionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Evaluate every k in `k_grid` with `fold_count`-fold cross-validation.
    ///
    /// `stratify_by` names the label or a feature to stratify folds on.
    pub fn tune(
        &self,
        dataset: &Dataset<T>,
        k_grid: &[usize],
        fold_count: usize,
        metrics: &[Metric],
        stratify_by: Option<&str>,
    ) -> Result<TuningResults<T>, KnnError> {
        Validator::validate_k_grid(k_grid)?;
        Validator::validate_fold_count(fold_count)?;
        Validator::validate_metrics(metrics, self.mode)?;
        Validator::validate_distance_metric(self.distance_metric)?;
        self.mode.check_schema(dataset.schema())?;
        let positive =
            Validator::resolve_positive_class(dataset.schema(), self.positive_class.as_deref())?;

        let mut grid = k_grid.to_vec();
        grid.sort_unstable();
        grid.dedup();

        info!(
            rows = dataset.len(),
            folds = fold_count,
            candidates = grid.len(),
            metrics = metrics.len(),
            mode = ?self.mode,
            "Starting neighbor-count tuning"
        );

        let folds = FoldSplitter::split(dataset, fold_count, stratify_by, self.seed)?;
        let engine = MetricsEngine::new(positive);
        let per_fold = self.run_folds(&folds, &grid, metrics, &engine)?;

        let results = TuningResults::new(
            per_fold.into_iter().flatten().collect(),
            &grid,
            metrics,
            self.weight_function,
            self.mode,
        );
        info!(
            reports = results.reports().len(),
            summaries = results.summaries().len(),
            "Finished neighbor-count tuning"
        );
        Ok(results)
    }

    fn run_folds(
        &self,
        folds: &[Fold<T>],
        grid: &[usize],
        metrics: &[Metric],
        engine: &MetricsEngine,
    ) -> Result<Vec<Vec<MetricReport<T>>>, KnnError> {
        #[cfg(feature = "parallel")]
        if self.parallel {
            return folds
                .par_iter()
                .map(|fold| self.evaluate_fold(fold, grid, metrics, engine))
                .collect();
        }

        folds
            .iter()
            .map(|fold| self.evaluate_fold(fold, grid, metrics, engine))
            .collect()
    }

    /// Score every k of an ascending, deduplicated `grid` on one fold.
    pub fn evaluate_fold(
        &self,
        fold: &Fold<T>,
        grid: &[usize],
        metrics: &[Metric],
        engine: &MetricsEngine,
    ) -> Result<Vec<MetricReport<T>>, KnnError> {
        let in_fold = |e: KnnError| e.in_fold(fold.id);
        let k_max = grid.iter().copied().max().ok_or_else(|| {
            KnnError::InvalidInput("neighbor count grid is empty".to_string())
        })?;

        let params = Standardizer::fit(&fold.train).map_err(in_fold)?;
        let train = params.transform(&fold.train).map_err(in_fold)?;
        let validation = params.transform(&fold.validation).map_err(in_fold)?;

        let index = KnnIndex::build_with_metric(&train, self.distance_metric);
        Validator::validate_k_against(k_max, index.len()).map_err(in_fold)?;
        let predictor = KnnPredictor::new(&index).with_weight_function(self.weight_function);
        predictor.check_mode(self.mode)?;

        debug!(
            fold = fold.id,
            train = train.len(),
            validation = validation.len(),
            k_max,
            "Evaluating fold"
        );

        let neighbor_sets: Vec<NeighborSet<T>> = validation
            .rows()
            .map(|point| index.nearest(point, k_max + 1))
            .collect::<Result<_, _>>()
            .map_err(in_fold)?;

        let mut reports = Vec::with_capacity(grid.len() * metrics.len());
        for &k in grid {
            let predictions: Vec<PredictionResult<T>> = neighbor_sets
                .iter()
                .enumerate()
                .map(|(row, set)| {
                    let (neighbors, bandwidth) = set.split_at_k(k);
                    predictor.aggregate(row, neighbors, bandwidth, self.mode)
                })
                .collect();

            for &metric in metrics {
                let value = engine
                    .evaluate(metric, &predictions, &validation)
                    .map_err(|e| e.in_fold_at_k(fold.id, k))?;
                reports.push(MetricReport {
                    fold: fold.id,
                    k,
                    metric,
                    value,
                });
            }
        }

        Ok(reports)
    }
}
