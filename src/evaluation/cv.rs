//! Cross-validation results and neighbor-count selection.
//!
//! ## Purpose
//!
//! This module aggregates per-fold metric reports into per-(k, metric)
//! summaries and implements the selection policies used to pick a final
//! neighbor count: best mean, and the one-standard-error rule.
//!
//! ## Design notes
//!
//! * **Order-independent**: Reports are sorted by (fold, k, metric) before
//!   aggregation, so summaries are identical however the folds were run.
//! * **Pure selection**: Selection never re-runs anything; it only reads the
//!   aggregated table.
//! * **Explicit complexity**: The one-standard-error rule takes a
//!   [`ComplexityOrder`] saying which end of the k grid is the simpler model.
//!
//! ## Key concepts
//!
//! * **Standard error**: Sample standard deviation of the per-fold values
//!   divided by √(number of folds).
//! * **One-standard-error rule**: Among all k whose mean is within one
//!   standard error of the best mean (in the worse direction), prefer the
//!   simplest.
//!
//! ## Invariants
//!
//! * The one-standard-error choice is never strictly more complex than the
//!   best-mean choice for the same metric.
//! * Best-mean ties go to the smaller k.
//!
//! ## Non-goals
//!
//! * This module does not split data or fit models (handled by `folds` and
//!   the engine).

use core::cmp::Ordering;
use core::fmt;
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithms::predictor::{KnnParams, PredictionMode};
use crate::evaluation::metrics::{Direction, Metric};
use crate::math::kernel::WeightFunction;
use crate::math::stats::{mean, standard_error};
use crate::primitives::errors::KnnError;

// ============================================================================
// Report Types
// ============================================================================

/// Which end of the k grid is the less flexible model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComplexityOrder {
    /// Smaller k is preferred as the simpler model.
    #[default]
    SmallerKIsSimpler,

    /// Larger k is preferred as the simpler model (smoother fit).
    LargerKIsSimpler,
}

impl ComplexityOrder {
    /// The simpler of two neighbor counts.
    pub fn simpler(self, a: usize, b: usize) -> usize {
        match self {
            ComplexityOrder::SmallerKIsSimpler => a.min(b),
            ComplexityOrder::LargerKIsSimpler => a.max(b),
        }
    }
}

/// One metric value computed on one fold for one k.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricReport<T> {
    /// Fold the value was computed on.
    pub fold: usize,
    /// Neighbor count.
    pub k: usize,
    /// Metric name.
    pub metric: Metric,
    /// Metric value.
    pub value: T,
}

/// Aggregate of one (k, metric) pair across folds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricSummary<T> {
    /// Neighbor count.
    pub k: usize,
    /// Metric name.
    pub metric: Metric,
    /// Mean across folds.
    pub mean: T,
    /// Standard error of the mean across folds.
    pub std_err: T,
    /// Number of folds aggregated.
    pub n_folds: usize,
}

// ============================================================================
// Tuning Results
// ============================================================================

/// Fold-level reports of a tuning run and their per-(k, metric) summaries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TuningResults<T> {
    k_grid: Vec<usize>,
    metrics: Vec<Metric>,
    weight_function: WeightFunction,
    mode: PredictionMode,
    reports: Vec<MetricReport<T>>,
    summaries: Vec<MetricSummary<T>>,
}

impl<T: Float> TuningResults<T> {
    /// Aggregate `reports` over the given grid and metrics.
    ///
    /// `k_grid` is sorted and deduplicated. Pairs with no report are left out
    /// of the summaries.
    pub fn new(
        mut reports: Vec<MetricReport<T>>,
        k_grid: &[usize],
        metrics: &[Metric],
        weight_function: WeightFunction,
        mode: PredictionMode,
    ) -> Self {
        let mut k_grid = k_grid.to_vec();
        k_grid.sort_unstable();
        k_grid.dedup();

        let metric_rank =
            |m: Metric| metrics.iter().position(|&x| x == m).unwrap_or(metrics.len());
        reports.sort_by(|a, b| {
            a.fold
                .cmp(&b.fold)
                .then(a.k.cmp(&b.k))
                .then(metric_rank(a.metric).cmp(&metric_rank(b.metric)))
        });

        let mut summaries = Vec::with_capacity(k_grid.len() * metrics.len());
        for &k in &k_grid {
            for &metric in metrics {
                let values: Vec<T> = reports
                    .iter()
                    .filter(|r| r.k == k && r.metric == metric)
                    .map(|r| r.value)
                    .collect();
                if values.is_empty() {
                    continue;
                }
                summaries.push(MetricSummary {
                    k,
                    metric,
                    mean: mean(&values),
                    std_err: standard_error(&values),
                    n_folds: values.len(),
                });
            }
        }

        Self {
            k_grid,
            metrics: metrics.to_vec(),
            weight_function,
            mode,
            reports,
            summaries,
        }
    }

    /// Candidate neighbor counts, ascending.
    pub fn k_grid(&self) -> &[usize] {
        &self.k_grid
    }

    /// Metrics that were computed.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Weight function used during tuning.
    pub fn weight_function(&self) -> WeightFunction {
        self.weight_function
    }

    /// Prediction mode used during tuning.
    pub fn mode(&self) -> PredictionMode {
        self.mode
    }

    /// Every fold-level report, ordered by (fold, k, metric).
    pub fn reports(&self) -> &[MetricReport<T>] {
        &self.reports
    }

    /// Every summary, ordered by (k, metric).
    pub fn summaries(&self) -> &[MetricSummary<T>] {
        &self.summaries
    }

    /// Summary for one (k, metric) pair.
    pub fn summary(&self, k: usize, metric: Metric) -> Option<&MetricSummary<T>> {
        self.summaries
            .iter()
            .find(|s| s.k == k && s.metric == metric)
    }

    /// Summaries of one metric, ascending by k.
    pub fn summaries_for(&self, metric: Metric) -> impl Iterator<Item = &MetricSummary<T>> + '_ {
        self.summaries.iter().filter(move |s| s.metric == metric)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// The k with the best mean for `metric`; ties go to the smaller k.
    pub fn select_best(&self, metric: Metric) -> Result<usize, KnnError> {
        self.best_summary(metric).map(|s| s.k)
    }

    /// The simplest k whose mean is within one standard error of the best.
    ///
    /// The band is measured from the best mean in the worse direction, using
    /// the best k's standard error.
    pub fn select_by_one_std_err(
        &self,
        metric: Metric,
        complexity: ComplexityOrder,
    ) -> Result<usize, KnnError> {
        let best = self.best_summary(metric)?;
        let se = if best.std_err.is_finite() {
            best.std_err
        } else {
            T::zero()
        };
        let within = |s: &MetricSummary<T>| match metric.direction() {
            Direction::Maximize => s.mean >= best.mean - se,
            Direction::Minimize => s.mean <= best.mean + se,
        };

        Ok(self
            .summaries_for(metric)
            .filter(|s| within(s))
            .fold(best.k, |chosen, s| complexity.simpler(chosen, s.k)))
    }

    /// The `n` best summaries for `metric`, best first.
    pub fn show_best(&self, metric: Metric, n: usize) -> Result<Vec<MetricSummary<T>>, KnnError> {
        self.check_metric(metric)?;
        let direction = metric.direction();
        let mut ranked: Vec<MetricSummary<T>> = self.summaries_for(metric).copied().collect();
        ranked.sort_by(|a, b| {
            let order = a.mean.partial_cmp(&b.mean).unwrap_or(Ordering::Equal);
            let order = match direction {
                Direction::Maximize => order.reverse(),
                Direction::Minimize => order,
            };
            order.then(a.k.cmp(&b.k))
        });
        ranked.truncate(n);
        Ok(ranked)
    }

    /// Parameters for a final fit with neighbor count `k`.
    pub fn finalize(&self, k: usize) -> KnnParams {
        KnnParams {
            k,
            weight_function: self.weight_function,
            mode: self.mode,
        }
    }

    fn best_summary(&self, metric: Metric) -> Result<&MetricSummary<T>, KnnError> {
        self.check_metric(metric)?;
        let direction = metric.direction();
        self.summaries_for(metric)
            .fold(None, |best: Option<&MetricSummary<T>>, s| match best {
                Some(b) if !direction.is_better(s.mean, b.mean) => Some(b),
                _ => Some(s),
            })
            .ok_or_else(|| {
                KnnError::InvalidInput(format!("no results for metric '{}'", metric.name()))
            })
    }

    fn check_metric(&self, metric: Metric) -> Result<(), KnnError> {
        if !self.metrics.contains(&metric) {
            return Err(KnnError::InvalidInput(format!(
                "metric '{}' was not computed during tuning",
                metric.name()
            )));
        }
        Ok(())
    }
}

impl<T: Float> fmt::Display for TuningResults<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tuning results:")?;
        writeln!(
            f,
            "  {:>6}  {:<12}  {:>12}  {:>12}  {:>5}",
            "k", "metric", "mean", "std_err", "folds"
        )?;
        writeln!(f, "  {:-<6}  {:-<12}  {:-<12}  {:-<12}  {:-<5}", "", "", "", "", "")?;
        for s in &self.summaries {
            writeln!(
                f,
                "  {:>6}  {:<12}  {:>12.6}  {:>12.6}  {:>5}",
                s.k,
                s.metric.name(),
                s.mean.to_f64().unwrap_or(f64::NAN),
                s.std_err.to_f64().unwrap_or(f64::NAN),
                s.n_folds
            )?;
        }
        Ok(())
    }
}
