//! Prediction quality metrics.
//!
//! ## Purpose
//!
//! This module scores predictions against ground truth: RMSE, MAE and R² for
//! regression; accuracy, sensitivity and specificity for classification.
//!
//! ## Design notes
//!
//! * **Undefined is an error**: A metric whose denominator is zero fails with
//!   [`KnnError::UndefinedMetric`] instead of returning 0 or NaN.
//! * **One-vs-rest**: Sensitivity and specificity treat a designated positive
//!   class against all others, so multi-class labels are supported.
//! * **Direction**: Each [`Metric`] knows whether larger or smaller is better.
//!
//! ## Invariants
//!
//! * Accuracy, sensitivity and specificity lie in [0, 1].
//! * RMSE and MAE are >= 0 and zero exactly for perfect predictions.

use core::fmt;
use num_traits::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithms::predictor::{PredictionMode, PredictionResult};
use crate::math::stats::mean;
use crate::primitives::dataset::Dataset;
use crate::primitives::errors::KnnError;

// ============================================================================
// Metric Enum
// ============================================================================

/// Whether larger or smaller metric values are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Larger is better (accuracy-type).
    Maximize,

    /// Smaller is better (error-type).
    Minimize,
}

impl Direction {
    /// True when `a` is strictly better than `b`.
    #[inline]
    pub fn is_better<T: Float>(self, a: T, b: T) -> bool {
        match self {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        }
    }
}

/// A named prediction quality metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Metric {
    /// Root mean squared error.
    Rmse,

    /// Mean absolute error.
    Mae,

    /// Squared Pearson correlation between predictions and truth.
    Rsq,

    /// Fraction of correct class predictions.
    Accuracy,

    /// True positive rate for the positive class.
    Sensitivity,

    /// True negative rate for the positive class.
    Specificity,
}

impl Metric {
    /// Short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Rmse => "rmse",
            Metric::Mae => "mae",
            Metric::Rsq => "rsq",
            Metric::Accuracy => "accuracy",
            Metric::Sensitivity => "sensitivity",
            Metric::Specificity => "specificity",
        }
    }

    /// Whether larger or smaller values are better.
    pub fn direction(&self) -> Direction {
        match self {
            Metric::Rmse | Metric::Mae => Direction::Minimize,
            _ => Direction::Maximize,
        }
    }

    /// The prediction mode this metric applies to.
    pub fn mode(&self) -> PredictionMode {
        match self {
            Metric::Rmse | Metric::Mae | Metric::Rsq => PredictionMode::Regression,
            _ => PredictionMode::Classification,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Regression Metrics
// ============================================================================

fn check_lengths(predicted: usize, truth: usize) -> Result<(), KnnError> {
    if predicted == 0 || truth == 0 {
        return Err(KnnError::EmptyInput);
    }
    if predicted != truth {
        return Err(KnnError::InvalidInput(format!(
            "length mismatch: {} predictions, {} truth values",
            predicted, truth
        )));
    }
    Ok(())
}

/// Root mean squared error: sqrt(mean((pred - truth)²)).
pub fn rmse<T: Float>(predicted: &[T], truth: &[T]) -> Result<T, KnnError> {
    check_lengths(predicted.len(), truth.len())?;
    let squared: Vec<T> = predicted
        .iter()
        .zip(truth.iter())
        .map(|(&p, &t)| (p - t) * (p - t))
        .collect();
    Ok(mean(&squared).sqrt())
}

/// Mean absolute error: mean(|pred - truth|).
pub fn mae<T: Float>(predicted: &[T], truth: &[T]) -> Result<T, KnnError> {
    check_lengths(predicted.len(), truth.len())?;
    let abs: Vec<T> = predicted
        .iter()
        .zip(truth.iter())
        .map(|(&p, &t)| (p - t).abs())
        .collect();
    Ok(mean(&abs))
}

/// Squared Pearson correlation between predictions and truth.
///
/// Undefined when either sequence has zero variance.
pub fn rsq<T: Float>(predicted: &[T], truth: &[T]) -> Result<T, KnnError> {
    check_lengths(predicted.len(), truth.len())?;
    let mp = mean(predicted);
    let mt = mean(truth);
    let (mut sxy, mut sxx, mut syy) = (T::zero(), T::zero(), T::zero());
    for (&p, &t) in predicted.iter().zip(truth.iter()) {
        let dp = p - mp;
        let dt = t - mt;
        sxy = sxy + dp * dt;
        sxx = sxx + dp * dp;
        syy = syy + dt * dt;
    }
    if sxx <= T::zero() || syy <= T::zero() {
        return Err(KnnError::UndefinedMetric {
            metric: Metric::Rsq.name(),
            reason: "predictions or truth have zero variance".to_string(),
            fold: None,
            k: None,
        });
    }
    Ok((sxy * sxy) / (sxx * syy))
}

// ============================================================================
// Classification Metrics
// ============================================================================

/// Counts of (truth, prediction) class pairs.
///
/// Rows index the true class, columns the predicted class.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfusionMatrix {
    n_classes: usize,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    /// Tabulate predicted against true class codes.
    pub fn new(predicted: &[usize], truth: &[usize], n_classes: usize) -> Result<Self, KnnError> {
        check_lengths(predicted.len(), truth.len())?;
        let mut counts = vec![0; n_classes * n_classes];
        for (&p, &t) in predicted.iter().zip(truth.iter()) {
            if p >= n_classes || t >= n_classes {
                return Err(KnnError::InvalidInput(format!(
                    "class code {} out of range for {} classes",
                    p.max(t),
                    n_classes
                )));
            }
            counts[t * n_classes + p] += 1;
        }
        Ok(Self { n_classes, counts })
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Count of rows with true class `truth` predicted as `predicted`.
    pub fn count(&self, truth: usize, predicted: usize) -> usize {
        self.counts[truth * self.n_classes + predicted]
    }

    /// Total number of rows.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Rows on the diagonal.
    pub fn correct(&self) -> usize {
        (0..self.n_classes).map(|c| self.count(c, c)).sum()
    }

    /// Rows whose true class is `class`.
    pub fn actual(&self, class: usize) -> usize {
        (0..self.n_classes).map(|p| self.count(class, p)).sum()
    }

    /// Rows predicted as `class`.
    pub fn predicted(&self, class: usize) -> usize {
        (0..self.n_classes).map(|t| self.count(t, class)).sum()
    }

    /// correct / total
    pub fn accuracy<T: Float>(&self) -> Result<T, KnnError> {
        ratio(self.correct(), self.total(), Metric::Accuracy, "no observations")
    }

    /// TP / (TP + FN) for `positive`.
    pub fn sensitivity<T: Float>(&self, positive: usize) -> Result<T, KnnError> {
        self.check_class(positive)?;
        let tp = self.count(positive, positive);
        ratio(
            tp,
            self.actual(positive),
            Metric::Sensitivity,
            "truth contains no positive observations",
        )
    }

    /// TN / (TN + FP) for `positive`.
    pub fn specificity<T: Float>(&self, positive: usize) -> Result<T, KnnError> {
        self.check_class(positive)?;
        let negatives = self.total() - self.actual(positive);
        let fp = self.predicted(positive) - self.count(positive, positive);
        ratio(
            negatives - fp,
            negatives,
            Metric::Specificity,
            "truth contains no negative observations",
        )
    }

    fn check_class(&self, class: usize) -> Result<(), KnnError> {
        if class >= self.n_classes {
            return Err(KnnError::InvalidInput(format!(
                "positive class {} out of range for {} classes",
                class, self.n_classes
            )));
        }
        Ok(())
    }
}

fn ratio<T: Float>(
    numerator: usize,
    denominator: usize,
    metric: Metric,
    reason: &str,
) -> Result<T, KnnError> {
    if denominator == 0 {
        return Err(KnnError::UndefinedMetric {
            metric: metric.name(),
            reason: reason.to_string(),
            fold: None,
            k: None,
        });
    }
    let num = T::from(numerator).unwrap_or_else(T::nan);
    let den = T::from(denominator).unwrap_or_else(T::nan);
    Ok(num / den)
}

fn n_classes_of(predicted: &[usize], truth: &[usize]) -> usize {
    predicted
        .iter()
        .chain(truth.iter())
        .copied()
        .max()
        .map_or(0, |m| m + 1)
}

/// Fraction of predictions equal to the truth.
pub fn accuracy<T: Float>(predicted: &[usize], truth: &[usize]) -> Result<T, KnnError> {
    ConfusionMatrix::new(predicted, truth, n_classes_of(predicted, truth))?.accuracy()
}

/// True positive rate of `positive` against all other classes.
pub fn sensitivity<T: Float>(
    predicted: &[usize],
    truth: &[usize],
    positive: usize,
) -> Result<T, KnnError> {
    let n = n_classes_of(predicted, truth).max(positive + 1);
    ConfusionMatrix::new(predicted, truth, n)?.sensitivity(positive)
}

/// True negative rate of `positive` against all other classes.
pub fn specificity<T: Float>(
    predicted: &[usize],
    truth: &[usize],
    positive: usize,
) -> Result<T, KnnError> {
    let n = n_classes_of(predicted, truth).max(positive + 1);
    ConfusionMatrix::new(predicted, truth, n)?.specificity(positive)
}

// ============================================================================
// Metrics Engine
// ============================================================================

/// Scores prediction results against a labeled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsEngine {
    positive_class: usize,
}

impl MetricsEngine {
    /// Engine using `positive_class` for sensitivity and specificity.
    pub fn new(positive_class: usize) -> Self {
        Self { positive_class }
    }

    /// The positive class code.
    pub fn positive_class(&self) -> usize {
        self.positive_class
    }

    /// Compute `metric` for `predictions` against the labels of `truth`.
    ///
    /// `predictions` must be aligned with the rows of `truth`.
    pub fn evaluate<T: Float>(
        &self,
        metric: Metric,
        predictions: &[PredictionResult<T>],
        truth: &Dataset<T>,
    ) -> Result<T, KnnError> {
        match metric.mode() {
            PredictionMode::Regression => {
                let targets = truth.numeric_targets().ok_or_else(|| {
                    KnnError::InvalidInput(format!(
                        "metric '{}' needs a numeric label",
                        metric.name()
                    ))
                })?;
                let values = predictions
                    .iter()
                    .map(|p| p.value())
                    .collect::<Option<Vec<T>>>()
                    .ok_or_else(|| {
                        KnnError::InvalidInput(format!(
                            "metric '{}' needs numeric predictions",
                            metric.name()
                        ))
                    })?;
                match metric {
                    Metric::Rmse => rmse(&values, targets),
                    Metric::Mae => mae(&values, targets),
                    _ => rsq(&values, targets),
                }
            }
            PredictionMode::Classification => {
                let codes = truth.class_codes().ok_or_else(|| {
                    KnnError::InvalidInput(format!(
                        "metric '{}' needs a categorical label",
                        metric.name()
                    ))
                })?;
                let n_classes = truth.classes().map_or(0, |c| c.len());
                let classes = predictions
                    .iter()
                    .map(|p| p.class())
                    .collect::<Option<Vec<usize>>>()
                    .ok_or_else(|| {
                        KnnError::InvalidInput(format!(
                            "metric '{}' needs class predictions",
                            metric.name()
                        ))
                    })?;
                let matrix = ConfusionMatrix::new(&classes, codes, n_classes)?;
                match metric {
                    Metric::Accuracy => matrix.accuracy(),
                    Metric::Sensitivity => matrix.sensitivity(self.positive_class),
                    _ => matrix.specificity(self.positive_class),
                }
            }
        }
    }
}
