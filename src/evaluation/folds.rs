//! Seeded, optionally stratified data partitioning.
//!
//! ## Purpose
//!
//! This module partitions a dataset into k disjoint folds for
//! cross-validation and into a single train/test pair for hold-out
//! evaluation.
//!
//! ## Design notes
//!
//! * **Reproducible**: All shuffling uses a `ChaCha8Rng` seeded from the
//!   caller's seed, so the same (dataset, fold count, stratification, seed)
//!   always yields the same folds on every platform.
//! * **Stratified**: Each stratum is shuffled and cut separately; the leftover
//!   rows of each stratum are handed to the folds after the previous
//!   stratum's leftovers, so fold sizes stay balanced overall.
//! * **Strata**: A categorical label stratifies by class. A numeric label or a
//!   feature stratifies by rank quartiles (fewer bins for small data).
//!
//! ## Invariants
//!
//! * Validation subsets of one split are disjoint and cover every row.
//! * Fold sizes differ by at most one.
//! * Every fold keeps at least two training rows.
//! * With stratification, each fold holds ⌊n_c / f⌋ or ⌈n_c / f⌉ rows of
//!   every stratum c.
//!
//! ## Non-goals
//!
//! * This module does not fit or evaluate models (handled by the engine).

use num_traits::Float;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::math::stats::rank_bins;
use crate::primitives::dataset::Dataset;
use crate::primitives::errors::KnnError;
use crate::primitives::partition::{Fold, group_sizes};

/// Maximum number of rank bins used to stratify a numeric field.
const MAX_NUMERIC_STRATA: usize = 4;

/// Fewest training rows a fold may have; standardization needs a sample sd.
const MIN_TRAIN_ROWS: usize = 2;

// ============================================================================
// Strata
// ============================================================================

/// Rows grouped by stratum, in stratum order.
#[derive(Debug, Clone, PartialEq)]
pub struct Strata {
    names: Vec<String>,
    members: Vec<Vec<usize>>,
}

impl Strata {
    /// A single stratum holding every row.
    pub fn whole(n: usize) -> Self {
        Self {
            names: vec!["all".to_string()],
            members: vec![(0..n).collect()],
        }
    }

    /// Group the rows of `dataset` by the field named `field`.
    ///
    /// `min_rows_per_bin` limits how many rank bins a numeric field is cut
    /// into; pass the fold count so every bin can feed every fold.
    pub fn of<T: Float>(
        dataset: &Dataset<T>,
        field: &str,
        min_rows_per_bin: usize,
    ) -> Result<Self, KnnError> {
        let schema = dataset.schema();
        let bins = MAX_NUMERIC_STRATA
            .min(dataset.len() / min_rows_per_bin.max(1))
            .max(1);

        let (names, assignment): (Vec<String>, Vec<usize>) = if field == schema.label_name() {
            match (dataset.classes(), dataset.class_codes()) {
                (Some(classes), Some(codes)) => (classes.to_vec(), codes.to_vec()),
                _ => {
                    let targets = dataset.numeric_targets().unwrap_or(&[]);
                    (bin_names(field, bins), rank_bins(targets, bins))
                }
            }
        } else if let Some(j) = schema.feature_index(field) {
            (bin_names(field, bins), rank_bins(&dataset.column(j), bins))
        } else {
            return Err(KnnError::SchemaMismatch(format!(
                "cannot stratify by unknown field '{}'",
                field
            )));
        };

        let mut members = vec![Vec::new(); names.len()];
        for (row, &s) in assignment.iter().enumerate() {
            members[s].push(row);
        }

        // Declared classes without rows do not form a stratum.
        let (names, members) = names
            .into_iter()
            .zip(members)
            .filter(|(_, rows)| !rows.is_empty())
            .unzip();

        Ok(Self { names, members })
    }

    /// Number of strata.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when there are no strata.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Stratum names, in stratum order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Row indices of stratum `s`, ascending.
    pub fn members(&self, s: usize) -> &[usize] {
        &self.members[s]
    }
}

fn bin_names(field: &str, bins: usize) -> Vec<String> {
    (1..=bins).map(|b| format!("{} bin {}", field, b)).collect()
}

fn resolve_strata<T: Float>(
    dataset: &Dataset<T>,
    stratify_by: Option<&str>,
    min_rows_per_bin: usize,
) -> Result<Strata, KnnError> {
    match stratify_by {
        Some(field) => Strata::of(dataset, field, min_rows_per_bin),
        None => Ok(Strata::whole(dataset.len())),
    }
}

// ============================================================================
// K-Fold Splitting
// ============================================================================

/// Partitions a dataset into k (train, validation) folds.
pub struct FoldSplitter;

impl FoldSplitter {
    /// Split `dataset` into `fold_count` folds.
    ///
    /// With `stratify_by`, the partition preserves the distribution of that
    /// field across folds.
    pub fn split<T: Float>(
        dataset: &Dataset<T>,
        fold_count: usize,
        stratify_by: Option<&str>,
        seed: u64,
    ) -> Result<Vec<Fold<T>>, KnnError> {
        let assignment = Self::assign(dataset, fold_count, stratify_by, seed)?;

        let mut validation: Vec<Vec<usize>> = vec![Vec::new(); fold_count];
        for (row, &fold) in assignment.iter().enumerate() {
            validation[fold].push(row);
        }

        validation
            .into_iter()
            .enumerate()
            .map(|(id, validation_indices)| {
                let train_indices: Vec<usize> = assignment
                    .iter()
                    .enumerate()
                    .filter(|&(_, &f)| f != id)
                    .map(|(row, _)| row)
                    .collect();
                trace!(
                    fold = id,
                    train = train_indices.len(),
                    validation = validation_indices.len(),
                    "Built fold"
                );
                Ok(Fold {
                    id,
                    train: dataset.subset(&train_indices)?,
                    validation: dataset.subset(&validation_indices)?,
                    train_indices,
                    validation_indices,
                })
            })
            .collect()
    }

    /// Fold number of every row of `dataset`.
    pub fn assign<T: Float>(
        dataset: &Dataset<T>,
        fold_count: usize,
        stratify_by: Option<&str>,
        seed: u64,
    ) -> Result<Vec<usize>, KnnError> {
        if fold_count < 2 {
            return Err(KnnError::InvalidFoldCount(fold_count));
        }
        let n = dataset.len();
        if n < fold_count || n - n.div_ceil(fold_count) < MIN_TRAIN_ROWS {
            return Err(KnnError::InsufficientData {
                required: min_rows_for(fold_count),
                got: n,
                stratum: None,
            });
        }

        let strata = resolve_strata(dataset, stratify_by, fold_count)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut assignment = vec![0; dataset.len()];
        let mut offset = 0;

        for s in 0..strata.len() {
            let mut rows = strata.members(s).to_vec();
            if rows.len() < fold_count {
                return Err(KnnError::InsufficientData {
                    required: fold_count,
                    got: rows.len(),
                    stratum: stratify_by.map(|_| strata.names()[s].clone()),
                });
            }
            rows.shuffle(&mut rng);

            let mut start = 0;
            for (fold, size) in group_sizes(rows.len(), fold_count, offset)
                .into_iter()
                .enumerate()
            {
                for &row in &rows[start..start + size] {
                    assignment[row] = fold;
                }
                start += size;
            }
            offset = (offset + rows.len() % fold_count) % fold_count;
        }

        trace!(
            rows = dataset.len(),
            folds = fold_count,
            strata = strata.len(),
            seed,
            "Assigned rows to folds"
        );
        Ok(assignment)
    }
}

/// Smallest dataset whose every fold keeps `MIN_TRAIN_ROWS` training rows.
fn min_rows_for(fold_count: usize) -> usize {
    (fold_count..)
        .find(|&n| n - n.div_ceil(fold_count) >= MIN_TRAIN_ROWS)
        .unwrap_or(fold_count)
}

// ============================================================================
// Train/Test Split
// ============================================================================

/// Hold out a test set of about `1 - prop` of the rows.
///
/// With `stratify_by`, the train share is taken per stratum (rounded down).
/// Both returned datasets keep the source row order.
pub fn train_test_split<T: Float>(
    dataset: &Dataset<T>,
    prop: f64,
    stratify_by: Option<&str>,
    seed: u64,
) -> Result<(Dataset<T>, Dataset<T>), KnnError> {
    if !(prop > 0.0 && prop < 1.0) {
        return Err(KnnError::InvalidProportion(prop));
    }

    let strata = resolve_strata(dataset, stratify_by, 2)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for s in 0..strata.len() {
        let mut rows = strata.members(s).to_vec();
        rows.shuffle(&mut rng);
        let n_train = (rows.len() as f64 * prop).floor() as usize;
        train.extend_from_slice(&rows[..n_train]);
        test.extend_from_slice(&rows[n_train..]);
    }

    if train.is_empty() || test.is_empty() {
        let smaller_share = prop.min(1.0 - prop);
        return Err(KnnError::InsufficientData {
            required: (1.0 / smaller_share).ceil() as usize,
            got: dataset.len(),
            stratum: None,
        });
    }

    train.sort_unstable();
    test.sort_unstable();
    trace!(
        train = train.len(),
        test = test.len(),
        seed,
        "Split train and test"
    );
    Ok((dataset.subset(&train)?, dataset.subset(&test)?))
}
