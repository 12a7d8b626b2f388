//! Fold types for k-fold partitioning.
//!
//! ## Purpose
//!
//! This module defines [`Fold`], one (train, validation) pair of a k-fold
//! split, and the size-balancing rule used to cut shuffled rows into groups.
//!
//! ## Invariants
//!
//! * Within one split, validation index sets are disjoint and cover every row
//!   of the source dataset exactly once.
//! * Train indices of a fold are the complement of its validation indices.
//! * Group sizes produced by [`group_sizes`] differ by at most one.
//!
//! ## Non-goals
//!
//! * This module does not shuffle or stratify (handled by `evaluation::folds`).

use crate::primitives::dataset::Dataset;

/// One (train, validation) pair of a k-fold split.
#[derive(Debug, Clone, PartialEq)]
pub struct Fold<T> {
    /// Zero-based fold number.
    pub id: usize,
    /// Rows used for fitting in this fold.
    pub train: Dataset<T>,
    /// Held-out rows evaluated in this fold.
    pub validation: Dataset<T>,
    /// Positions of the train rows in the source dataset (ascending).
    pub train_indices: Vec<usize>,
    /// Positions of the validation rows in the source dataset (ascending).
    pub validation_indices: Vec<usize>,
}

/// Sizes of `groups` contiguous groups covering `n` items.
///
/// The `n % groups` extra items go to the groups starting at `offset`
/// (wrapping), so consecutive calls can rotate where the remainder lands.
pub fn group_sizes(n: usize, groups: usize, offset: usize) -> Vec<usize> {
    if groups == 0 {
        return Vec::new();
    }
    let base = n / groups;
    let remainder = n % groups;
    let mut sizes = vec![base; groups];
    for j in 0..remainder {
        sizes[(offset + j) % groups] += 1;
    }
    sizes
}
