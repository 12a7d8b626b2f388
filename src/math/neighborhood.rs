//! Neighbor sets and deterministic k-smallest selection.
//!
//! ## Purpose
//!
//! This module holds the result type of a nearest-neighbor query and the
//! selection routine that picks the k closest candidates.
//!
//! ## Design notes
//!
//! * **Exhaustive**: Every reference point is a candidate; there is no spatial
//!   index. Selection is a partial quickselect followed by a sort of the
//!   selected prefix.
//! * **Total order**: Candidates compare by (distance, original index), so
//!   ties at equal distance resolve to the earlier row.
//!
//! ## Invariants
//!
//! * A neighbor set is sorted ascending by (distance, index) and contains no
//!   index twice.
//! * The k-neighbor set of a query is a prefix of its (k+1)-neighbor set.
//!
//! ## Non-goals
//!
//! * This module does not support approximate or sublinear search.

use core::cmp::Ordering::{self, Equal};
use num_traits::Float;

// ============================================================================
// Neighbor Types
// ============================================================================

/// One reference observation and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<T> {
    /// Row of the neighbor in the reference dataset.
    pub index: usize,
    /// Distance from the query point.
    pub distance: T,
}

impl<T: Float> Neighbor<T> {
    /// Ordering by distance, then by original index.
    #[inline]
    pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Equal)
            .then(self.index.cmp(&other.index))
    }
}

/// The k nearest reference observations to a query, ascending by distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborSet<T> {
    neighbors: Vec<Neighbor<T>>,
}

impl<T: Float> NeighborSet<T> {
    /// Select the `k` smallest candidates.
    ///
    /// Keeps all candidates when `k >= candidates.len()`.
    pub fn select(mut candidates: Vec<Neighbor<T>>, k: usize) -> Self {
        if k == 0 {
            candidates.clear();
        } else if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, Neighbor::cmp_by_distance);
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(Neighbor::cmp_by_distance);
        Self {
            neighbors: candidates,
        }
    }

    /// Number of neighbors.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// True if the set holds no neighbors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors in ascending distance order.
    pub fn as_slice(&self) -> &[Neighbor<T>] {
        &self.neighbors
    }

    /// Iterate over neighbors in ascending distance order.
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor<T>> + '_ {
        self.neighbors.iter()
    }

    /// Reference rows of the neighbors.
    pub fn indices(&self) -> Vec<usize> {
        self.neighbors.iter().map(|n| n.index).collect()
    }

    /// Distances of the neighbors.
    pub fn distances(&self) -> Vec<T> {
        self.neighbors.iter().map(|n| n.distance).collect()
    }

    /// Distance of the farthest neighbor, or zero when empty.
    pub fn max_distance(&self) -> T {
        self.neighbors
            .last()
            .map(|n| n.distance)
            .unwrap_or_else(T::zero)
    }

    /// The first `k` neighbors and the distance of the `(k+1)`-th, if any.
    pub fn split_at_k(&self, k: usize) -> (&[Neighbor<T>], Option<T>) {
        let k = k.min(self.neighbors.len());
        let bandwidth = self.neighbors.get(k).map(|n| n.distance);
        (&self.neighbors[..k], bandwidth)
    }
}
