//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical building blocks:
//! - Distance metrics between feature vectors
//! - Summary statistics (mean, sample sd, standard error, rank bins)
//! - Feature standardization
//! - Neighbor weighting kernels
//! - Deterministic k-smallest neighbor selection
//!
//! These carry no KNN-specific orchestration logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Distance metrics.
pub mod distance;

/// Summary statistics.
pub mod stats;

/// Z-score standardization.
pub mod standardize;

/// Neighbor weighting kernels.
pub mod kernel;

/// Neighbor sets and selection.
pub mod neighborhood;
