//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data structures shared by every other layer:
//! - The crate error type
//! - Datasets, observations and labels
//! - Folds produced by k-fold partitioning
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types.
pub mod errors;

/// Datasets, schemas and observations.
pub mod dataset;

/// Fold type and group sizing.
pub mod partition;
