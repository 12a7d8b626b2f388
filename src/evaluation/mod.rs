//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer measures and compares models:
//! - Regression and classification metrics
//! - Seeded, optionally stratified fold and train/test splits
//! - Aggregation of fold-level results and neighbor-count selection
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Prediction quality metrics.
pub mod metrics;

/// Fold and train/test partitioning.
pub mod folds;

/// Tuning results and selection policies.
pub mod cv;
