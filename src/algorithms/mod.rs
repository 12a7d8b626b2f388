//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer implements the KNN model itself:
//! - An exhaustive neighbor index over standardized reference data
//! - Regression and classification predictors sharing that index
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
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Nearest-neighbor index.
pub mod index;

/// Regression and classification predictors.
pub mod predictor;
