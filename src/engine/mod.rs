//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates cross-validation runs:
//! - Parameter and request validation
//! - Per-fold standardization, indexing, prediction and scoring
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Input validation.
pub mod validator;

/// Cross-validation executor.
pub mod executor;
