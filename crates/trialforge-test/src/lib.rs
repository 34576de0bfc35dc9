//! Shared test fixtures for TrialForge crates.
//!
//! This crate provides benchmark problems and instrumented evaluators.
//! It does NOT depend on `trialforge-solver` to avoid circular dependencies.
//!
//! - [`problems`] - Benchmark problems with known optima
//! - [`evaluators`] - Counting, vetoing and failing evaluators
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! trialforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use trialforge_test::problems::{abs_problem, paraboloid};
//! use trialforge_test::evaluators::CountingEvaluator;
//! ```

pub mod evaluators;
pub mod problems;

// Re-export commonly used fixtures at crate root for convenience
pub use evaluators::{CountingEvaluator, FailingEvaluator, VetoingEvaluator};
pub use problems::{
    abs_problem, failing_problem, paraboloid, two_objective_problem, vetoing_problem,
};
