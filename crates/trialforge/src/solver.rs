//! Solver entry points that hide all internal wiring.

use std::path::Path;

use tracing::warn;
use trialforge_config::SolverConfig;
use trialforge_core::{Problem, Result};
use trialforge_solver::{SolveOutcome, Solver};

/// Configuration file picked up by [`run_solver`].
pub const SOLVER_CONFIG_FILE: &str = "solver.toml";

/// Solves `problem` with `solver.toml` from the working directory, or the
/// default configuration when the file is absent or invalid.
pub fn run_solver(problem: Problem) -> Result<SolveOutcome> {
    run_solver_with_config(problem, SOLVER_CONFIG_FILE)
}

/// Solves `problem` with the configuration stored at `path`.
///
/// A missing or unreadable file falls back to [`SolverConfig::default`].
/// With the `console` feature the colored console output is installed
/// first.
pub fn run_solver_with_config(problem: Problem, path: impl AsRef<Path>) -> Result<SolveOutcome> {
    #[cfg(feature = "console")]
    trialforge_console::init();

    let path = path.as_ref();
    let config = match SolverConfig::load(path) {
        Ok(config) => config,
        Err(err) => {
            if path.exists() {
                warn!(event = "config_rejected", path = %path.display(), error = %err);
            }
            SolverConfig::default()
        }
    };

    Solver::from_config(config).solve(problem)
}
