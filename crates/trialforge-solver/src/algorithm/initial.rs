//! Evaluation of the starting point.

use trialforge_core::Result;

use super::{AlgorithmRun, SearchAlgorithm};

/// Evaluates the variables' initial values once per solve.
///
/// Claims the first run of every solve so the judge always starts from the
/// user's starting point, then reports itself exhausted.
#[derive(Debug, Clone)]
pub struct InitialAlgorithm {
    label: String,
    done: bool,
}

impl InitialAlgorithm {
    pub const LABEL: &'static str = "initial";

    pub fn new() -> Self {
        Self {
            label: Self::LABEL.to_string(),
            done: false,
        }
    }
}

impl Default for InitialAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for InitialAlgorithm {
    fn label(&self) -> &str {
        &self.label
    }

    fn reset(&mut self) {
        self.done = false;
    }

    fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()> {
        if self.done || !run.has_next() {
            return Ok(());
        }
        self.done = true;
        let point = run.problem().generate_initial_trial_point();
        run.evaluate_trial_point(point)?;
        Ok(())
    }

    fn claims_first_run(&self) -> bool {
        true
    }

    fn is_exhausted(&self) -> bool {
        self.done
    }

    fn global_rating(&self) -> u8 {
        0
    }

    fn local_rating(&self) -> u8 {
        0
    }
}
