//! Uniform random search.

use trialforge_core::Result;

use super::{current_best_point, perturb, uniform, AlgorithmRun, SearchAlgorithm};

/// Re-samples a random subset of variables of the best point, uniformly
/// within each variable's limits.
///
/// On average one variable changes per proposal. A whole run is proposed up
/// front and evaluated as one parallel batch.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    label: String,
}

impl RandomSearch {
    pub const LABEL: &'static str = "random";

    pub fn new() -> Self {
        Self::with_label(Self::LABEL)
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for RandomSearch {
    fn label(&self) -> &str {
        &self.label
    }

    fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()> {
        let problem = std::sync::Arc::clone(run.problem());
        let variables = problem.variables();
        let base = current_best_point(run);

        let count = run.remaining_count() as usize;
        let rng = run.rng();
        let points = (0..count)
            .map(|_| {
                perturb(&mut *rng, variables, &base, |rng, _, variable| {
                    uniform(rng, variable.lower_limit(), variable.upper_limit())
                })
            })
            .collect();

        run.evaluate_trial_points(points)?;
        Ok(())
    }

    fn global_rating(&self) -> u8 {
        10
    }

    fn local_rating(&self) -> u8 {
        0
    }
}
