//! Counter based stoppers.

use super::Stopper;
use crate::scoreboard::ScoreBoard;

/// Stops once enough trials were scored or enough runs were executed.
///
/// The run limit guards against algorithms that propose nothing: without
/// it an evaluation limit alone would never be reached. [`new`](Self::new)
/// uses the same bound for both counters.
///
/// # Example
///
/// ```
/// use trialforge_solver::stopper::MaxEvaluationsStopper;
///
/// let stopper = MaxEvaluationsStopper::new(1000);
/// let runs_only = MaxEvaluationsStopper::max_algorithm_executions(50);
/// ```
#[derive(Debug, Clone)]
pub struct MaxEvaluationsStopper {
    max_evaluations: u64,
    max_algorithm_executions: u64,
}

impl MaxEvaluationsStopper {
    pub fn new(max_evaluations: u64) -> Self {
        Self {
            max_evaluations,
            max_algorithm_executions: max_evaluations,
        }
    }

    /// Stops on the run count only.
    pub fn max_algorithm_executions(max_algorithm_executions: u64) -> Self {
        Self {
            max_evaluations: u64::MAX,
            max_algorithm_executions,
        }
    }

    /// Replaces the run limit.
    pub fn with_max_algorithm_executions(mut self, max_algorithm_executions: u64) -> Self {
        self.max_algorithm_executions = max_algorithm_executions;
        self
    }

    pub fn max_evaluations(&self) -> u64 {
        self.max_evaluations
    }
}

impl Stopper for MaxEvaluationsStopper {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        score_board.evaluations() >= self.max_evaluations
            || score_board.algorithm_run_executions() >= self.max_algorithm_executions
    }
}

/// Stops after the judge reported the given number of new optimal solutions.
#[derive(Debug, Clone)]
pub struct MaxOptimalSolutionsStopper {
    max_optimal_solutions: u64,
}

impl MaxOptimalSolutionsStopper {
    pub fn new(max_optimal_solutions: u64) -> Self {
        Self {
            max_optimal_solutions,
        }
    }
}

impl Stopper for MaxOptimalSolutionsStopper {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        score_board.optimal_solutions_found() >= self.max_optimal_solutions
    }
}
