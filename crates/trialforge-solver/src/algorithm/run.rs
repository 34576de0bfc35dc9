//! Budgeted algorithm runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{error, trace, warn};
use trialforge_core::{Problem, Result, Trial, TrialForgeError, TrialPoint, Veto};

use crate::schedule::AlgorithmScheduleListener;
use crate::scoreboard::ScoreBoard;

/// Shared state a run reports its trials into.
pub(crate) struct RunContext<'a> {
    pub(crate) problem: &'a Arc<Problem>,
    pub(crate) score_board: &'a mut ScoreBoard,
    pub(crate) listeners: &'a [Arc<dyn AlgorithmScheduleListener>],
    pub(crate) stop_flag: &'a AtomicBool,
    pub(crate) strict_evaluation: bool,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) optimal_found: &'a mut Vec<Trial>,
}

/// A budget of evaluations granted to one algorithm.
///
/// Every proposed trial point costs exactly one unit of budget, whatever
/// the outcome. The run does not refuse proposals past the budget, so an
/// algorithm may finish an atomic step, but it must check
/// [`has_next`](Self::has_next) before starting a new one.
///
/// Once [`stop_solving`](crate::Solver::stop_solving) was requested, every
/// proposal fails with [`TrialForgeError::RunTerminated`]; algorithms
/// propagate it with `?` and the schedule ends the run.
pub struct AlgorithmRun<'a> {
    label: String,
    initial_count: u32,
    remaining_count: u32,
    context: RunContext<'a>,
}

impl<'a> AlgorithmRun<'a> {
    pub(crate) fn new(label: impl Into<String>, evaluations: u32, context: RunContext<'a>) -> Self {
        Self {
            label: label.into(),
            initial_count: evaluations,
            remaining_count: evaluations,
            context,
        }
    }

    /// Label of the algorithm executing this run.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn initial_count(&self) -> u32 {
        self.initial_count
    }

    pub fn remaining_count(&self) -> u32 {
        self.remaining_count
    }

    /// Whether budget is left.
    pub fn has_next(&self) -> bool {
        self.remaining_count > 0
    }

    pub fn problem(&self) -> &Arc<Problem> {
        self.context.problem
    }

    /// Random source of the solve, seeded from the solver configuration.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut *self.context.rng
    }

    /// Best solution of the solve so far, from any algorithm.
    pub fn best_solution(&self) -> Option<&Trial> {
        self.context.score_board.best_solution()
    }

    /// Whether a stop was requested; further proposals will be refused.
    pub fn is_terminated(&self) -> bool {
        self.context.stop_flag.load(Ordering::SeqCst)
    }

    /// Scores one trial point and returns the judged or vetoed trial.
    pub fn evaluate_trial_point(&mut self, trial_point: TrialPoint) -> Result<Trial> {
        self.remaining_count = self.remaining_count.saturating_sub(1);
        if self.is_terminated() {
            return Err(TrialForgeError::RunTerminated);
        }

        let problem = Arc::clone(self.context.problem);
        let mut trial = Trial::new(Arc::clone(&problem), trial_point, Some(self.label.clone()));
        let outcome = problem.evaluate(&mut trial);
        self.context.record(trial, outcome)
    }

    /// Scores a batch of trial points in parallel.
    ///
    /// Evaluation runs on the rayon pool; judging and bookkeeping happen
    /// afterwards, in proposal order, exactly as if each point had been passed
    /// to [`evaluate_trial_point`](Self::evaluate_trial_point).
    pub fn evaluate_trial_points(&mut self, trial_points: Vec<TrialPoint>) -> Result<Vec<Trial>> {
        let count = u32::try_from(trial_points.len()).unwrap_or(u32::MAX);
        self.remaining_count = self.remaining_count.saturating_sub(count);
        if self.is_terminated() {
            return Err(TrialForgeError::RunTerminated);
        }

        let problem = Arc::clone(self.context.problem);
        let label = self.label.as_str();
        let evaluated: Vec<(Trial, Result<()>)> = trial_points
            .into_par_iter()
            .map(|trial_point| {
                let mut trial =
                    Trial::new(Arc::clone(&problem), trial_point, Some(label.to_string()));
                let outcome = problem.evaluate(&mut trial);
                (trial, outcome)
            })
            .collect();

        let mut trials = Vec::with_capacity(evaluated.len());
        for (trial, outcome) in evaluated {
            trials.push(self.context.record(trial, outcome)?);
        }
        Ok(trials)
    }
}

impl RunContext<'_> {
    // Exactly one of trial_scored / trial_vetoed fires per successful call.
    fn record(&mut self, mut trial: Trial, outcome: Result<()>) -> Result<Trial> {
        match outcome {
            Ok(()) => {}
            Err(TrialForgeError::Evaluation(reason)) if !self.strict_evaluation => {
                warn!(
                    event = "evaluation_failed",
                    algorithm = trial.algorithm().unwrap_or("-"),
                    reason = %reason,
                );
                trial.veto_trial(Veto::new(reason));
            }
            Err(err) => {
                log_contract_violation(&trial, &err);
                return Err(err);
            }
        }

        if trial.is_vetoed() {
            self.score_board.trial_vetoed(&trial);
            for listener in self.listeners {
                listener.trial_vetoed(&trial);
            }
            trace!(
                event = "trial",
                algorithm = trial.algorithm().unwrap_or("-"),
                vetoed = true,
            );
            return Ok(trial);
        }

        trial
            .check_scored()
            .inspect_err(|err| log_contract_violation(&trial, err))?;
        let is_new_optimal = self.score_board.judge_mut().judge(&mut trial)?;
        self.score_board.trial_scored(&trial);
        for listener in self.listeners {
            listener.trial_scored(&trial);
        }
        trace!(
            event = "trial",
            algorithm = trial.algorithm().unwrap_or("-"),
            satisfaction = trial.satisfaction(),
            vetoed = false,
        );

        if is_new_optimal {
            self.score_board.found_new_optimal_solution(&trial);
            self.optimal_found.push(trial.clone());
        }
        Ok(trial)
    }
}

// Broken objectives and evaluators abort the solve even in lenient mode.
fn log_contract_violation(trial: &Trial, err: &TrialForgeError) {
    if err.is_contract_violation() {
        error!(
            event = "contract_violation",
            algorithm = trial.algorithm().unwrap_or("-"),
            reason = %err,
        );
    }
}
