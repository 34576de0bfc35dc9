//! The solve loop.
//!
//! [`AlgorithmSchedule::execute`] alternates two things until its stopper
//! fires: ask the market for a run, and let the granted algorithm spend the
//! run's budget. Every trial of the run flows through the scoreboard and
//! the schedule listeners; every run is bracketed by
//! `algorithm_run_will_execute` and `algorithm_run_executed`.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use trialforge_core::{Problem, Result, Trial, TrialForgeError};

use crate::algorithm::{AlgorithmRun, RunContext};
use crate::market::AlgorithmMarket;
use crate::scoreboard::ScoreBoard;
use crate::stopper::Stopper;

/// Receives schedule notifications.
///
/// For every run, `algorithm_run_will_execute` fires first, then one
/// `trial_scored` or `trial_vetoed` per evaluated trial point, then
/// `algorithm_run_executed`, even when the run proposed nothing.
pub trait AlgorithmScheduleListener: Send + Sync + Debug {
    fn algorithm_run_will_execute(&self, _label: &str, _score_board: &ScoreBoard) {}

    fn algorithm_run_executed(&self, _label: &str, _score_board: &ScoreBoard) {}

    fn trial_scored(&self, _trial: &Trial) {}

    fn trial_vetoed(&self, _trial: &Trial) {}
}

/// Drives algorithm runs against one problem.
#[derive(Debug)]
pub struct AlgorithmSchedule {
    market: AlgorithmMarket,
    stopper: Box<dyn Stopper>,
    listeners: Vec<Arc<dyn AlgorithmScheduleListener>>,
    stop_flag: Arc<AtomicBool>,
    strict_evaluation: bool,
    seed: Option<u64>,
    rng: ChaCha8Rng,
    problem: Option<Arc<Problem>>,
}

impl AlgorithmSchedule {
    pub fn new(market: AlgorithmMarket, stopper: Box<dyn Stopper>) -> Self {
        Self {
            market,
            stopper,
            listeners: Vec::new(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            strict_evaluation: false,
            seed: None,
            rng: ChaCha8Rng::from_os_rng(),
            problem: None,
        }
    }

    /// Makes every solve replay the same random sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Aborts the solve on evaluator failures instead of vetoing the trial.
    pub fn with_strict_evaluation(mut self, strict: bool) -> Self {
        self.strict_evaluation = strict;
        self
    }

    /// Shares the flag that [`stop_solving`](crate::Solver::stop_solving) sets.
    pub fn with_stop_flag(mut self, stop_flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn AlgorithmScheduleListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn set_stopper(&mut self, stopper: Box<dyn Stopper>) {
        self.stopper = stopper;
    }

    pub fn set_market(&mut self, market: AlgorithmMarket) {
        self.market = market;
        if let Some(problem) = &self.problem {
            self.market.set_problem(problem);
        }
    }

    pub fn set_problem(&mut self, problem: &Arc<Problem>) {
        self.problem = Some(Arc::clone(problem));
        self.market.set_problem(problem);
    }

    /// Clears schedule state; market statistics survive.
    pub fn reset(&mut self) {
        self.market.reset();
        if let Some(seed) = self.seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
    }

    pub fn market(&self) -> &AlgorithmMarket {
        &self.market
    }

    pub fn market_mut(&mut self) -> &mut AlgorithmMarket {
        &mut self.market
    }

    pub fn stopper(&self) -> &dyn Stopper {
        self.stopper.as_ref()
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    pub fn strict_evaluation(&self) -> bool {
        self.strict_evaluation
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn problem(&self) -> Option<&Arc<Problem>> {
        self.problem.as_ref()
    }

    /// Runs algorithms until the stopper fires, a stop is requested or no
    /// algorithm is available.
    ///
    /// Fatal errors (contract violations, strict evaluation failures) end
    /// the loop after the current run was closed, so the scoreboard stays
    /// consistent.
    pub fn execute(&mut self, score_board: &mut ScoreBoard) -> Result<()> {
        let problem = self
            .problem
            .clone()
            .ok_or_else(|| TrialForgeError::InvalidState("schedule has no problem".to_string()))?;

        loop {
            if self.stop_flag.load(Ordering::SeqCst) {
                debug!(event = "stop_requested");
                break;
            }
            if self.stopper.should_stop(score_board) {
                break;
            }
            let Some(grant) = self.market.next_run(&mut self.rng) else {
                warn!(event = "no_algorithm_available");
                break;
            };

            self.market.algorithm_run_will_execute(&grant.label);
            for listener in &self.listeners {
                listener.algorithm_run_will_execute(&grant.label, score_board);
            }
            debug!(
                event = "run_start",
                algorithm = %grant.label,
                budget = grant.evaluations,
            );

            let trials_before = score_board.evaluations() + score_board.vetoes();
            let best_before = score_board.best_satisfaction().unwrap_or(0.0);
            let mut optimal_found = Vec::new();
            let outcome = match self.market.algorithm_mut(grant.index) {
                Some(algorithm) => {
                    let context = RunContext {
                        problem: &problem,
                        score_board: &mut *score_board,
                        listeners: &self.listeners,
                        stop_flag: &self.stop_flag,
                        strict_evaluation: self.strict_evaluation,
                        rng: &mut self.rng,
                        optimal_found: &mut optimal_found,
                    };
                    let mut run = AlgorithmRun::new(grant.label.as_str(), grant.evaluations, context);
                    algorithm.perform_run(&mut run)
                }
                None => Ok(()),
            };
            let outcome = match outcome {
                Err(TrialForgeError::RunTerminated) => Ok(()),
                other => other,
            };

            score_board.algorithm_run_executed(&grant.label);
            for listener in &self.listeners {
                listener.algorithm_run_executed(&grant.label, score_board);
            }
            let evaluated = score_board.evaluations() + score_board.vetoes() - trials_before;
            let gain = score_board.best_satisfaction().unwrap_or(0.0) - best_before;
            debug!(
                event = "run_end",
                algorithm = %grant.label,
                trials = evaluated,
                evaluations = score_board.evaluations(),
                vetoes = score_board.vetoes(),
                runs = score_board.algorithm_run_executions(),
            );

            for trial in &optimal_found {
                info!(
                    event = "new_best",
                    algorithm = %grant.label,
                    satisfaction = trial.satisfaction(),
                    evaluations = score_board.evaluations(),
                    point = %trial.trial_point(),
                );
                self.market.found_new_optimal_solution(trial);
            }
            self.market.algorithm_run_executed(
                &grant.label,
                evaluated,
                gain,
                optimal_found.len() as u64,
            );

            outcome?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
