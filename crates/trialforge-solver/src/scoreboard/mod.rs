//! Run-time statistics of a solve.
//!
//! The [`ScoreBoard`] records what the schedule reports: scored and vetoed
//! trials, executed runs and new optimal solutions. It owns the solution
//! judge but never second-guesses it; the best solution is whatever the
//! judge last reported.

mod efficiency;
mod listener;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use trialforge_core::Trial;

use crate::judge::{SatisfactionSolutionJudge, SolutionJudge};

pub use efficiency::{EfficiencyEntry, EfficiencyLogger};
pub use listener::{
    ChannelScoreBoardListener, CountingScoreBoardListener, LoggingScoreBoardListener,
    ScoreBoardEvent, ScoreBoardListener,
};

/// Number of optimal solutions listed by [`ScoreBoard::summary`].
const SUMMARY_SOLUTIONS: usize = 3;

/// Counters, best solution and judge of the current solve.
///
/// # Example
///
/// ```
/// use trialforge_solver::scoreboard::ScoreBoard;
///
/// let mut score_board = ScoreBoard::default();
/// score_board.reset();
/// score_board.algorithm_run_executed("random");
///
/// assert_eq!(score_board.algorithm_run_executions(), 1);
/// assert_eq!(score_board.evaluations(), 0);
/// assert!(score_board.best_solution().is_none());
/// ```
#[derive(Debug)]
pub struct ScoreBoard {
    judge: Box<dyn SolutionJudge>,
    start_time: Option<Instant>,
    best_solution: Option<Trial>,
    evaluations: u64,
    vetoes: u64,
    algorithm_run_executions: u64,
    optimal_solutions_found: u64,
    evaluations_log: BTreeMap<String, u64>,
    efficiency_logger: Option<EfficiencyLogger>,
    listeners: Vec<Arc<dyn ScoreBoardListener>>,
}

impl ScoreBoard {
    pub fn new(judge: Box<dyn SolutionJudge>) -> Self {
        Self {
            judge,
            start_time: None,
            best_solution: None,
            evaluations: 0,
            vetoes: 0,
            algorithm_run_executions: 0,
            optimal_solutions_found: 0,
            evaluations_log: BTreeMap::new(),
            efficiency_logger: None,
            listeners: Vec::new(),
        }
    }

    /// Clears counters, the best solution and the judge, and restarts the clock.
    pub fn reset(&mut self) {
        self.start_time = Some(Instant::now());
        self.best_solution = None;
        self.evaluations = 0;
        self.vetoes = 0;
        self.algorithm_run_executions = 0;
        self.optimal_solutions_found = 0;
        self.evaluations_log.clear();
        self.judge.reset();
        if let Some(logger) = &mut self.efficiency_logger {
            logger.reset();
        }
    }

    /// Replaces the judge; the new judge starts empty.
    pub fn set_judge(&mut self, mut judge: Box<dyn SolutionJudge>) {
        judge.reset();
        self.judge = judge;
    }

    // === Listener Registration ===

    pub fn add_listener(&mut self, listener: Arc<dyn ScoreBoardListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Turns on efficiency logging with windows of `evaluations_step` trials.
    pub fn record_efficiency(&mut self, evaluations_step: u64) {
        self.efficiency_logger = Some(EfficiencyLogger::new(evaluations_step));
    }

    // === Notifications ===

    /// Records a scored (and judged) trial.
    pub fn trial_scored(&mut self, trial: &Trial) {
        self.evaluations += 1;
        let label = trial.algorithm().unwrap_or_default();
        *self.evaluations_log.entry(label.to_string()).or_insert(0) += 1;
        if let Some(logger) = &mut self.efficiency_logger {
            logger.record(label, trial.satisfaction(), self.evaluations);
        }

        for listener in &self.listeners {
            listener.trial_scored(self, trial);
        }
    }

    /// Records a vetoed trial.
    pub fn trial_vetoed(&mut self, trial: &Trial) {
        self.vetoes += 1;

        for listener in &self.listeners {
            listener.trial_vetoed(self, trial);
        }
    }

    /// Records the end of one algorithm run.
    pub fn algorithm_run_executed(&mut self, _label: &str) {
        self.algorithm_run_executions += 1;
    }

    /// Records a new optimal solution reported by the judge.
    pub fn found_new_optimal_solution(&mut self, trial: &Trial) {
        self.optimal_solutions_found += 1;
        self.best_solution = Some(trial.clone());

        for listener in &self.listeners {
            listener.new_optimal_solution(self, trial);
        }
    }

    // === Queries ===

    pub fn judge(&self) -> &dyn SolutionJudge {
        self.judge.as_ref()
    }

    pub fn judge_mut(&mut self) -> &mut dyn SolutionJudge {
        self.judge.as_mut()
    }

    /// Wall-clock time since the last reset.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Number of scored trials. Vetoed trials are not included.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn vetoes(&self) -> u64 {
        self.vetoes
    }

    pub fn algorithm_run_executions(&self) -> u64 {
        self.algorithm_run_executions
    }

    pub fn optimal_solutions_found(&self) -> u64 {
        self.optimal_solutions_found
    }

    pub fn best_solution(&self) -> Option<&Trial> {
        self.best_solution.as_ref()
    }

    /// Overall satisfaction of the best solution, if any.
    pub fn best_satisfaction(&self) -> Option<f64> {
        self.best_solution.as_ref().map(Trial::satisfaction)
    }

    /// Scored trials per algorithm label.
    pub fn evaluations_log(&self) -> &BTreeMap<String, u64> {
        &self.evaluations_log
    }

    pub fn evaluations_for(&self, label: &str) -> u64 {
        self.evaluations_log.get(label).copied().unwrap_or(0)
    }

    /// Closed efficiency windows, empty unless efficiency logging is on.
    pub fn efficiency_history(&self) -> &[EfficiencyEntry] {
        self.efficiency_logger
            .as_ref()
            .map(EfficiencyLogger::history)
            .unwrap_or(&[])
    }

    /// Multi-line report of the counters and the first optimal solutions.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new(Box::new(SatisfactionSolutionJudge::default()))
    }
}

impl fmt::Display for ScoreBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optimal = self.judge.optimal_solutions();
        writeln!(f, "ScoreBoard")?;
        writeln!(f, "  elapsed time:            {:.3} s", self.elapsed_seconds())?;
        writeln!(f, "  evaluations:             {}", self.evaluations)?;
        writeln!(f, "  vetoes:                  {}", self.vetoes)?;
        writeln!(f, "  algorithm runs:          {}", self.algorithm_run_executions)?;
        writeln!(f, "  optimal solutions found: {}", self.optimal_solutions_found)?;
        writeln!(f, "  optimal solutions held:  {}", optimal.len())?;
        match self.best_satisfaction() {
            Some(satisfaction) => writeln!(f, "  overall satisfaction:    {satisfaction}")?,
            None => writeln!(f, "  overall satisfaction:    n/a")?,
        }

        for solution in optimal.iter().take(SUMMARY_SOLUTIONS) {
            writeln!(f, "  ---")?;
            let problem = solution.problem();
            for variable in problem.variables() {
                match solution.trial_point().value_of(variable) {
                    Ok(value) => writeln!(f, "  variable {} = {}", variable.name(), value)?,
                    Err(_) => writeln!(f, "  variable {} = n/a", variable.name())?,
                }
            }
            for objective in problem.objectives() {
                if let Ok(score) = solution.score(objective.name()) {
                    writeln!(
                        f,
                        "  objective {} = {}, satisfaction = {}",
                        objective.name(),
                        score.value(),
                        score.satisfaction()
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
