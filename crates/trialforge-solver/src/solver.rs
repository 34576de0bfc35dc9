//! Solver facade.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use trialforge_config::SolverConfig;
use trialforge_core::{Problem, Result, Trial};

use crate::judge::SolutionJudge;
use crate::market::AlgorithmMarket;
use crate::schedule::{AlgorithmSchedule, AlgorithmScheduleListener};
use crate::scoreboard::{ScoreBoard, ScoreBoardListener};
use crate::stopper::Stopper;

/// Owns a schedule and a scoreboard and runs solves.
///
/// A solver can be reused: every [`solve`](Self::solve) resets the
/// scoreboard and the schedule, while the market keeps its algorithm
/// statistics.
///
/// # Example
///
/// ```
/// use trialforge_core::{ProblemFactory, Trial, Variable};
/// use trialforge_solver::stopper::MaxEvaluationsStopper;
/// use trialforge_solver::Solver;
///
/// let problem = ProblemFactory::inverse_square_minimizer(
///     vec![Variable::new("x", 3.0, -10.0, 10.0)],
///     |trial: &Trial, _: &[Variable]| trial.value("x").unwrap_or(f64::MAX).abs(),
///     0.1,
/// );
///
/// let mut solver = Solver::new(MaxEvaluationsStopper::new(200)).with_seed(42);
/// let outcome = solver.solve(problem).unwrap();
///
/// assert!(outcome.best_solution.is_some());
/// assert!(outcome.evaluations >= 200);
/// ```
#[derive(Debug)]
pub struct Solver {
    schedule: AlgorithmSchedule,
    score_board: ScoreBoard,
    stop_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
    problem: Option<Arc<Problem>>,
    config: Option<SolverConfig>,
}

impl Solver {
    /// Creates a solver over the default market of bundled algorithms.
    pub fn new(stopper: impl Stopper + 'static) -> Self {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let schedule = AlgorithmSchedule::new(AlgorithmMarket::default(), Box::new(stopper))
            .with_stop_flag(Arc::clone(&stop_flag));
        Self {
            schedule,
            score_board: ScoreBoard::default(),
            stop_flag,
            solving: Arc::new(AtomicBool::new(false)),
            problem: None,
            config: None,
        }
    }

    pub fn with_market(mut self, market: AlgorithmMarket) -> Self {
        self.schedule.set_market(market);
        self
    }

    pub fn with_judge(mut self, judge: Box<dyn SolutionJudge>) -> Self {
        self.score_board.set_judge(judge);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.schedule = self.schedule.with_seed(seed);
        self
    }

    pub fn with_strict_evaluation(mut self, strict: bool) -> Self {
        self.schedule = self.schedule.with_strict_evaluation(strict);
        self
    }

    /// Logs per-algorithm efficiency every `evaluations_step` evaluations.
    pub fn with_efficiency_log(mut self, evaluations_step: u64) -> Self {
        self.score_board.record_efficiency(evaluations_step);
        self
    }

    /// Sets configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn set_stopper(&mut self, stopper: impl Stopper + 'static) {
        self.schedule.set_stopper(Box::new(stopper));
    }

    pub fn add_schedule_listener(&mut self, listener: Arc<dyn AlgorithmScheduleListener>) {
        self.schedule.add_listener(listener);
    }

    pub fn add_score_board_listener(&mut self, listener: Arc<dyn ScoreBoardListener>) {
        self.score_board.add_listener(listener);
    }

    /// Solves `problem` until the stopper fires or a stop is requested.
    ///
    /// Fails fast with a configuration error when the problem has no
    /// variables or no objectives. Counters and the best solution remain
    /// available through [`score_board`](Self::score_board) even when the
    /// solve ends with an error.
    pub fn solve(&mut self, problem: impl Into<Arc<Problem>>) -> Result<SolveOutcome> {
        let problem = problem.into();
        problem.validate()?;

        self.problem = Some(Arc::clone(&problem));
        self.schedule.set_problem(&problem);
        self.reset();
        self.stop_flag.store(false, Ordering::SeqCst);
        self.solving.store(true, Ordering::SeqCst);

        let market = self.schedule.market();
        info!(
            event = "solve_start",
            variables = problem.variables().len(),
            objectives = problem.objectives().len(),
            algorithms = market.pool().len(),
            strategy = market.strategy_name(),
            evaluations_per_run = market.evaluations_per_run(),
        );

        let result = self.schedule.execute(&mut self.score_board);
        self.solving.store(false, Ordering::SeqCst);

        let outcome = self.outcome();
        info!(
            event = "solve_end",
            evaluations = outcome.evaluations,
            vetoes = outcome.vetoes,
            runs = outcome.algorithm_run_executions,
            optimal_solutions = outcome.optimal_solutions_found,
            satisfaction = outcome.best_satisfaction().unwrap_or(0.0),
            duration_ms = outcome.elapsed.as_millis() as u64,
            terminated_early = outcome.terminated_early,
            failed = result.is_err(),
        );

        result.map(|()| outcome)
    }

    /// Clears the scoreboard and the schedule.
    pub fn reset(&mut self) {
        self.score_board.reset();
        self.schedule.reset();
    }

    /// Requests the running solve to stop before its next run.
    ///
    /// Proposals made by the current run after this call are refused.
    /// Returns false when no solve is running.
    pub fn stop_solving(&self) -> bool {
        self.handle().stop_solving()
    }

    /// A clonable handle for stopping the solve from elsewhere.
    pub fn handle(&self) -> SolverHandle {
        SolverHandle {
            stop_flag: Arc::clone(&self.stop_flag),
            solving: Arc::clone(&self.solving),
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    /// Live statistics of the last solve.
    pub fn score_board(&self) -> &ScoreBoard {
        &self.score_board
    }

    pub fn schedule(&self) -> &AlgorithmSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut AlgorithmSchedule {
        &mut self.schedule
    }

    pub fn market(&self) -> &AlgorithmMarket {
        self.schedule.market()
    }

    /// The problem of the last solve.
    pub fn problem(&self) -> Option<&Arc<Problem>> {
        self.problem.as_ref()
    }

    /// Returns the configuration if set.
    pub fn config(&self) -> Option<&SolverConfig> {
        self.config.as_ref()
    }

    fn outcome(&self) -> SolveOutcome {
        let score_board = &self.score_board;
        SolveOutcome {
            best_solution: score_board.best_solution().cloned(),
            optimal_solutions: score_board.judge().optimal_solutions().to_vec(),
            evaluations: score_board.evaluations(),
            vetoes: score_board.vetoes(),
            algorithm_run_executions: score_board.algorithm_run_executions(),
            optimal_solutions_found: score_board.optimal_solutions_found(),
            elapsed: score_board.elapsed(),
            terminated_early: self.stop_flag.load(Ordering::SeqCst),
        }
    }
}

/// Stops a solve from another thread or from a listener.
#[derive(Debug, Clone)]
pub struct SolverHandle {
    stop_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
}

impl SolverHandle {
    /// Requests early termination; returns false when no solve is running.
    pub fn stop_solving(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.stop_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }
}

/// Result of a finished solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub best_solution: Option<Trial>,
    pub optimal_solutions: Vec<Trial>,
    pub evaluations: u64,
    pub vetoes: u64,
    pub algorithm_run_executions: u64,
    pub optimal_solutions_found: u64,
    pub elapsed: Duration,
    /// Whether the solve ended through a stop request.
    pub terminated_early: bool,
}

impl SolveOutcome {
    pub fn best_satisfaction(&self) -> Option<f64> {
        self.best_solution.as_ref().map(Trial::satisfaction)
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} evaluations, {} vetoes, {} runs in {:.3} s",
            self.evaluations,
            self.vetoes,
            self.algorithm_run_executions,
            self.elapsed.as_secs_f64()
        )?;
        match &self.best_solution {
            Some(best) => write!(f, ", best {} at {}", best.satisfaction(), best.trial_point()),
            None => write!(f, ", no solution"),
        }
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
