//! Test utilities for trialforge-solver
//!
//! Provides common test fixtures used across the crate's test modules.
//! Re-exports problems from trialforge-test and adds solver-specific helpers.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trialforge_core::{Problem, Result, Trial, TrialPoint, Variable};

use crate::algorithm::{AlgorithmRun, RunContext, SearchAlgorithm};
use crate::market::{AlgorithmMarket, RandomAlgorithmStrategy};
use crate::schedule::{AlgorithmSchedule, AlgorithmScheduleListener};
use crate::scoreboard::ScoreBoard;
use crate::stopper::Stopper;

pub use trialforge_test::evaluators::{CountingEvaluator, FailingEvaluator, VetoingEvaluator};
pub use trialforge_test::problems::{
    abs_problem, failing_problem, paraboloid, problem_with_evaluator, two_objective_problem,
    vetoing_problem,
};

// ============================================================================
// Scripted algorithms
// ============================================================================

/// Proposes the point `x = value` a fixed number of times per run.
///
/// The number of proposals is capped by the run's budget.
#[derive(Debug, Clone)]
pub struct ScriptedAlgorithm {
    label: String,
    value: f64,
    proposals_per_run: u32,
}

impl ScriptedAlgorithm {
    pub fn new(label: &str, value: f64, proposals_per_run: u32) -> Self {
        Self {
            label: label.to_string(),
            value,
            proposals_per_run,
        }
    }
}

impl SearchAlgorithm for ScriptedAlgorithm {
    fn label(&self) -> &str {
        &self.label
    }

    fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()> {
        let problem = Arc::clone(run.problem());
        for _ in 0..self.proposals_per_run {
            if !run.has_next() {
                break;
            }
            run.evaluate_trial_point(point_x(problem.variables(), self.value))?;
        }
        Ok(())
    }
}

/// Proposes a new, better point on every call: `x` halves each time.
#[derive(Debug, Clone)]
pub struct ImprovingAlgorithm {
    label: String,
    next: f64,
}

impl ImprovingAlgorithm {
    pub fn new(label: &str, start: f64) -> Self {
        Self {
            label: label.to_string(),
            next: start,
        }
    }
}

impl SearchAlgorithm for ImprovingAlgorithm {
    fn label(&self) -> &str {
        &self.label
    }

    fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()> {
        let problem = Arc::clone(run.problem());
        while run.has_next() {
            run.evaluate_trial_point(point_x(problem.variables(), self.next))?;
            self.next /= 2.0;
        }
        Ok(())
    }
}

/// Builds a trial point with every variable set to `value`.
pub fn point_x(variables: &[Variable], value: f64) -> TrialPoint {
    let coordinates = vec![value; variables.len()];
    TrialPoint::from_coordinates(variables, &coordinates)
}

// ============================================================================
// Listeners
// ============================================================================

/// Records schedule notifications as strings, in arrival order.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<String>>,
}

impl EventRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn push(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl AlgorithmScheduleListener for EventRecorder {
    fn algorithm_run_will_execute(&self, label: &str, _score_board: &ScoreBoard) {
        self.push(format!("will:{label}"));
    }

    fn algorithm_run_executed(&self, label: &str, _score_board: &ScoreBoard) {
        self.push(format!("done:{label}"));
    }

    fn trial_scored(&self, trial: &Trial) {
        self.push(format!("scored:{}", trial.algorithm().unwrap_or("-")));
    }

    fn trial_vetoed(&self, trial: &Trial) {
        self.push(format!("vetoed:{}", trial.algorithm().unwrap_or("-")));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Owns everything an [`AlgorithmRun`] borrows, outside of a schedule.
pub struct RunFixture {
    pub problem: Arc<Problem>,
    pub score_board: ScoreBoard,
    pub listeners: Vec<Arc<dyn AlgorithmScheduleListener>>,
    pub stop_flag: AtomicBool,
    pub strict_evaluation: bool,
    pub rng: ChaCha8Rng,
    pub optimal_found: Vec<Trial>,
}

impl RunFixture {
    pub fn new(problem: Problem) -> Self {
        let mut score_board = ScoreBoard::default();
        score_board.reset();
        Self {
            problem: Arc::new(problem),
            score_board,
            listeners: Vec::new(),
            stop_flag: AtomicBool::new(false),
            strict_evaluation: false,
            rng: ChaCha8Rng::seed_from_u64(42),
            optimal_found: Vec::new(),
        }
    }

    /// Starts a run with the given budget.
    pub fn run(&mut self, label: &str, evaluations: u32) -> AlgorithmRun<'_> {
        let context = RunContext {
            problem: &self.problem,
            score_board: &mut self.score_board,
            listeners: &self.listeners,
            stop_flag: &self.stop_flag,
            strict_evaluation: self.strict_evaluation,
            rng: &mut self.rng,
            optimal_found: &mut self.optimal_found,
        };
        AlgorithmRun::new(label, evaluations, context)
    }
}

/// A seeded schedule over `algorithms` with a random strategy.
pub fn create_schedule(
    problem: Problem,
    algorithms: Vec<Box<dyn SearchAlgorithm>>,
    evaluations_per_run: u32,
    stopper: impl Stopper + 'static,
) -> AlgorithmSchedule {
    let mut market =
        AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy)).with_evaluations_per_run(evaluations_per_run);
    for algorithm in algorithms {
        market.add_algorithm(algorithm);
    }
    let mut schedule = AlgorithmSchedule::new(market, Box::new(stopper)).with_seed(42);
    schedule.set_problem(&Arc::new(problem));
    schedule.reset();
    schedule
}

/// A reset scoreboard with the default judge.
pub fn create_score_board() -> ScoreBoard {
    let mut score_board = ScoreBoard::default();
    score_board.reset();
    score_board
}
