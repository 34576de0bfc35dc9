//! TrialForge - Satisfaction Driven Optimization in Rust
//!
//! Describe a problem as variables, objectives and an evaluator, then let a
//! market of search algorithms compete for evaluation budget.
//!
//! # Example
//!
//! ```rust
//! use trialforge::prelude::*;
//!
//! let problem = ProblemFactory::inverse_square_minimizer(
//!     vec![Variable::new("x", 4.0, -10.0, 10.0)],
//!     |trial: &Trial, _: &[Variable]| trial.value("x").unwrap_or(f64::MAX).abs(),
//!     0.1,
//! );
//!
//! let mut solver = Solver::new(MaxEvaluationsStopper::new(300)).with_seed(1);
//! let outcome = solver.solve(problem).unwrap();
//! assert!(outcome.best_satisfaction().unwrap() > 0.0);
//! ```

// Domain types
pub use trialforge_core::{
    check_satisfaction, CurveObjective, Evaluator, FnObjective, MutableTrialPoint, Objective,
    Problem, ProblemFactory, Result, SatisfactionCurve, Score, Scorer, ScorerEvaluator, Trial,
    TrialForgeError, TrialPoint, Variable, Veto, DEFAULT_OBJECTIVE_NAME,
};

// Satisfaction curve functions
pub use trialforge_core::satisfaction;

// Configuration
pub use trialforge_config::{
    AggregationKind, AlgorithmKind, ConfigError, JudgeConfig, MarketConfig, SolverConfig,
    StopperConfig, StrategyKind,
};

// Solver engine
pub use trialforge_solver::{
    algorithm, judge, market, schedule, scoreboard, stopper, AlgorithmMarket, AlgorithmRun,
    AlgorithmSchedule, AlgorithmScheduleListener, SearchAlgorithm, SolutionJudge, SolveOutcome,
    Solver, SolverHandle, ScoreBoard, ScoreBoardListener, Stopper,
};

#[cfg(feature = "console")]
pub use trialforge_console as console;

mod solver;
pub use solver::{run_solver, run_solver_with_config, SOLVER_CONFIG_FILE};

pub mod prelude {
    pub use super::{
        AggregationKind, AlgorithmKind, Evaluator, Objective, Problem, ProblemFactory, Result,
        SatisfactionCurve, SolveOutcome, Solver, SolverConfig, SolverHandle, Trial,
        TrialForgeError, TrialPoint, Variable, Veto,
    };
    pub use trialforge_solver::stopper::{
        MaxElapsedTimeStopper, MaxEvaluationsStopper, MinSatisfactionStopper, OrStopper,
    };
    pub use trialforge_solver::{
        AlgorithmMarket, AlgorithmScheduleListener, ScoreBoardListener, SearchAlgorithm,
    };
}
