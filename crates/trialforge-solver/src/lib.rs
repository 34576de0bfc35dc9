//! TrialForge Solver Engine
//!
//! This crate provides the multi-algorithm solve loop including:
//! - Solver facade and solver handle
//! - Search algorithms and budgeted algorithm runs
//! - Algorithm pool, market and selection strategies
//! - Solution judges
//! - Scoreboard with listeners and efficiency logging
//! - Stoppers
//! - Configuration wiring (builder module)

pub mod algorithm;
pub mod builder;
pub mod judge;
pub mod market;
pub mod schedule;
pub mod scoreboard;
pub mod solver;
pub mod stopper;

pub use algorithm::{
    AlgorithmRun, InitialAlgorithm, RandomSearch, RandomShrinkSearch, SearchAlgorithm,
    SimplexSearch,
};
pub use builder::{JudgeBuilder, MarketBuilder, StopperBuilder};
pub use judge::{Aggregation, SatisfactionSolutionJudge, SolutionJudge};
pub use market::{
    AlgorithmGrant, AlgorithmMarket, AlgorithmPool, AlgorithmPoolListener, AlgorithmStats,
    AlgorithmStrategy, Candidate, RandomAlgorithmStrategy, WeightedAlgorithmStrategy,
};
pub use schedule::{AlgorithmSchedule, AlgorithmScheduleListener};
pub use scoreboard::{
    ChannelScoreBoardListener, CountingScoreBoardListener, EfficiencyEntry,
    LoggingScoreBoardListener, ScoreBoard, ScoreBoardEvent, ScoreBoardListener,
};
pub use solver::{SolveOutcome, Solver, SolverHandle};
pub use stopper::{
    and_stopper, or_stoppers, AndStopper, FlatOptimizationStopper, ImmediateStopper,
    MaxElapsedTimeStopper, MaxEvaluationsStopper, MaxOptimalSolutionsStopper,
    MinMaxTimeSatisfactionStopper, MinSatisfactionStopper, OrStopper, Stopper,
};

#[cfg(test)]
pub(crate) mod test_utils;
