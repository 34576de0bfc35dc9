//! Stoppers decide when a solve ends.
//!
//! The schedule consults its stopper before granting each algorithm run, so
//! the smallest unit of stopping is one run.

mod composite;
mod count;
mod immediate;
mod satisfaction;
mod time;

use std::fmt::Debug;
use std::sync::Arc;

use crate::scoreboard::ScoreBoard;

pub use composite::{and_stopper, or_stoppers, AndStopper, OrStopper};
pub use count::{MaxEvaluationsStopper, MaxOptimalSolutionsStopper};
pub use immediate::ImmediateStopper;
pub use satisfaction::{FlatOptimizationStopper, MinSatisfactionStopper};
pub use time::{MaxElapsedTimeStopper, MinMaxTimeSatisfactionStopper};

/// Trait for determining when to stop solving.
///
/// Stoppers are predicates over the scoreboard and keep no state of their own.
pub trait Stopper: Send + Sync + Debug {
    /// Returns true if solving should stop.
    fn should_stop(&self, score_board: &ScoreBoard) -> bool;
}

impl<T: Stopper + ?Sized> Stopper for Box<T> {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        (**self).should_stop(score_board)
    }
}

impl<T: Stopper + ?Sized> Stopper for Arc<T> {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        (**self).should_stop(score_board)
    }
}
