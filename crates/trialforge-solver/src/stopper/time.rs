//! Time based stoppers.

use std::time::Duration;

use super::satisfaction::satisfaction_reached;
use super::Stopper;
use crate::scoreboard::ScoreBoard;

/// Stops after a wall-clock limit.
///
/// The limit is only checked between runs, so a solve overshoots it by at
/// most one run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use trialforge_solver::stopper::MaxElapsedTimeStopper;
///
/// let stopper = MaxElapsedTimeStopper::new(Duration::from_secs(30));
/// let stopper = MaxElapsedTimeStopper::seconds(30.0);
/// let stopper = MaxElapsedTimeStopper::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct MaxElapsedTimeStopper {
    limit: Duration,
}

impl MaxElapsedTimeStopper {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Negative or non-finite values stop immediately.
    pub fn seconds(secs: f64) -> Self {
        Self::new(Duration::try_from_secs_f64(secs).unwrap_or_default())
    }
}

impl Stopper for MaxElapsedTimeStopper {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        score_board.elapsed() >= self.limit
    }
}

/// Never stops before `min`, always stops at `max`, and in between stops as
/// soon as every objective of the best solution reaches the target.
#[derive(Debug, Clone)]
pub struct MinMaxTimeSatisfactionStopper {
    min: Duration,
    max: Duration,
    min_satisfaction: f64,
}

impl MinMaxTimeSatisfactionStopper {
    pub fn new(min: Duration, max: Duration, min_satisfaction: f64) -> Self {
        Self {
            min,
            max,
            min_satisfaction,
        }
    }
}

impl Stopper for MinMaxTimeSatisfactionStopper {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        let elapsed = score_board.elapsed();
        if elapsed < self.min {
            return false;
        }
        elapsed >= self.max || satisfaction_reached(score_board, self.min_satisfaction)
    }
}
