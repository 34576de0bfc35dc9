//! Unconditional stop.

use super::Stopper;
use crate::scoreboard::ScoreBoard;

/// Stops before the next algorithm run, whatever the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateStopper;

impl Stopper for ImmediateStopper {
    fn should_stop(&self, _score_board: &ScoreBoard) -> bool {
        true
    }
}
