//! Satisfaction based stoppers.

use super::Stopper;
use crate::scoreboard::ScoreBoard;

/// Stops once every objective of the best solution reaches a satisfaction.
///
/// Never stops while there is no best solution.
#[derive(Debug, Clone)]
pub struct MinSatisfactionStopper {
    min_satisfaction: f64,
}

impl MinSatisfactionStopper {
    pub fn new(min_satisfaction: f64) -> Self {
        Self { min_satisfaction }
    }

    pub fn min_satisfaction(&self) -> f64 {
        self.min_satisfaction
    }
}

impl Stopper for MinSatisfactionStopper {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        satisfaction_reached(score_board, self.min_satisfaction)
    }
}

pub(super) fn satisfaction_reached(score_board: &ScoreBoard, min_satisfaction: f64) -> bool {
    let Some(best) = score_board.best_solution() else {
        return false;
    };
    let mut scores = best.scores().peekable();
    scores.peek().is_some() && scores.all(|score| score.satisfaction() >= min_satisfaction)
}

/// Stops once the judge holds a given number of equally optimal solutions.
///
/// A growing optimal set means the search keeps finding ties and has
/// reached a plateau.
#[derive(Debug, Clone)]
pub struct FlatOptimizationStopper {
    max_solutions: usize,
}

impl FlatOptimizationStopper {
    pub fn new(max_solutions: usize) -> Self {
        Self { max_solutions }
    }
}

impl Stopper for FlatOptimizationStopper {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        score_board.judge().optimal_solutions().len() >= self.max_solutions
    }
}
