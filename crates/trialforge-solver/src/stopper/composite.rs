//! Composite stoppers (AND/OR).
//!
//! Tuples of concrete stoppers compose without boxing; `Vec<Box<dyn Stopper>>`
//! covers stoppers assembled at runtime, e.g. from configuration.

use super::Stopper;
use crate::scoreboard::ScoreBoard;

/// Combines multiple stoppers with OR logic (any must stop).
///
/// # Examples
///
/// ```
/// use trialforge_solver::stopper::{MaxElapsedTimeStopper, MaxEvaluationsStopper, OrStopper};
///
/// // Stop after 30 seconds OR 1000 evaluations
/// let stopper = OrStopper((
///     MaxElapsedTimeStopper::seconds(30.0),
///     MaxEvaluationsStopper::new(1000),
/// ));
/// ```
#[derive(Debug)]
pub struct OrStopper<T>(pub T);

impl<T> OrStopper<T> {
    pub fn new(stoppers: T) -> Self {
        Self(stoppers)
    }
}

/// Combines multiple stoppers with AND logic (all must stop).
#[derive(Debug)]
pub struct AndStopper<T>(pub T);

impl<T> AndStopper<T> {
    pub fn new(stoppers: T) -> Self {
        Self(stoppers)
    }
}

/// Stops as soon as any of `stoppers` would stop. An empty list never stops.
pub fn or_stoppers(stoppers: Vec<Box<dyn Stopper>>) -> OrStopper<Vec<Box<dyn Stopper>>> {
    OrStopper(stoppers)
}

/// Stops only when both `first` and `second` would stop.
pub fn and_stopper<A: Stopper, B: Stopper>(first: A, second: B) -> AndStopper<(A, B)> {
    AndStopper((first, second))
}

impl Stopper for OrStopper<Vec<Box<dyn Stopper>>> {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        self.0.iter().any(|stopper| stopper.should_stop(score_board))
    }
}

impl Stopper for AndStopper<Vec<Box<dyn Stopper>>> {
    fn should_stop(&self, score_board: &ScoreBoard) -> bool {
        !self.0.is_empty() && self.0.iter().all(|stopper| stopper.should_stop(score_board))
    }
}

macro_rules! impl_composite_stopper {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> Stopper for OrStopper<($($T,)+)>
        where
            $($T: Stopper,)+
        {
            fn should_stop(&self, score_board: &ScoreBoard) -> bool {
                $((self.0).$idx.should_stop(score_board))||+
            }
        }

        impl<$($T),+> Stopper for AndStopper<($($T,)+)>
        where
            $($T: Stopper,)+
        {
            fn should_stop(&self, score_board: &ScoreBoard) -> bool {
                $((self.0).$idx.should_stop(score_board))&&+
            }
        }
    };
}

impl_composite_stopper!(0: T0);
impl_composite_stopper!(0: T0, 1: T1);
impl_composite_stopper!(0: T0, 1: T1, 2: T2);
impl_composite_stopper!(0: T0, 1: T1, 2: T2, 3: T3);
impl_composite_stopper!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_composite_stopper!(0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
