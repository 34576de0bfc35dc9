//! Convenience constructors for single objective problems.
//!
//! Each constructor binds a satisfaction curve to one objective and wraps a
//! [`Scorer`] in an evaluator, so callers only supply the variables and the
//! raw score function.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use trialforge_core::{ProblemFactory, Trial, Variable};
//!
//! let variables = vec![Variable::new("x", 3.0, -10.0, 10.0)];
//! let problem = ProblemFactory::inverse_square_minimizer(
//!     variables,
//!     |trial: &Trial, _: &[Variable]| trial.value("x").unwrap_or(f64::MAX).abs(),
//!     0.1,
//! );
//!
//! assert_eq!(problem.objectives().len(), 1);
//! assert!(problem.validate().is_ok());
//! ```

use std::sync::Arc;

use crate::domain::{
    CurveObjective, Objective, Problem, Scorer, ScorerEvaluator, Trial, Variable,
};
use crate::satisfaction::SatisfactionCurve;

/// Name given to the objective of problems built by [`ProblemFactory`].
pub const DEFAULT_OBJECTIVE_NAME: &str = "score";

/// Builds common single objective problems.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemFactory;

impl ProblemFactory {
    /// Assembles a problem whose only objective is `objective`, scored by `scorer`.
    pub fn single_objective<S>(
        variables: Vec<Variable>,
        scorer: S,
        objective: Arc<dyn Objective>,
    ) -> Problem
    where
        S: Scorer + 'static,
    {
        let evaluator = ScorerEvaluator::new(scorer, Arc::clone(&objective));
        Problem::new(variables, vec![objective], Arc::new(evaluator))
    }

    /// Assembles a problem whose only objective follows `curve`.
    pub fn with_curve<S>(variables: Vec<Variable>, scorer: S, curve: SatisfactionCurve) -> Problem
    where
        S: Scorer + 'static,
    {
        let objective: Arc<dyn Objective> =
            Arc::new(CurveObjective::new(DEFAULT_OBJECTIVE_NAME, curve));
        Self::single_objective(variables, scorer, objective)
    }

    /// Drives the score towards zero; a score equal to `tolerance` is 90% satisfying.
    pub fn inverse_square_minimizer<S>(variables: Vec<Variable>, scorer: S, tolerance: f64) -> Problem
    where
        S: Scorer + 'static,
    {
        Self::with_curve(
            variables,
            scorer,
            SatisfactionCurve::InverseSquare { tolerance },
        )
    }

    /// Like [`inverse_square_minimizer`](Self::inverse_square_minimizer) with a
    /// heavier tail.
    pub fn inverse_minimizer<S>(variables: Vec<Variable>, scorer: S, tolerance: f64) -> Problem
    where
        S: Scorer + 'static,
    {
        Self::with_curve(variables, scorer, SatisfactionCurve::Inverse { tolerance })
    }

    /// Drives a non-negative score upwards.
    pub fn inverse_rising_maximizer<S>(variables: Vec<Variable>, scorer: S, tolerance: f64) -> Problem
    where
        S: Scorer + 'static,
    {
        Self::with_curve(
            variables,
            scorer,
            SatisfactionCurve::InverseRising { tolerance },
        )
    }

    /// Drives the score towards `target`.
    ///
    /// The recorded score value is the distance `score - target`.
    pub fn target_value<S>(
        variables: Vec<Variable>,
        scorer: S,
        target: f64,
        tolerance: f64,
    ) -> Problem
    where
        S: Scorer + 'static,
    {
        let offset = move |trial: &Trial, variables: &[Variable]| -> f64 {
            scorer.score(trial, variables) - target
        };
        Self::with_curve(
            variables,
            offset,
            SatisfactionCurve::InverseSquare { tolerance },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_scorer(trial: &Trial, _: &[Variable]) -> f64 {
        trial.value("x").unwrap_or(f64::MAX)
    }

    fn evaluate(problem: Problem, x: f64) -> f64 {
        let problem = Arc::new(problem);
        let variables = problem.variables().to_vec();
        let point = crate::domain::TrialPoint::from_coordinates(&variables, &[x]);
        let mut trial = Trial::new(Arc::clone(&problem), point, None);
        problem.evaluate(&mut trial).unwrap();
        trial.score(DEFAULT_OBJECTIVE_NAME).unwrap().satisfaction()
    }

    fn variables() -> Vec<Variable> {
        vec![Variable::new("x", 0.0, -10.0, 10.0)]
    }

    #[test]
    fn test_inverse_square_minimizer() {
        assert_eq!(
            evaluate(ProblemFactory::inverse_square_minimizer(variables(), x_scorer, 0.1), 0.0),
            1.0
        );
        let s = evaluate(ProblemFactory::inverse_square_minimizer(variables(), x_scorer, 0.1), 0.1);
        assert!((s - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_inverse_rising_maximizer_prefers_large_scores() {
        let low = evaluate(ProblemFactory::inverse_rising_maximizer(variables(), x_scorer, 0.5), 0.5);
        let high = evaluate(ProblemFactory::inverse_rising_maximizer(variables(), x_scorer, 0.5), 5.0);
        assert!(high > low);
    }

    #[test]
    fn test_target_value() {
        let at_target = evaluate(ProblemFactory::target_value(variables(), x_scorer, 2.0, 0.1), 2.0);
        let away = evaluate(ProblemFactory::target_value(variables(), x_scorer, 2.0, 0.1), 3.0);
        assert_eq!(at_target, 1.0);
        assert!(away < 0.1);
    }
}
