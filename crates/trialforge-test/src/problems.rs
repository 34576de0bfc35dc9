//! Benchmark problems.
//!
//! Every problem here has its optimum at the origin, where the objective's
//! satisfaction is exactly 1.

use std::sync::Arc;

use trialforge_core::{
    CurveObjective, Evaluator, Objective, Problem, ProblemFactory, Result, SatisfactionCurve,
    Trial, Variable, DEFAULT_OBJECTIVE_NAME,
};

use crate::evaluators::{FailingEvaluator, VetoingEvaluator};

/// Tolerance of the benchmark objectives: a score of 0.1 is 90% satisfying.
pub const TOLERANCE: f64 = 0.1;

/// One variable `x` in `[-10, 10]` starting at `initial`, scored `|x|`
/// through an inverse square curve.
pub fn abs_problem(initial: f64) -> Problem {
    ProblemFactory::inverse_square_minimizer(
        vec![Variable::new("x", initial, -10.0, 10.0)],
        |trial: &Trial, _: &[Variable]| trial.value("x").map(f64::abs).unwrap_or(f64::MAX),
        TOLERANCE,
    )
}

/// `dimensions` variables `x0..` in `[-10, 10]` starting at 5, scored by
/// the sum of squares.
pub fn paraboloid(dimensions: usize) -> Problem {
    let variables = (0..dimensions)
        .map(|index| Variable::new(format!("x{index}"), 5.0, -10.0, 10.0))
        .collect();
    ProblemFactory::inverse_square_minimizer(variables, sum_of_squares, TOLERANCE)
}

fn sum_of_squares(trial: &Trial, variables: &[Variable]) -> f64 {
    variables
        .iter()
        .map(|variable| trial.trial_point().value_of(variable).unwrap_or(f64::MAX))
        .map(|value| value * value)
        .sum()
}

/// Builds a one-variable problem around an arbitrary evaluator.
pub fn problem_with_evaluator(evaluator: Arc<dyn Evaluator>) -> Problem {
    let objective: Arc<dyn Objective> = Arc::new(CurveObjective::new(
        DEFAULT_OBJECTIVE_NAME,
        SatisfactionCurve::InverseSquare {
            tolerance: TOLERANCE,
        },
    ));
    Problem::new(
        vec![Variable::new("x", 1.0, -10.0, 10.0)],
        vec![objective],
        evaluator,
    )
}

/// A problem whose evaluator vetoes every trial.
pub fn vetoing_problem() -> Problem {
    problem_with_evaluator(Arc::new(VetoingEvaluator::default()))
}

/// A problem whose evaluator fails on every trial.
pub fn failing_problem() -> Problem {
    problem_with_evaluator(Arc::new(FailingEvaluator::new("simulation diverged")))
}

/// Variables `a` and `b` in `[0, 1]`, each scored by itself through a
/// linear rising objective of the same name.
///
/// The satisfaction of each objective equals the value of its variable,
/// which makes aggregation easy to check.
pub fn two_objective_problem() -> Problem {
    let curve = SatisfactionCurve::LinearRising { min: 0.0, max: 1.0 };
    let objectives: Vec<Arc<dyn Objective>> = ["a", "b"]
        .into_iter()
        .map(|name| Arc::new(CurveObjective::new(name, curve)) as Arc<dyn Objective>)
        .collect();
    let evaluator: Arc<dyn Evaluator> = Arc::new(|trial: &mut Trial| -> Result<()> {
        let a = trial.value("a")?;
        let b = trial.value("b")?;
        trial.set_score_by_name("a", a)?;
        trial.set_score_by_name("b", b)
    });
    Problem::new(
        vec![
            Variable::new("a", 0.5, 0.0, 1.0),
            Variable::new("b", 0.5, 0.0, 1.0),
        ],
        objectives,
        evaluator,
    )
}
