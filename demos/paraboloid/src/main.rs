//! Paraboloid Example
//!
//! Minimizes `sum((x_i - c_i)^2)` over a handful of variables, where the
//! centers `c_i` are unknown to the solver. The default market lets the
//! bundled algorithms compete for evaluations; the scoreboard summary is
//! printed at the end.
//!
//! Usage: `paraboloid [DIMENSIONS]` (default 4). Every new optimum is logged;
//! `RUST_LOG=trialforge_solver=debug` also shows every algorithm run.

use trialforge::prelude::*;
use trialforge::scoreboard::LoggingScoreBoardListener;
use trialforge::stopper::MinMaxTimeSatisfactionStopper;

use std::sync::Arc;
use std::time::Duration;

const DEFAULT_DIMENSIONS: usize = 4;
const TOLERANCE: f64 = 0.05;

/// Center of the bowl along dimension `index`.
fn center(index: usize) -> f64 {
    (index as f64 * 1.7).sin() * 6.0
}

/// Builds the paraboloid problem with `dimensions` variables in `[-10, 10]`.
fn create_problem(dimensions: usize) -> Problem {
    let variables = (0..dimensions)
        .map(|index| Variable::new(format!("x{index}"), 0.0, -10.0, 10.0))
        .collect();

    ProblemFactory::inverse_square_minimizer(
        variables,
        |trial: &Trial, variables: &[Variable]| {
            variables
                .iter()
                .enumerate()
                .map(|(index, variable)| {
                    let value = trial.trial_point().value_of(variable).unwrap_or(f64::MAX);
                    (value - center(index)).powi(2)
                })
                .sum()
        },
        TOLERANCE,
    )
}

fn main() -> Result<()> {
    trialforge::console::init();

    let dimensions = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .filter(|&dimensions: &usize| dimensions > 0)
        .unwrap_or(DEFAULT_DIMENSIONS);

    // Run for at least a second, at most ten, and stop in between once the
    // objective is 99% satisfied.
    let stopper = OrStopper((
        MinMaxTimeSatisfactionStopper::new(Duration::from_secs(1), Duration::from_secs(10), 0.99),
        MaxEvaluationsStopper::new(200_000),
    ));
    let mut solver = Solver::new(stopper).with_efficiency_log(5_000);
    solver.add_score_board_listener(Arc::new(LoggingScoreBoardListener::with_prefix(
        format!("paraboloid-{dimensions}d"),
    )));

    let outcome = solver.solve(create_problem(dimensions))?;

    println!("{}", solver.score_board().summary());
    println!("{outcome}");
    for index in 0..dimensions {
        println!("  expected x{index} = {:.4}", center(index));
    }
    Ok(())
}
