//! Search algorithms and the runs that drive them.
//!
//! An algorithm never talks to the schedule directly: the schedule lends it
//! an [`AlgorithmRun`] holding an evaluation budget, and the algorithm
//! proposes trial points through that run until the budget is spent.

mod initial;
mod random;
mod random_shrink;
mod run;
mod simplex;

use std::fmt::Debug;
use std::sync::Arc;

use rand::Rng;
use trialforge_core::{MutableTrialPoint, Problem, Result, Trial, TrialPoint, Variable};

pub use initial::InitialAlgorithm;
pub use random::RandomSearch;
pub use random_shrink::RandomShrinkSearch;
pub(crate) use run::RunContext;
pub use run::AlgorithmRun;
pub use simplex::SimplexSearch;

/// A pluggable search strategy.
///
/// # Example
///
/// ```
/// use trialforge_core::Result;
/// use trialforge_solver::algorithm::{AlgorithmRun, SearchAlgorithm};
///
/// #[derive(Debug)]
/// struct StayAtHome;
///
/// impl SearchAlgorithm for StayAtHome {
///     fn label(&self) -> &str {
///         "stay-at-home"
///     }
///
///     fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()> {
///         while run.has_next() {
///             let point = run.problem().generate_initial_trial_point();
///             run.evaluate_trial_point(point)?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait SearchAlgorithm: Send + Debug {
    /// Unique label, used for statistics and provenance.
    fn label(&self) -> &str;

    /// Binds the problem of the coming solve.
    fn set_problem(&mut self, _problem: &Arc<Problem>) {}

    /// Clears search state before a solve.
    fn reset(&mut self) {}

    /// Proposes trial points until the run's budget is spent.
    ///
    /// Errors from [`AlgorithmRun::evaluate_trial_point`] should be
    /// propagated unchanged.
    fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()>;

    /// Called after every run (of any algorithm) that produced a new
    /// optimal solution, once per solution.
    fn found_new_optimal_solution(&mut self, _trial: &Trial) {}

    /// Called before any algorithm starts a run.
    fn algorithm_run_will_execute(&mut self, _label: &str) {}

    /// Called after any algorithm finished a run.
    fn algorithm_run_executed(&mut self, _label: &str) {}

    /// Whether this algorithm must execute the first run of each solve.
    fn claims_first_run(&self) -> bool {
        false
    }

    /// Whether the algorithm has nothing left to propose.
    ///
    /// The market stops granting runs to exhausted algorithms until a new
    /// optimal solution or a reset revives them.
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Suitability far from the optimum, 0 to 10.
    fn global_rating(&self) -> u8 {
        5
    }

    /// Suitability close to the optimum, 0 to 10.
    fn local_rating(&self) -> u8 {
        5
    }
}

/// Uniform sample in `[lower, upper)`; degenerate ranges yield `lower`.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lower: f64, upper: f64) -> f64 {
    if upper > lower {
        lower + (upper - lower) * rng.random::<f64>()
    } else {
        lower
    }
}

/// Best point of the solve so far, or the initial point.
pub(crate) fn current_best_point(run: &AlgorithmRun<'_>) -> TrialPoint {
    run.best_solution()
        .map(|trial| trial.trial_point().clone())
        .unwrap_or_else(|| run.problem().generate_initial_trial_point())
}

/// Copies `base`, re-sampling each variable with probability
/// `expected / variables.len()`.
///
/// At least one variable always changes: when none was picked the draw is
/// repeated with a random expected count.
pub(crate) fn perturb<R, F>(
    rng: &mut R,
    variables: &[Variable],
    base: &TrialPoint,
    mut propose: F,
) -> TrialPoint
where
    R: Rng + ?Sized,
    F: FnMut(&mut R, usize, &Variable) -> f64,
{
    let mut point = MutableTrialPoint::new();
    for variable in variables {
        let value = base
            .value_of(variable)
            .unwrap_or_else(|_| variable.initial_value());
        point.set_value(variable, value);
    }
    if variables.is_empty() {
        return point.into_trial_point();
    }

    let count = variables.len();
    let mut expected = 1;
    loop {
        let probability = expected as f64 / count as f64;
        let mut changed = false;
        for (index, variable) in variables.iter().enumerate() {
            if rng.random::<f64>() <= probability {
                changed = true;
                let value = propose(rng, index, variable);
                point.set_value(variable, value);
            }
        }
        if changed {
            return point.into_trial_point();
        }
        expected = rng.random_range(1..=count);
    }
}
