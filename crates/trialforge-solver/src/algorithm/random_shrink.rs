//! Random search in shrinking windows around the best point.

use std::sync::Arc;

use rand::Rng;
use trialforge_core::{Problem, Result, Trial, TrialPoint, Variable};

use super::{perturb, uniform, AlgorithmRun, InitialAlgorithm, SearchAlgorithm};

/// Share of re-sampled variables drawn from their full limits.
const GLOBAL_SHARE: f64 = 0.1;

/// Window half-width, in multiples of the last improving step.
const WINDOW_FACTOR: f64 = 3.0;

/// Share of the remaining satisfaction by which the solve's best must beat
/// the algorithm's own best before it is adopted.
const ADOPTION_MARGIN: f64 = 0.25;

/// Random search whose sampling windows follow its own improvements.
///
/// Each re-sampled variable is drawn from its own window nine times in ten
/// and from its full limits otherwise. When a proposal improves on the
/// algorithm's best point, each changed variable's window becomes three
/// times the size of the change, centred on the new value and clipped to
/// the variable's limits. At the end of a run the algorithm jumps to the
/// solve's best solution if it is clearly better, shifting its windows
/// there without resizing them.
#[derive(Debug, Clone)]
pub struct RandomShrinkSearch {
    label: String,
    problem: Option<Arc<Problem>>,
    windows: Vec<(f64, f64)>,
    best_point: Vec<f64>,
    best_satisfaction: f64,
    should_shift: bool,
}

impl RandomShrinkSearch {
    pub const LABEL: &'static str = "random_shrink";

    pub fn new() -> Self {
        Self {
            label: Self::LABEL.to_string(),
            problem: None,
            windows: Vec::new(),
            best_point: Vec::new(),
            best_satisfaction: 0.0,
            should_shift: false,
        }
    }

    /// Current sampling windows, in variable order.
    pub fn windows(&self) -> &[(f64, f64)] {
        &self.windows
    }

    fn initialize(&mut self, variables: &[Variable]) {
        self.windows = variables
            .iter()
            .map(|v| (v.lower_limit(), v.upper_limit()))
            .collect();
        self.best_point = variables.iter().map(Variable::initial_value).collect();
        self.best_satisfaction = 0.0;
        self.should_shift = false;
    }

    fn adopt(&mut self, variables: &[Variable], point: Vec<f64>, satisfaction: f64) {
        let shift = std::mem::take(&mut self.should_shift);
        for (index, variable) in variables.iter().enumerate() {
            let value = point[index];
            let (lower, upper) = self.windows[index];
            let half_width = if shift {
                (upper - lower) / 2.0
            } else {
                let change = (value - self.best_point[index]).abs();
                if change == 0.0 {
                    continue;
                }
                WINDOW_FACTOR * change
            };
            self.windows[index] = (
                (value - half_width).max(variable.lower_limit()),
                (value + half_width).min(variable.upper_limit()),
            );
        }
        self.best_point = point;
        self.best_satisfaction = satisfaction;
    }
}

/// New value for the variable at `index`, drawn from its window or, for a
/// [`GLOBAL_SHARE`] of the draws, from its full limits.
pub(super) fn sample_variable<R: Rng + ?Sized>(
    rng: &mut R,
    windows: &[(f64, f64)],
    index: usize,
    variable: &Variable,
) -> f64 {
    if rng.random::<f64>() < GLOBAL_SHARE {
        uniform(rng, variable.lower_limit(), variable.upper_limit())
    } else {
        let (lower, upper) = windows[index];
        uniform(rng, lower, upper)
    }
}

impl Default for RandomShrinkSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for RandomShrinkSearch {
    fn label(&self) -> &str {
        &self.label
    }

    fn set_problem(&mut self, problem: &Arc<Problem>) {
        self.problem = Some(Arc::clone(problem));
        self.initialize(problem.variables());
    }

    fn reset(&mut self) {
        if let Some(problem) = self.problem.clone() {
            self.initialize(problem.variables());
        }
    }

    fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()> {
        let problem = Arc::clone(run.problem());
        let variables = problem.variables();
        if self.windows.len() != variables.len() {
            self.initialize(variables);
        }

        while run.has_next() {
            let last_evaluation = run.remaining_count() == 1;
            let base = TrialPoint::from_coordinates(variables, &self.best_point);
            let windows = &self.windows;
            let point = perturb(run.rng(), variables, &base, |rng, index, variable| {
                sample_variable(rng, windows, index, variable)
            });

            let trial = run.evaluate_trial_point(point)?;
            if trial.is_vetoed() {
                continue;
            }
            if trial.satisfaction() >= self.best_satisfaction {
                let point = trial.trial_point().to_coordinates(variables)?;
                self.adopt(variables, point, trial.satisfaction());
            }

            if last_evaluation {
                let margin = ADOPTION_MARGIN * (1.0 - self.best_satisfaction);
                let global_best = run
                    .best_solution()
                    .filter(|best| best.satisfaction() > self.best_satisfaction + margin)
                    .map(|best| (best.trial_point().clone(), best.satisfaction()));
                if let Some((point, satisfaction)) = global_best {
                    self.should_shift = true;
                    let point = point.to_coordinates(variables)?;
                    self.adopt(variables, point, satisfaction);
                }
            }
        }
        Ok(())
    }

    fn found_new_optimal_solution(&mut self, trial: &Trial) {
        if trial.algorithm() != Some(InitialAlgorithm::LABEL) {
            return;
        }
        let variables = trial.problem().variables();
        if self.windows.len() != variables.len() {
            self.initialize(variables);
        }
        if let Ok(point) = trial.trial_point().to_coordinates(variables) {
            self.best_point = point;
            self.best_satisfaction = trial.satisfaction();
        }
    }

    fn global_rating(&self) -> u8 {
        8
    }

    fn local_rating(&self) -> u8 {
        5
    }
}
