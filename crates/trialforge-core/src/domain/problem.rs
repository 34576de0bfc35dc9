//! Problems, evaluators and scorers.

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::sync::Arc;

use tracing::warn;

use super::{Objective, Trial, TrialPoint, Variable};
use crate::error::{Result, TrialForgeError};

/// Scores trials for every objective of a problem.
///
/// Implementations must call [`Trial::set_score`] for each objective of the
/// owning problem, or veto the trial to mark it infeasible. An `Err` of kind
/// [`TrialForgeError::Evaluation`] signals a recoverable failure for this
/// trial only.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, trial: &mut Trial) -> Result<()>;
}

impl<F> Evaluator for F
where
    F: Fn(&mut Trial) -> Result<()> + Send + Sync,
{
    fn evaluate(&self, trial: &mut Trial) -> Result<()> {
        self(trial)
    }
}

/// Computes a single raw value for a trial.
///
/// Used by single objective problems assembled through
/// [`ProblemFactory`](crate::ProblemFactory).
pub trait Scorer: Send + Sync {
    fn score(&self, trial: &Trial, variables: &[Variable]) -> f64;
}

impl<F> Scorer for F
where
    F: Fn(&Trial, &[Variable]) -> f64 + Send + Sync,
{
    fn score(&self, trial: &Trial, variables: &[Variable]) -> f64 {
        self(trial, variables)
    }
}

/// Evaluator that runs one scorer and records its value for one objective.
pub struct ScorerEvaluator<S: Scorer> {
    scorer: S,
    objective: Arc<dyn Objective>,
}

impl<S: Scorer> ScorerEvaluator<S> {
    pub fn new(scorer: S, objective: Arc<dyn Objective>) -> Self {
        Self { scorer, objective }
    }
}

impl<S: Scorer> Evaluator for ScorerEvaluator<S> {
    fn evaluate(&self, trial: &mut Trial) -> Result<()> {
        let value = {
            let problem = Arc::clone(trial.problem());
            self.scorer.score(trial, problem.variables())
        };
        trial.set_score(&self.objective, value)
    }
}

/// Variables, objectives and the evaluator that scores trials against them.
///
/// Immutable once built and shared between trials through an `Arc`.
pub struct Problem {
    variables: Vec<Variable>,
    objectives: Vec<Arc<dyn Objective>>,
    evaluator: Arc<dyn Evaluator>,
}

impl Problem {
    pub fn new(
        variables: Vec<Variable>,
        objectives: Vec<Arc<dyn Objective>>,
        evaluator: Arc<dyn Evaluator>,
    ) -> Self {
        Self {
            variables,
            objectives,
            evaluator,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn objectives(&self) -> &[Arc<dyn Objective>] {
        &self.objectives
    }

    pub fn evaluator(&self) -> &Arc<dyn Evaluator> {
        &self.evaluator
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    pub fn objective(&self, name: &str) -> Option<&Arc<dyn Objective>> {
        self.objectives.iter().find(|o| o.name() == name)
    }

    /// Runs the evaluator on `trial`.
    pub fn evaluate(&self, trial: &mut Trial) -> Result<()> {
        self.evaluator.evaluate(trial)
    }

    /// Trial point holding every variable's initial value.
    pub fn generate_initial_trial_point(&self) -> TrialPoint {
        TrialPoint::from_initial_values(&self.variables)
    }

    /// Checks that the problem can be solved.
    ///
    /// Requires at least one variable and one objective and unique names.
    /// Variables whose initial value lies outside their limits are accepted
    /// but logged.
    pub fn validate(&self) -> Result<()> {
        if self.variables.is_empty() {
            return Err(TrialForgeError::Config(
                "problem must have at least one variable".to_string(),
            ));
        }
        if self.objectives.is_empty() {
            return Err(TrialForgeError::Config(
                "problem must have at least one objective".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for variable in &self.variables {
            if !names.insert(variable.name()) {
                return Err(TrialForgeError::Config(format!(
                    "duplicate variable name '{}'",
                    variable.name()
                )));
            }
            if !variable.is_consistent() {
                warn!(
                    event = "inconsistent_variable",
                    variable = variable.name(),
                    initial_value = variable.initial_value(),
                    lower_limit = variable.lower_limit(),
                    upper_limit = variable.upper_limit(),
                );
            }
        }

        let mut names = HashSet::new();
        for objective in &self.objectives {
            if !names.insert(objective.name()) {
                return Err(TrialForgeError::Config(format!(
                    "duplicate objective name '{}'",
                    objective.name()
                )));
            }
        }
        Ok(())
    }
}

impl Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("variables", &self.variables)
            .field("objectives", &self.objectives)
            .finish()
    }
}
