//! Trials: candidate solutions and their evaluation.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use super::{Objective, Problem, Score, TrialPoint};
use crate::error::{check_satisfaction, Result, TrialForgeError};

/// Marks a trial as infeasible.
///
/// A veto is an outcome, not an error: vetoed trials are counted separately
/// and never reach the solution judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Veto {
    reason: String,
}

impl Veto {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Veto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vetoed: {}", self.reason)
    }
}

/// One candidate solution: a trial point plus its scores.
///
/// Created by the schedule for every proposed trial point, scored by the
/// problem's evaluator, then judged. The overall satisfaction is assigned by
/// the solution judge.
#[derive(Clone)]
pub struct Trial {
    problem: Arc<Problem>,
    trial_point: TrialPoint,
    algorithm: Option<String>,
    scores: BTreeMap<String, Score>,
    veto: Option<Veto>,
    satisfaction: f64,
    custom_info: Option<Arc<dyn Any + Send + Sync>>,
}

impl Trial {
    /// Creates an unscored trial.
    ///
    /// `algorithm` is the label of the algorithm that proposed the point.
    pub fn new(problem: Arc<Problem>, trial_point: TrialPoint, algorithm: Option<String>) -> Self {
        Self {
            problem,
            trial_point,
            algorithm,
            scores: BTreeMap::new(),
            veto: None,
            satisfaction: 0.0,
            custom_info: None,
        }
    }

    pub fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    pub fn trial_point(&self) -> &TrialPoint {
        &self.trial_point
    }

    /// Label of the algorithm that proposed this trial.
    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    /// Shorthand for the trial point's value of the named variable.
    pub fn value(&self, variable: &str) -> Result<f64> {
        self.trial_point.value(variable)
    }

    /// Records `value` for `objective`, replacing any earlier score.
    pub fn set_score(&mut self, objective: &Arc<dyn Objective>, value: f64) -> Result<()> {
        let score = Score::new(Arc::clone(objective), value)?;
        self.record_score(score);
        Ok(())
    }

    /// Records `value` for the problem objective called `objective`.
    pub fn set_score_by_name(&mut self, objective: &str, value: f64) -> Result<()> {
        let objective = self
            .problem
            .objective(objective)
            .cloned()
            .ok_or_else(|| TrialForgeError::UnknownObjective(objective.to_string()))?;
        self.set_score(&objective, value)
    }

    /// Stores a score computed elsewhere, replacing any earlier score.
    pub fn record_score(&mut self, score: Score) {
        self.scores
            .insert(score.objective().name().to_string(), score);
    }

    /// Returns the score recorded for the named objective.
    pub fn score(&self, objective: &str) -> Result<&Score> {
        self.scores
            .get(objective)
            .ok_or_else(|| TrialForgeError::MissingScore {
                objective: objective.to_string(),
            })
    }

    pub fn scores(&self) -> impl Iterator<Item = &Score> {
        self.scores.values()
    }

    /// Returns an error naming the first problem objective without a score.
    pub fn check_scored(&self) -> Result<()> {
        for objective in self.problem.objectives() {
            self.score(objective.name())?;
        }
        Ok(())
    }

    /// Overall satisfaction as assigned by the solution judge.
    pub fn satisfaction(&self) -> f64 {
        self.satisfaction
    }

    /// Sets the overall satisfaction, rejecting values outside of [0, 1].
    pub fn set_satisfaction(&mut self, satisfaction: f64) -> Result<()> {
        self.satisfaction = check_satisfaction("trial", satisfaction)?;
        Ok(())
    }

    pub fn veto_trial(&mut self, veto: Veto) {
        self.veto = Some(veto);
    }

    pub fn is_vetoed(&self) -> bool {
        self.veto.is_some()
    }

    pub fn veto(&self) -> Option<&Veto> {
        self.veto.as_ref()
    }

    pub fn set_custom_info(&mut self, info: Arc<dyn Any + Send + Sync>) {
        self.custom_info = Some(info);
    }

    pub fn custom_info(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.custom_info.as_ref()
    }
}

impl Debug for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trial")
            .field("trial_point", &self.trial_point)
            .field("algorithm", &self.algorithm)
            .field("scores", &self.scores)
            .field("veto", &self.veto)
            .field("satisfaction", &self.satisfaction)
            .finish()
    }
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} satisfaction = {}",
            self.trial_point, self.satisfaction
        )?;
        if let Some(veto) = &self.veto {
            write!(f, " ({veto})")?;
        }
        Ok(())
    }
}
