//! Objectives and scores.

use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::error::{check_satisfaction, Result};
use crate::satisfaction::SatisfactionCurve;

/// A measurable quantity together with the policy mapping its raw value onto
/// a satisfaction in [0, 1].
///
/// Returning a value outside of [0, 1] is a contract violation; it is
/// rejected when the score is recorded on a trial.
pub trait Objective: Send + Sync + Debug {
    /// Unique name of the objective within its problem.
    fn name(&self) -> &str;

    /// Maps a raw value onto a satisfaction in [0, 1].
    fn satisfaction(&self, value: f64) -> f64;
}

/// Objective whose satisfaction follows one of the built-in curves.
///
/// # Examples
///
/// ```
/// use trialforge_core::{CurveObjective, Objective, SatisfactionCurve};
///
/// let objective = CurveObjective::new("error", SatisfactionCurve::InverseSquare { tolerance: 0.1 });
/// assert_eq!(objective.satisfaction(0.0), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CurveObjective {
    name: String,
    curve: SatisfactionCurve,
}

impl CurveObjective {
    pub fn new(name: impl Into<String>, curve: SatisfactionCurve) -> Self {
        Self {
            name: name.into(),
            curve,
        }
    }

    pub fn curve(&self) -> &SatisfactionCurve {
        &self.curve
    }
}

impl Objective for CurveObjective {
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfaction(&self, value: f64) -> f64 {
        self.curve.satisfaction(value)
    }
}

/// Objective backed by a closure.
pub struct FnObjective<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    name: String,
    satisfaction_fn: F,
}

impl<F> FnObjective<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, satisfaction_fn: F) -> Self {
        Self {
            name: name.into(),
            satisfaction_fn,
        }
    }
}

impl<F> Debug for FnObjective<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjective")
            .field("name", &self.name)
            .finish()
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn satisfaction(&self, value: f64) -> f64 {
        (self.satisfaction_fn)(value)
    }
}

/// Raw value of an objective and the satisfaction derived from it.
#[derive(Debug, Clone)]
pub struct Score {
    objective: Arc<dyn Objective>,
    value: f64,
    satisfaction: f64,
}

impl Score {
    /// Scores `value` against `objective`.
    ///
    /// Fails if the objective maps the value outside of [0, 1].
    pub fn new(objective: Arc<dyn Objective>, value: f64) -> Result<Self> {
        let satisfaction = check_satisfaction(
            format!("objective '{}'", objective.name()),
            objective.satisfaction(value),
        )?;
        Ok(Self {
            objective,
            value,
            satisfaction,
        })
    }

    pub fn objective(&self) -> &Arc<dyn Objective> {
        &self.objective
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn satisfaction(&self) -> f64 {
        self.satisfaction
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {}, satisfaction = {}",
            self.objective.name(),
            self.value,
            self.satisfaction
        )
    }
}
