//! Solution judges decide which trials are optimal.

use std::fmt::Debug;

use trialforge_config::{AggregationKind, JudgeConfig};
use trialforge_core::{Result, Trial};

/// Arbiter of the set of optimal solutions.
///
/// The judge assigns each scored trial its overall satisfaction and reports
/// whether the trial is a new optimal solution. Vetoed trials never reach it.
pub trait SolutionJudge: Send + Debug {
    /// Judges `trial`, returning true if it is a new optimal solution.
    fn judge(&mut self, trial: &mut Trial) -> Result<bool>;

    /// Forgets every optimal solution.
    fn reset(&mut self);

    /// Current optimal solutions, best first.
    fn optimal_solutions(&self) -> &[Trial];
}

/// Combines objective satisfactions into an overall satisfaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Aggregation {
    /// Worst objective.
    #[default]
    Min,
    Mean,
    Product,
}

impl Aggregation {
    /// Aggregates `satisfactions`; an empty input yields 0.
    pub fn aggregate(&self, satisfactions: &[f64]) -> f64 {
        if satisfactions.is_empty() {
            return 0.0;
        }
        match self {
            Aggregation::Min => satisfactions.iter().copied().fold(1.0, f64::min),
            Aggregation::Mean => satisfactions.iter().sum::<f64>() / satisfactions.len() as f64,
            Aggregation::Product => satisfactions.iter().product(),
        }
    }
}

impl From<AggregationKind> for Aggregation {
    fn from(kind: AggregationKind) -> Self {
        match kind {
            AggregationKind::Min => Aggregation::Min,
            AggregationKind::Mean => Aggregation::Mean,
            AggregationKind::Product => Aggregation::Product,
        }
    }
}

/// Judge that ranks trials by aggregated satisfaction.
///
/// A trial strictly better than the current optimum (by more than the
/// tolerance) replaces the optimal set and is reported as new. A tie joins
/// the set without being reported.
///
/// # Example
///
/// ```
/// use trialforge_solver::judge::{Aggregation, SatisfactionSolutionJudge, SolutionJudge};
///
/// let judge = SatisfactionSolutionJudge::new(Aggregation::Mean);
/// assert!(judge.optimal_solutions().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SatisfactionSolutionJudge {
    aggregation: Aggregation,
    tolerance: f64,
    optimal_solutions: Vec<Trial>,
}

impl SatisfactionSolutionJudge {
    pub fn new(aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            tolerance: 1e-9,
            optimal_solutions: Vec::new(),
        }
    }

    pub fn from_config(config: &JudgeConfig) -> Self {
        Self::new(config.aggregation.into()).with_tolerance(config.satisfaction_tolerance)
    }

    /// Satisfactions closer than `tolerance` count as ties.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Overall satisfaction of the optimal set, if any.
    pub fn best_satisfaction(&self) -> Option<f64> {
        self.optimal_solutions.first().map(Trial::satisfaction)
    }
}

impl Default for SatisfactionSolutionJudge {
    fn default() -> Self {
        Self::new(Aggregation::default())
    }
}

impl SolutionJudge for SatisfactionSolutionJudge {
    fn judge(&mut self, trial: &mut Trial) -> Result<bool> {
        let problem = std::sync::Arc::clone(trial.problem());
        let satisfactions = problem
            .objectives()
            .iter()
            .map(|objective| trial.score(objective.name()).map(|score| score.satisfaction()))
            .collect::<Result<Vec<_>>>()?;
        trial.set_satisfaction(self.aggregation.aggregate(&satisfactions))?;

        let satisfaction = trial.satisfaction();
        match self.best_satisfaction() {
            Some(best) if satisfaction > best + self.tolerance => {}
            Some(best) if satisfaction >= best - self.tolerance => {
                self.optimal_solutions.push(trial.clone());
                return Ok(false);
            }
            Some(_) => return Ok(false),
            None => {}
        }

        self.optimal_solutions.clear();
        self.optimal_solutions.push(trial.clone());
        Ok(true)
    }

    fn reset(&mut self) {
        self.optimal_solutions.clear();
    }

    fn optimal_solutions(&self) -> &[Trial] {
        &self.optimal_solutions
    }
}

#[cfg(test)]
#[path = "judge_tests.rs"]
mod tests;
