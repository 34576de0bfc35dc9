//! Error types for TrialForge

use thiserror::Error;

/// Main error type for TrialForge operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrialForgeError {
    /// Error in solver or problem configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A satisfaction value fell outside of [0, 1]
    #[error("Satisfaction {value} for {context} is outside of [0, 1]")]
    SatisfactionOutOfRange { context: String, value: f64 },

    /// A score was requested before the evaluator recorded it
    #[error("No score has been recorded for objective '{objective}'")]
    MissingScore { objective: String },

    /// An objective that does not belong to the problem was referenced
    #[error("Unknown objective '{0}'")]
    UnknownObjective(String),

    /// A variable that does not belong to the trial point was referenced
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    /// The evaluator failed to score a trial
    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    /// The current algorithm run was terminated and must be abandoned
    #[error("Algorithm run terminated")]
    RunTerminated,

    /// Invalid operation for current solver state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl TrialForgeError {
    /// Returns true for errors caused by a broken objective or evaluator
    /// implementation. These abort a solve regardless of strictness.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            TrialForgeError::SatisfactionOutOfRange { .. }
                | TrialForgeError::MissingScore { .. }
                | TrialForgeError::UnknownObjective(_)
                | TrialForgeError::UnknownVariable(_)
        )
    }

    /// Returns true for the run termination signal.
    pub fn is_run_termination(&self) -> bool {
        matches!(self, TrialForgeError::RunTerminated)
    }
}

/// Result type alias for TrialForge operations
pub type Result<T> = std::result::Result<T, TrialForgeError>;

/// Checks that `value` lies in [0, 1].
pub fn check_satisfaction(context: impl Into<String>, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TrialForgeError::SatisfactionOutOfRange {
            context: context.into(),
            value,
        })
    }
}
