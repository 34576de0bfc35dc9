//! Instrumented evaluators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trialforge_core::{Evaluator, Result, Trial, TrialForgeError, Veto};

/// Wraps an evaluator and counts its calls.
///
/// Clones share the counter, so a clone kept by the test observes the calls
/// made through the problem.
#[derive(Clone)]
pub struct CountingEvaluator {
    inner: Arc<dyn Evaluator>,
    calls: Arc<AtomicUsize>,
}

impl CountingEvaluator {
    pub fn new(inner: Arc<dyn Evaluator>) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Evaluator for CountingEvaluator {
    fn evaluate(&self, trial: &mut Trial) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.evaluate(trial)
    }
}

/// Vetoes every trial as infeasible.
#[derive(Debug, Clone)]
pub struct VetoingEvaluator {
    reason: String,
}

impl VetoingEvaluator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for VetoingEvaluator {
    fn default() -> Self {
        Self::new("infeasible")
    }
}

impl Evaluator for VetoingEvaluator {
    fn evaluate(&self, trial: &mut Trial) -> Result<()> {
        trial.veto_trial(Veto::new(self.reason.clone()));
        Ok(())
    }
}

/// Fails every evaluation with [`TrialForgeError::Evaluation`].
#[derive(Debug, Clone)]
pub struct FailingEvaluator {
    message: String,
}

impl FailingEvaluator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Evaluator for FailingEvaluator {
    fn evaluate(&self, _trial: &mut Trial) -> Result<()> {
        Err(TrialForgeError::Evaluation(self.message.clone()))
    }
}
