//! Scoreboard listeners.
//!
//! Listeners are called synchronously, in registration order, after the
//! scoreboard has updated its counters, so they observe consistent state.

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, info};
use trialforge_core::Trial;

use super::ScoreBoard;

/// Receives scoreboard notifications.
pub trait ScoreBoardListener: Send + Sync + Debug {
    /// Called after a trial was scored and judged.
    fn trial_scored(&self, _score_board: &ScoreBoard, _trial: &Trial) {}

    /// Called after a trial was vetoed.
    fn trial_vetoed(&self, _score_board: &ScoreBoard, _trial: &Trial) {}

    /// Called when the judge reports a new optimal solution.
    fn new_optimal_solution(&self, _score_board: &ScoreBoard, _trial: &Trial) {}
}

/// A listener that logs scoreboard events through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingScoreBoardListener {
    prefix: String,
}

impl LoggingScoreBoardListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logging listener with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ScoreBoardListener for LoggingScoreBoardListener {
    fn trial_vetoed(&self, score_board: &ScoreBoard, trial: &Trial) {
        debug!(
            event = "trial_vetoed",
            prefix = %self.prefix,
            algorithm = trial.algorithm().unwrap_or("-"),
            reason = trial.veto().map(|veto| veto.reason()).unwrap_or(""),
            vetoes = score_board.vetoes(),
        );
    }

    fn new_optimal_solution(&self, score_board: &ScoreBoard, trial: &Trial) {
        info!(
            event = "optimal_solution",
            prefix = %self.prefix,
            algorithm = trial.algorithm().unwrap_or("-"),
            satisfaction = trial.satisfaction(),
            evaluations = score_board.evaluations(),
            point = %trial.trial_point(),
        );
    }
}

/// A counting listener that tracks event occurrences.
///
/// Useful for testing and statistics collection.
#[derive(Debug, Default)]
pub struct CountingScoreBoardListener {
    scored_count: AtomicUsize,
    vetoed_count: AtomicUsize,
    optimal_count: AtomicUsize,
}

impl CountingScoreBoardListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scored_count(&self) -> usize {
        self.scored_count.load(Ordering::SeqCst)
    }

    pub fn vetoed_count(&self) -> usize {
        self.vetoed_count.load(Ordering::SeqCst)
    }

    pub fn optimal_count(&self) -> usize {
        self.optimal_count.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.scored_count.store(0, Ordering::SeqCst);
        self.vetoed_count.store(0, Ordering::SeqCst);
        self.optimal_count.store(0, Ordering::SeqCst);
    }
}

impl ScoreBoardListener for CountingScoreBoardListener {
    fn trial_scored(&self, _score_board: &ScoreBoard, _trial: &Trial) {
        self.scored_count.fetch_add(1, Ordering::SeqCst);
    }

    fn trial_vetoed(&self, _score_board: &ScoreBoard, _trial: &Trial) {
        self.vetoed_count.fetch_add(1, Ordering::SeqCst);
    }

    fn new_optimal_solution(&self, _score_board: &ScoreBoard, _trial: &Trial) {
        self.optimal_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Scoreboard progress streamed to another task or thread.
#[derive(Debug, Clone)]
pub enum ScoreBoardEvent {
    TrialScored {
        algorithm: Option<String>,
        satisfaction: f64,
        evaluations: u64,
    },
    TrialVetoed {
        algorithm: Option<String>,
        reason: String,
        vetoes: u64,
    },
    NewOptimalSolution {
        trial: Trial,
        optimal_solutions_found: u64,
    },
}

/// Forwards scoreboard events through an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
///
/// # Example
///
/// ```
/// use trialforge_solver::scoreboard::ChannelScoreBoardListener;
///
/// let (listener, mut receiver) = ChannelScoreBoardListener::new();
/// drop(listener);
/// assert!(receiver.try_recv().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ChannelScoreBoardListener {
    sender: mpsc::UnboundedSender<ScoreBoardEvent>,
    optimal_only: bool,
}

impl ChannelScoreBoardListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScoreBoardEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender,
                optimal_only: false,
            },
            receiver,
        )
    }

    /// Creates a listener that only forwards new optimal solutions.
    pub fn optimal_only() -> (Self, mpsc::UnboundedReceiver<ScoreBoardEvent>) {
        let (mut listener, receiver) = Self::new();
        listener.optimal_only = true;
        (listener, receiver)
    }
}

impl ScoreBoardListener for ChannelScoreBoardListener {
    fn trial_scored(&self, score_board: &ScoreBoard, trial: &Trial) {
        if self.optimal_only {
            return;
        }
        let _ = self.sender.send(ScoreBoardEvent::TrialScored {
            algorithm: trial.algorithm().map(str::to_string),
            satisfaction: trial.satisfaction(),
            evaluations: score_board.evaluations(),
        });
    }

    fn trial_vetoed(&self, score_board: &ScoreBoard, trial: &Trial) {
        if self.optimal_only {
            return;
        }
        let _ = self.sender.send(ScoreBoardEvent::TrialVetoed {
            algorithm: trial.algorithm().map(str::to_string),
            reason: trial
                .veto()
                .map(|veto| veto.reason().to_string())
                .unwrap_or_default(),
            vetoes: score_board.vetoes(),
        });
    }

    fn new_optimal_solution(&self, score_board: &ScoreBoard, trial: &Trial) {
        let _ = self.sender.send(ScoreBoardEvent::NewOptimalSolution {
            trial: trial.clone(),
            optimal_solutions_found: score_board.optimal_solutions_found(),
        });
    }
}
