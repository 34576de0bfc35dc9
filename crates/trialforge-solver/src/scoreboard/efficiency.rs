//! Rolling per-algorithm efficiency windows.

use std::collections::BTreeMap;

use tracing::info;

/// Efficiency of one algorithm over one logging window.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyEntry {
    /// Scoreboard evaluation count when the window closed.
    pub total_evaluations: u64,
    pub label: String,
    /// Trials the algorithm scored within the window.
    pub evaluations: u64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    evaluations: u64,
    initial_satisfaction: f64,
    final_satisfaction: f64,
}

/// Measures how much each algorithm improves satisfaction per evaluation.
///
/// Every `evaluations_step` scored trials the logger closes a window. For
/// each algorithm seen in the window the efficiency is
/// `(final - initial) / ((1 - initial) * evaluations)` where `initial` is the
/// satisfaction of the algorithm's first trial in the window and `final` its
/// best one.
#[derive(Debug, Clone)]
pub struct EfficiencyLogger {
    evaluations_step: u64,
    pending_evaluations: u64,
    windows: BTreeMap<String, Window>,
    history: Vec<EfficiencyEntry>,
}

impl EfficiencyLogger {
    /// Creates a logger; a zero step falls back to 1000.
    pub fn new(evaluations_step: u64) -> Self {
        Self {
            evaluations_step: if evaluations_step > 0 {
                evaluations_step
            } else {
                1000
            },
            pending_evaluations: 0,
            windows: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    pub fn evaluations_step(&self) -> u64 {
        self.evaluations_step
    }

    /// Closed windows, oldest first.
    pub fn history(&self) -> &[EfficiencyEntry] {
        &self.history
    }

    pub fn reset(&mut self) {
        self.pending_evaluations = 0;
        self.windows.clear();
        self.history.clear();
    }

    /// Records one scored trial of `label`.
    pub fn record(&mut self, label: &str, satisfaction: f64, total_evaluations: u64) {
        self.pending_evaluations += 1;

        match self.windows.get_mut(label) {
            Some(window) => {
                window.evaluations += 1;
                if satisfaction > window.final_satisfaction {
                    window.final_satisfaction = satisfaction;
                }
            }
            None => {
                self.windows.insert(
                    label.to_string(),
                    Window {
                        evaluations: 1,
                        initial_satisfaction: satisfaction,
                        final_satisfaction: satisfaction,
                    },
                );
            }
        }

        if self.pending_evaluations >= self.evaluations_step {
            self.close_window(total_evaluations);
        }
    }

    fn close_window(&mut self, total_evaluations: u64) {
        for (label, window) in std::mem::take(&mut self.windows) {
            let efficiency = efficiency(&window);
            info!(
                event = "efficiency",
                total_evaluations = total_evaluations,
                algorithm = %label,
                evaluations = window.evaluations,
                efficiency = efficiency,
            );
            self.history.push(EfficiencyEntry {
                total_evaluations,
                label,
                evaluations: window.evaluations,
                efficiency,
            });
        }
        self.pending_evaluations = 0;
    }
}

fn efficiency(window: &Window) -> f64 {
    let headroom = 1.0 - window.initial_satisfaction;
    if window.evaluations == 0 || headroom <= 0.0 {
        return 0.0;
    }
    (window.final_satisfaction - window.initial_satisfaction)
        / (headroom * window.evaluations as f64)
}
