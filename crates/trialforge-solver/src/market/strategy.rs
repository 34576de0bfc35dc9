//! Policies picking the algorithm of the next run.

use std::fmt::Debug;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::AlgorithmStats;

/// An available algorithm as seen by a strategy.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub label: &'a str,
    pub stats: AlgorithmStats,
    pub global_rating: u8,
    pub local_rating: u8,
}

/// Picks which available algorithm executes the next run.
pub trait AlgorithmStrategy: Send + Debug {
    fn name(&self) -> &'static str;

    /// Returns an index into `candidates`, or `None` to grant no run.
    ///
    /// `candidates` is never empty.
    fn select(&mut self, candidates: &[Candidate<'_>], rng: &mut ChaCha8Rng) -> Option<usize>;
}

/// Picks uniformly among the available algorithms.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAlgorithmStrategy;

impl AlgorithmStrategy for RandomAlgorithmStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(&mut self, candidates: &[Candidate<'_>], rng: &mut ChaCha8Rng) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        Some(rng.random_range(0..candidates.len()))
    }
}

/// Picks algorithms in proportion to their measured efficiency.
///
/// An algorithm that never ran weighs 1. Otherwise its weight is
/// `exploration + (1 - exploration) * efficiency / best_efficiency`, so
/// every algorithm keeps at least the exploration floor.
#[derive(Debug, Clone, Copy)]
pub struct WeightedAlgorithmStrategy {
    exploration: f64,
}

impl WeightedAlgorithmStrategy {
    pub fn new(exploration: f64) -> Self {
        Self {
            exploration: exploration.clamp(0.0, 1.0),
        }
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    /// Selection weight of each candidate.
    pub fn weights(&self, candidates: &[Candidate<'_>]) -> Vec<f64> {
        let best = candidates
            .iter()
            .filter(|candidate| candidate.stats.runs > 0)
            .map(|candidate| candidate.stats.efficiency())
            .fold(0.0, f64::max);

        candidates
            .iter()
            .map(|candidate| {
                if candidate.stats.runs == 0 {
                    1.0
                } else if best > 0.0 {
                    self.exploration
                        + (1.0 - self.exploration) * candidate.stats.efficiency().max(0.0) / best
                } else {
                    self.exploration
                }
            })
            .collect()
    }
}

impl Default for WeightedAlgorithmStrategy {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl AlgorithmStrategy for WeightedAlgorithmStrategy {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn select(&mut self, candidates: &[Candidate<'_>], rng: &mut ChaCha8Rng) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        let weights = self.weights(candidates);
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Some(rng.random_range(0..candidates.len()));
        }

        let mut target = rng.random::<f64>() * total;
        for (index, weight) in weights.iter().enumerate() {
            if target < *weight {
                return Some(index);
            }
            target -= weight;
        }
        Some(candidates.len() - 1)
    }
}
