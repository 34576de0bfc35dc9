//! The algorithm market: which algorithm runs next, and for how long.
//!
//! The market owns the [`AlgorithmPool`], keeps per-algorithm statistics
//! and asks its [`AlgorithmStrategy`] to pick among the available
//! algorithms. Statistics outlive [`AlgorithmMarket::reset`] so a reused
//! solver keeps what it learned; [`AlgorithmMarket::clear_statistics`]
//! forgets them.

mod pool;
mod strategy;

use std::collections::BTreeMap;
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use tracing::debug;
use trialforge_core::{Problem, Trial};

use crate::algorithm::{
    InitialAlgorithm, RandomSearch, RandomShrinkSearch, SearchAlgorithm, SimplexSearch,
};

pub use pool::{AlgorithmPool, AlgorithmPoolListener};
pub use strategy::{
    AlgorithmStrategy, Candidate, RandomAlgorithmStrategy, WeightedAlgorithmStrategy,
};

/// Default evaluation budget of one run.
pub const DEFAULT_EVALUATIONS_PER_RUN: u32 = 10;

/// Accumulated performance of one algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlgorithmStats {
    pub runs: u64,
    pub evaluations: u64,
    /// New optimal solutions found by the algorithm.
    pub improvements: u64,
    /// Sum of best-satisfaction gains over the algorithm's runs.
    pub satisfaction_gain: f64,
}

impl AlgorithmStats {
    /// Satisfaction gained per evaluation.
    pub fn efficiency(&self) -> f64 {
        if self.evaluations == 0 {
            0.0
        } else {
            self.satisfaction_gain / self.evaluations as f64
        }
    }
}

/// A run granted by the market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmGrant {
    /// Pool index of the algorithm.
    pub index: usize,
    pub label: String,
    pub evaluations: u32,
}

/// Allocates evaluation budget among the pooled algorithms.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use trialforge_solver::algorithm::{InitialAlgorithm, RandomSearch};
/// use trialforge_solver::market::{AlgorithmMarket, RandomAlgorithmStrategy};
///
/// let mut market = AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy))
///     .with_algorithm(Box::new(RandomSearch::new()))
///     .with_algorithm(Box::new(InitialAlgorithm::new()))
///     .with_evaluations_per_run(25);
/// market.reset();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let grant = market.next_run(&mut rng).unwrap();
/// assert_eq!(grant.label, "initial");
/// assert_eq!(grant.evaluations, 25);
/// ```
#[derive(Debug)]
pub struct AlgorithmMarket {
    pool: AlgorithmPool,
    strategy: Box<dyn AlgorithmStrategy>,
    stats: BTreeMap<String, AlgorithmStats>,
    evaluations_per_run: u32,
    first_run_granted: bool,
}

impl AlgorithmMarket {
    pub fn new(strategy: Box<dyn AlgorithmStrategy>) -> Self {
        Self {
            pool: AlgorithmPool::new(),
            strategy,
            stats: BTreeMap::new(),
            evaluations_per_run: DEFAULT_EVALUATIONS_PER_RUN,
            first_run_granted: false,
        }
    }

    /// Weighted market over the four bundled algorithms.
    pub fn with_default_algorithms() -> Self {
        Self::new(Box::new(WeightedAlgorithmStrategy::default()))
            .with_algorithm(Box::new(InitialAlgorithm::new()))
            .with_algorithm(Box::new(RandomSearch::new()))
            .with_algorithm(Box::new(RandomShrinkSearch::new()))
            .with_algorithm(Box::new(SimplexSearch::new()))
    }

    pub fn with_algorithm(mut self, algorithm: Box<dyn SearchAlgorithm>) -> Self {
        self.add_algorithm(algorithm);
        self
    }

    /// Sets the budget of each run; zero is raised to one.
    pub fn with_evaluations_per_run(mut self, evaluations: u32) -> Self {
        self.evaluations_per_run = evaluations.max(1);
        self
    }

    pub fn add_algorithm(&mut self, algorithm: Box<dyn SearchAlgorithm>) {
        self.pool.add_algorithm(algorithm);
    }

    pub fn remove_algorithm(&mut self, label: &str) -> Option<Box<dyn SearchAlgorithm>> {
        self.pool.remove_algorithm(label)
    }

    pub fn add_pool_listener(&mut self, listener: Arc<dyn AlgorithmPoolListener>) {
        self.pool.add_listener(listener);
    }

    pub fn pool(&self) -> &AlgorithmPool {
        &self.pool
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn evaluations_per_run(&self) -> u32 {
        self.evaluations_per_run
    }

    pub fn stats(&self, label: &str) -> Option<&AlgorithmStats> {
        self.stats.get(label)
    }

    pub fn statistics(&self) -> &BTreeMap<String, AlgorithmStats> {
        &self.stats
    }

    pub fn clear_statistics(&mut self) {
        self.stats.clear();
    }

    pub fn set_problem(&mut self, problem: &Arc<Problem>) {
        for algorithm in self.pool.iter_mut() {
            algorithm.set_problem(problem);
        }
    }

    /// Resets every algorithm and makes it available again.
    ///
    /// Statistics are kept.
    pub fn reset(&mut self) {
        let mut labels = Vec::with_capacity(self.pool.len());
        for algorithm in self.pool.iter_mut() {
            algorithm.reset();
            labels.push(algorithm.label().to_string());
        }
        for label in &labels {
            self.pool.make_available(label);
        }
        self.first_run_granted = false;
    }

    /// Grants the next run, or `None` when no algorithm is available.
    ///
    /// The first run after a reset goes to an algorithm that claims it,
    /// if any; every other run is picked by the strategy.
    pub fn next_run(&mut self, rng: &mut ChaCha8Rng) -> Option<AlgorithmGrant> {
        let available = self.pool.available_indices();
        if available.is_empty() {
            return None;
        }

        if !self.first_run_granted {
            self.first_run_granted = true;
            let claimant = available.iter().copied().find(|&index| {
                self.pool
                    .get(index)
                    .is_some_and(|algorithm| algorithm.claims_first_run())
            });
            if let Some(index) = claimant {
                return self.grant(index);
            }
        }

        let candidates: Vec<Candidate<'_>> = available
            .iter()
            .filter_map(|&index| self.pool.get(index))
            .map(|algorithm| Candidate {
                label: algorithm.label(),
                stats: self.stats.get(algorithm.label()).copied().unwrap_or_default(),
                global_rating: algorithm.global_rating(),
                local_rating: algorithm.local_rating(),
            })
            .collect();
        let choice = self.strategy.select(&candidates, rng)?;
        let index = *available.get(choice)?;
        self.grant(index)
    }

    fn grant(&self, index: usize) -> Option<AlgorithmGrant> {
        let algorithm = self.pool.get(index)?;
        Some(AlgorithmGrant {
            index,
            label: algorithm.label().to_string(),
            evaluations: self.evaluations_per_run,
        })
    }

    pub fn algorithm_mut(&mut self, index: usize) -> Option<&mut (dyn SearchAlgorithm + 'static)> {
        self.pool.get_mut(index)
    }

    pub fn algorithm_run_will_execute(&mut self, label: &str) {
        for algorithm in self.pool.iter_mut() {
            algorithm.algorithm_run_will_execute(label);
        }
    }

    /// Books a finished run and refreshes availability.
    pub fn algorithm_run_executed(
        &mut self,
        label: &str,
        evaluations: u64,
        satisfaction_gain: f64,
        improvements: u64,
    ) {
        let stats = self.stats.entry(label.to_string()).or_default();
        stats.runs += 1;
        stats.evaluations += evaluations;
        stats.satisfaction_gain += satisfaction_gain.max(0.0);
        stats.improvements += improvements;
        debug!(
            event = "market_update",
            algorithm = label,
            runs = stats.runs,
            efficiency = stats.efficiency(),
        );

        for algorithm in self.pool.iter_mut() {
            algorithm.algorithm_run_executed(label);
        }
        self.refresh_availability();
    }

    /// Forwards a new optimal solution to every algorithm.
    pub fn found_new_optimal_solution(&mut self, trial: &Trial) {
        for algorithm in self.pool.iter_mut() {
            algorithm.found_new_optimal_solution(trial);
        }
        self.refresh_availability();
    }

    fn refresh_availability(&mut self) {
        let states: Vec<(String, bool)> = self
            .pool
            .iter_mut()
            .map(|algorithm| (algorithm.label().to_string(), algorithm.is_exhausted()))
            .collect();
        for (label, exhausted) in states {
            if exhausted {
                self.pool.make_unavailable(&label);
            } else {
                self.pool.make_available(&label);
            }
        }
    }
}

impl Default for AlgorithmMarket {
    fn default() -> Self {
        Self::with_default_algorithms()
    }
}

#[cfg(test)]
mod tests;
