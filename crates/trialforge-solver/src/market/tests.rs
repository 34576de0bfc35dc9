//! Tests for the algorithm pool, strategies and market.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trialforge_core::Result;

use super::*;
use crate::algorithm::AlgorithmRun;
use crate::test_utils::ScriptedAlgorithm;

/// Exhausted after its own first run, until reset.
#[derive(Debug)]
struct OneShot {
    used: bool,
}

impl SearchAlgorithm for OneShot {
    fn label(&self) -> &str {
        "one_shot"
    }

    fn perform_run(&mut self, _run: &mut AlgorithmRun<'_>) -> Result<()> {
        Ok(())
    }

    fn reset(&mut self) {
        self.used = false;
    }

    fn algorithm_run_executed(&mut self, label: &str) {
        if label == self.label() {
            self.used = true;
        }
    }

    fn is_exhausted(&self) -> bool {
        self.used
    }
}

#[derive(Debug, Default)]
struct PoolRecorder {
    events: Mutex<Vec<String>>,
}

impl PoolRecorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl AlgorithmPoolListener for PoolRecorder {
    fn algorithm_added(&self, label: &str) {
        self.push(format!("added:{label}"));
    }

    fn algorithm_removed(&self, label: &str) {
        self.push(format!("removed:{label}"));
    }

    fn algorithm_available(&self, label: &str) {
        self.push(format!("available:{label}"));
    }

    fn algorithm_unavailable(&self, label: &str) {
        self.push(format!("unavailable:{label}"));
    }
}

fn scripted(label: &str) -> Box<dyn SearchAlgorithm> {
    Box::new(ScriptedAlgorithm::new(label, 1.0, 1))
}

fn candidate(label: &str, runs: u64, evaluations: u64, gain: f64) -> Candidate<'_> {
    Candidate {
        label,
        stats: AlgorithmStats {
            runs,
            evaluations,
            improvements: 0,
            satisfaction_gain: gain,
        },
        global_rating: 5,
        local_rating: 5,
    }
}

// ============================================================================
// Pool
// ============================================================================

#[test]
fn test_pool_add_replace_remove() {
    let recorder = Arc::new(PoolRecorder::default());
    let mut pool = AlgorithmPool::new();
    pool.add_listener(recorder.clone());

    pool.add_algorithm(scripted("a"));
    pool.add_algorithm(scripted("b"));
    pool.add_algorithm(scripted("a"));
    assert_eq!(pool.labels(), vec!["a", "b"]);
    assert_eq!(pool.len(), 2);

    assert!(pool.remove_algorithm("a").is_some());
    assert!(pool.remove_algorithm("a").is_none());
    assert_eq!(pool.labels(), vec!["b"]);

    assert_eq!(
        recorder.events(),
        vec!["added:a", "added:b", "added:a", "removed:a"]
    );
}

#[test]
fn test_pool_availability() {
    let recorder = Arc::new(PoolRecorder::default());
    let mut pool = AlgorithmPool::new();
    pool.add_listener(recorder.clone());
    pool.add_algorithm(scripted("a"));
    pool.add_algorithm(scripted("b"));

    assert!(pool.make_unavailable("a"));
    assert!(pool.make_unavailable("a"));
    assert!(!pool.is_available("a"));
    assert_eq!(pool.available_indices(), vec![1]);

    assert!(pool.make_available("a"));
    assert!(!pool.make_available("missing"));
    assert_eq!(pool.available_indices(), vec![0, 1]);

    // Repeated transitions notify once.
    assert_eq!(
        recorder.events(),
        vec!["added:a", "added:b", "unavailable:a", "available:a"]
    );
}

// ============================================================================
// Strategies
// ============================================================================

#[test]
fn test_random_strategy_stays_in_range() {
    let mut strategy = RandomAlgorithmStrategy;
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let candidates = vec![candidate("a", 0, 0, 0.0), candidate("b", 0, 0, 0.0)];

    let mut seen = [false; 2];
    for _ in 0..100 {
        let index = strategy.select(&candidates, &mut rng).unwrap();
        seen[index] = true;
    }
    assert_eq!(seen, [true, true]);
    assert_eq!(strategy.select(&[], &mut rng), None);
}

#[test]
fn test_weighted_strategy_weights() {
    let strategy = WeightedAlgorithmStrategy::new(0.2);
    let candidates = vec![
        candidate("untried", 0, 0, 0.0),
        candidate("best", 2, 10, 0.5),
        candidate("half", 2, 10, 0.25),
        candidate("useless", 2, 10, 0.0),
    ];

    let weights = strategy.weights(&candidates);
    assert_eq!(weights[0], 1.0);
    assert!((weights[1] - 1.0).abs() < 1e-12);
    assert!((weights[2] - 0.6).abs() < 1e-12);
    assert!((weights[3] - 0.2).abs() < 1e-12);
}

#[test]
fn test_weighted_strategy_without_exploration_prefers_efficient() {
    let mut strategy = WeightedAlgorithmStrategy::new(0.0);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let candidates = vec![candidate("slow", 1, 10, 0.0), candidate("fast", 1, 10, 0.3)];

    for _ in 0..50 {
        assert_eq!(strategy.select(&candidates, &mut rng), Some(1));
    }
}

#[test]
fn test_weighted_strategy_falls_back_to_uniform() {
    let mut strategy = WeightedAlgorithmStrategy::new(0.0);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let candidates = vec![candidate("a", 1, 10, 0.0), candidate("b", 1, 10, 0.0)];

    assert!(strategy.select(&candidates, &mut rng).is_some());
}

#[test]
fn test_exploration_is_clamped() {
    assert_eq!(WeightedAlgorithmStrategy::new(3.0).exploration(), 1.0);
    assert_eq!(WeightedAlgorithmStrategy::new(-1.0).exploration(), 0.0);
    assert_eq!(WeightedAlgorithmStrategy::default().exploration(), 0.1);
}

// ============================================================================
// Market
// ============================================================================

#[test]
fn test_first_run_goes_to_claimant() {
    let mut market = AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy))
        .with_algorithm(scripted("a"))
        .with_algorithm(scripted("b"))
        .with_algorithm(Box::new(InitialAlgorithm::new()));
    market.reset();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let first = market.next_run(&mut rng).unwrap();
    assert_eq!(first.label, "initial");
    assert_eq!(first.index, 2);
    assert_eq!(first.evaluations, DEFAULT_EVALUATIONS_PER_RUN);
}

#[test]
fn test_market_without_available_algorithms() {
    let mut market = AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy));
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(market.next_run(&mut rng).is_none());
}

#[test]
fn test_run_statistics() {
    let mut market = AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy))
        .with_algorithm(scripted("a"));

    market.algorithm_run_executed("a", 10, 0.4, 2);
    market.algorithm_run_executed("a", 10, -0.1, 0);

    let stats = market.stats("a").unwrap();
    assert_eq!(stats.runs, 2);
    assert_eq!(stats.evaluations, 20);
    assert_eq!(stats.improvements, 2);
    assert!((stats.efficiency() - 0.02).abs() < 1e-12);
    assert!(market.stats("b").is_none());
}

#[test]
fn test_statistics_survive_reset() {
    let mut market = AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy))
        .with_algorithm(scripted("a"));
    market.algorithm_run_executed("a", 5, 0.5, 1);

    market.reset();
    assert_eq!(market.stats("a").map(|s| s.runs), Some(1));

    market.clear_statistics();
    assert!(market.statistics().is_empty());
}

#[test]
fn test_exhausted_algorithm_becomes_unavailable() {
    let recorder = Arc::new(PoolRecorder::default());
    let mut market = AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy));
    market.add_pool_listener(recorder.clone());
    market.add_algorithm(Box::new(OneShot { used: false }));
    market.add_algorithm(scripted("steady"));
    market.reset();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    market.algorithm_run_executed("one_shot", 0, 0.0, 0);
    assert!(!market.pool().is_available("one_shot"));
    for _ in 0..20 {
        assert_eq!(market.next_run(&mut rng).unwrap().label, "steady");
    }

    market.reset();
    assert!(market.pool().is_available("one_shot"));
    assert_eq!(
        recorder.events(),
        vec![
            "added:one_shot",
            "added:steady",
            "unavailable:one_shot",
            "available:one_shot"
        ]
    );
}

#[test]
fn test_default_market() {
    let market = AlgorithmMarket::default();
    assert_eq!(
        market.pool().labels(),
        vec!["initial", "random", "random_shrink", "simplex"]
    );
    assert_eq!(market.strategy_name(), "weighted");
    assert_eq!(market.evaluations_per_run(), DEFAULT_EVALUATIONS_PER_RUN);
}

#[test]
fn test_evaluations_per_run_is_at_least_one() {
    let market = AlgorithmMarket::new(Box::new(RandomAlgorithmStrategy)).with_evaluations_per_run(0);
    assert_eq!(market.evaluations_per_run(), 1);
}
