use std::sync::Arc;

use trialforge_config::{
    AggregationKind, AlgorithmKind, JudgeConfig, MarketConfig, SolverConfig, StopperConfig,
    StrategyKind, DEFAULT_MAX_EVALUATIONS,
};
use trialforge_core::{Trial, TrialPoint};

use super::*;
use crate::test_utils::{abs_problem, create_score_board, two_objective_problem};

fn runs(score_board: &mut crate::scoreboard::ScoreBoard, count: u64) {
    for _ in 0..count {
        score_board.algorithm_run_executed("test");
    }
}

// ============================================================================
// StopperBuilder
// ============================================================================

#[test]
fn test_empty_config_uses_default_limit() {
    let stopper = StopperBuilder::build(None);
    assert_eq!(stopper.0.len(), 1);

    let mut score_board = create_score_board();
    assert!(!stopper.should_stop(&score_board));
    runs(&mut score_board, DEFAULT_MAX_EVALUATIONS);
    assert!(stopper.should_stop(&score_board));

    let empty = StopperBuilder::build(Some(&StopperConfig::default()));
    assert_eq!(empty.0.len(), 1);
}

#[test]
fn test_evaluations_and_runs_share_one_stopper() {
    let config = StopperConfig {
        max_evaluations: Some(100),
        max_algorithm_executions: Some(2),
        ..StopperConfig::default()
    };
    let stopper = StopperBuilder::build(Some(&config));
    assert_eq!(stopper.0.len(), 1);

    let mut score_board = create_score_board();
    runs(&mut score_board, 1);
    assert!(!stopper.should_stop(&score_board));
    runs(&mut score_board, 1);
    assert!(stopper.should_stop(&score_board));
}

#[test]
fn test_runs_only() {
    let config = StopperConfig {
        max_algorithm_executions: Some(3),
        ..StopperConfig::default()
    };
    let stopper = StopperBuilder::build(Some(&config));

    let mut score_board = create_score_board();
    runs(&mut score_board, 2);
    assert!(!stopper.should_stop(&score_board));
    runs(&mut score_board, 1);
    assert!(stopper.should_stop(&score_board));
}

#[test]
fn test_min_time_merges_satisfaction_and_time_limit() {
    let config = StopperConfig {
        min_seconds: Some(60.0),
        max_seconds: Some(120.0),
        min_satisfaction: Some(0.5),
        ..StopperConfig::default()
    };
    let stopper = StopperBuilder::build(Some(&config));
    assert_eq!(stopper.0.len(), 1);
    assert!(!stopper.should_stop(&create_score_board()));
}

#[test]
fn test_satisfaction_and_time_limit_without_min_time() {
    let config = StopperConfig {
        max_seconds: Some(0.0),
        min_satisfaction: Some(0.5),
        ..StopperConfig::default()
    };
    let stopper = StopperBuilder::build(Some(&config));
    assert_eq!(stopper.0.len(), 2);
    assert!(stopper.should_stop(&create_score_board()));
}

#[test]
fn test_satisfaction_alone_waits_for_a_solution() {
    let config = StopperConfig {
        min_satisfaction: Some(0.5),
        ..StopperConfig::default()
    };
    let stopper = StopperBuilder::build(Some(&config));
    assert_eq!(stopper.0.len(), 1);
    assert!(!stopper.should_stop(&create_score_board()));
}

#[test]
fn test_optimal_solution_limits() {
    let config = StopperConfig {
        max_optimal_solutions: Some(5),
        flat_optimal_solutions: Some(3),
        ..StopperConfig::default()
    };
    let stopper = StopperBuilder::build(Some(&config));
    assert_eq!(stopper.0.len(), 2);
    assert!(!stopper.should_stop(&create_score_board()));
}

// ============================================================================
// MarketBuilder
// ============================================================================

#[test]
fn test_default_market() {
    let market = MarketBuilder::build(&MarketConfig::default());

    assert_eq!(market.strategy_name(), "weighted");
    assert_eq!(market.evaluations_per_run(), 10);
    assert_eq!(
        market.pool().labels(),
        vec!["initial", "random", "random_shrink", "simplex"]
    );
}

#[test]
fn test_market_from_config() {
    let config = MarketConfig {
        strategy: StrategyKind::Random,
        evaluations_per_run: 25,
        algorithms: vec![AlgorithmKind::Simplex, AlgorithmKind::Random],
        ..MarketConfig::default()
    };
    let market = MarketBuilder::build(&config);

    assert_eq!(market.strategy_name(), "random");
    assert_eq!(market.evaluations_per_run(), 25);
    assert_eq!(market.pool().labels(), vec!["simplex", "random"]);
}

#[test]
fn test_algorithm_kinds() {
    let cases = [
        (AlgorithmKind::Initial, "initial"),
        (AlgorithmKind::Random, "random"),
        (AlgorithmKind::RandomShrink, "random_shrink"),
        (AlgorithmKind::Simplex, "simplex"),
    ];
    for (kind, label) in cases {
        assert_eq!(MarketBuilder::algorithm(kind).label(), label);
    }
}

// ============================================================================
// JudgeBuilder
// ============================================================================

#[test]
fn test_judge_uses_configured_aggregation() {
    let problem = Arc::new(two_objective_problem());
    let mut judge = JudgeBuilder::build(&JudgeConfig {
        aggregation: AggregationKind::Mean,
        ..JudgeConfig::default()
    });
    let point = TrialPoint::from_coordinates(problem.variables(), &[0.5, 1.0]);
    let mut trial = Trial::new(Arc::clone(&problem), point, None);
    problem.evaluate(&mut trial).unwrap();

    assert!(judge.judge(&mut trial).unwrap());
    assert!((trial.satisfaction() - 0.75).abs() < 1e-12);
}

// ============================================================================
// Solver::from_config
// ============================================================================

#[test]
fn test_from_config() {
    let config = SolverConfig::new()
        .with_random_seed(3)
        .with_strict_evaluation(true)
        .with_max_evaluations(50)
        .with_efficiency_log(10);
    let solver = Solver::from_config(config.clone());

    assert_eq!(solver.schedule().seed(), Some(3));
    assert!(solver.schedule().strict_evaluation());
    assert_eq!(solver.config(), Some(&config));
    assert_eq!(solver.market().pool().len(), 4);
}

#[test]
fn test_seeded_config_is_reproducible() {
    let config = SolverConfig::new()
        .with_random_seed(11)
        .with_max_evaluations(300)
        .with_strategy(StrategyKind::Random);

    let first = Solver::from_config(config.clone())
        .solve(abs_problem(7.0))
        .unwrap();
    let second = Solver::from_config(config).solve(abs_problem(7.0)).unwrap();

    assert_eq!(first.evaluations, second.evaluations);
    assert_eq!(first.best_satisfaction(), second.best_satisfaction());
    assert_eq!(
        first.best_solution.map(|t| t.trial_point().values().clone()),
        second.best_solution.map(|t| t.trial_point().values().clone())
    );
}

#[test]
fn test_from_config_records_efficiency() {
    let config = SolverConfig::new()
        .with_random_seed(5)
        .with_max_evaluations(100)
        .with_efficiency_log(20);
    let mut solver = Solver::from_config(config);
    solver.solve(abs_problem(4.0)).unwrap();

    assert!(!solver.score_board().efficiency_history().is_empty());
}
