use std::sync::Arc;

use trialforge_config::{AggregationKind, JudgeConfig};
use trialforge_core::{Problem, Trial, TrialForgeError, TrialPoint};

use super::*;
use crate::test_utils::{abs_problem, point_x, two_objective_problem};

fn evaluated(problem: &Arc<Problem>, point: TrialPoint) -> Trial {
    let mut trial = Trial::new(Arc::clone(problem), point, Some("test".to_string()));
    problem.evaluate(&mut trial).unwrap();
    trial
}

fn ab(problem: &Arc<Problem>, a: f64, b: f64) -> Trial {
    let point = TrialPoint::from_coordinates(problem.variables(), &[a, b]);
    evaluated(problem, point)
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_aggregation() {
    let values = [0.2, 0.8];
    assert!((Aggregation::Min.aggregate(&values) - 0.2).abs() < 1e-12);
    assert!((Aggregation::Mean.aggregate(&values) - 0.5).abs() < 1e-12);
    assert!((Aggregation::Product.aggregate(&values) - 0.16).abs() < 1e-12);
}

#[test]
fn test_aggregation_empty() {
    assert_eq!(Aggregation::Min.aggregate(&[]), 0.0);
    assert_eq!(Aggregation::Mean.aggregate(&[]), 0.0);
    assert_eq!(Aggregation::Product.aggregate(&[]), 0.0);
}

#[test]
fn test_aggregation_from_kind() {
    assert_eq!(Aggregation::from(AggregationKind::Min), Aggregation::Min);
    assert_eq!(Aggregation::from(AggregationKind::Mean), Aggregation::Mean);
    assert_eq!(Aggregation::from(AggregationKind::Product), Aggregation::Product);
}

// ============================================================================
// Judging
// ============================================================================

#[test]
fn test_first_trial_is_optimal() {
    let problem = Arc::new(abs_problem(1.0));
    let mut judge = SatisfactionSolutionJudge::default();
    let mut trial = evaluated(&problem, point_x(problem.variables(), 0.1));

    assert!(judge.judge(&mut trial).unwrap());
    assert!((trial.satisfaction() - 0.9).abs() < 1e-9);
    assert_eq!(judge.optimal_solutions().len(), 1);
}

#[test]
fn test_better_trial_replaces_optimal_set() {
    let problem = Arc::new(abs_problem(1.0));
    let mut judge = SatisfactionSolutionJudge::default();

    assert!(judge.judge(&mut evaluated(&problem, point_x(problem.variables(), 2.0))).unwrap());
    assert!(!judge.judge(&mut evaluated(&problem, point_x(problem.variables(), -2.0))).unwrap());
    assert_eq!(judge.optimal_solutions().len(), 2);

    assert!(judge.judge(&mut evaluated(&problem, point_x(problem.variables(), 0.0))).unwrap());
    assert_eq!(judge.optimal_solutions().len(), 1);
    assert_eq!(judge.best_satisfaction(), Some(1.0));
}

#[test]
fn test_worse_trial_is_ignored() {
    let problem = Arc::new(abs_problem(1.0));
    let mut judge = SatisfactionSolutionJudge::default();

    judge.judge(&mut evaluated(&problem, point_x(problem.variables(), 0.0))).unwrap();
    let mut worse = evaluated(&problem, point_x(problem.variables(), 3.0));

    assert!(!judge.judge(&mut worse).unwrap());
    assert!(worse.satisfaction() < 1.0);
    assert_eq!(judge.optimal_solutions().len(), 1);
}

#[test]
fn test_tolerance_turns_near_ties_into_ties() {
    let problem = Arc::new(two_objective_problem());
    let mut judge = SatisfactionSolutionJudge::new(Aggregation::Min).with_tolerance(0.01);

    assert!(judge.judge(&mut ab(&problem, 0.500, 0.9)).unwrap());
    assert!(!judge.judge(&mut ab(&problem, 0.505, 0.9)).unwrap());
    assert_eq!(judge.optimal_solutions().len(), 2);
    assert!(judge.judge(&mut ab(&problem, 0.6, 0.9)).unwrap());
}

#[test]
fn test_aggregation_sets_overall_satisfaction() {
    let problem = Arc::new(two_objective_problem());

    for (aggregation, expected) in [
        (Aggregation::Min, 0.25),
        (Aggregation::Mean, 0.5),
        (Aggregation::Product, 0.1875),
    ] {
        let mut judge = SatisfactionSolutionJudge::new(aggregation);
        let mut trial = ab(&problem, 0.25, 0.75);
        judge.judge(&mut trial).unwrap();
        assert!(
            (trial.satisfaction() - expected).abs() < 1e-12,
            "{aggregation:?}: {}",
            trial.satisfaction()
        );
    }
}

#[test]
fn test_missing_score_is_an_error() {
    let problem = Arc::new(abs_problem(1.0));
    let mut judge = SatisfactionSolutionJudge::default();
    let mut trial = Trial::new(Arc::clone(&problem), point_x(problem.variables(), 1.0), None);

    let err = judge.judge(&mut trial).unwrap_err();
    assert!(matches!(err, TrialForgeError::MissingScore { .. }));
    assert!(judge.optimal_solutions().is_empty());
}

#[test]
fn test_reset_forgets_optimal_solutions() {
    let problem = Arc::new(abs_problem(1.0));
    let mut judge = SatisfactionSolutionJudge::default();
    judge.judge(&mut evaluated(&problem, point_x(problem.variables(), 0.0))).unwrap();

    judge.reset();

    assert!(judge.optimal_solutions().is_empty());
    assert_eq!(judge.best_satisfaction(), None);
}

#[test]
fn test_from_config() {
    let config = JudgeConfig {
        aggregation: AggregationKind::Product,
        satisfaction_tolerance: 0.0,
    };
    let judge = SatisfactionSolutionJudge::from_config(&config);
    assert_eq!(judge.aggregation(), Aggregation::Product);
}
