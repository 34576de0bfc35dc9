//! Tests for the scoreboard, its listeners and efficiency logging.

use std::sync::Arc;

use trialforge_core::{Trial, Veto};

use super::*;
use crate::judge::{Aggregation, SatisfactionSolutionJudge};
use crate::test_utils::{abs_problem, point_x, vetoing_problem, RunFixture};

fn evaluate(fixture: &mut RunFixture, label: &str, values: &[f64]) {
    let variables = fixture.problem.variables().to_vec();
    let mut run = fixture.run(label, values.len() as u32);
    for &value in values {
        run.evaluate_trial_point(point_x(&variables, value)).unwrap();
    }
}

// ============================================================================
// Counters
// ============================================================================

#[test]
fn test_trial_scored_updates_label_log() {
    let mut fixture = RunFixture::new(abs_problem(1.0));

    evaluate(&mut fixture, "alpha", &[1.0, 2.0]);
    evaluate(&mut fixture, "beta", &[3.0]);

    let score_board = &fixture.score_board;
    assert_eq!(score_board.evaluations(), 3);
    assert_eq!(score_board.vetoes(), 0);
    assert_eq!(score_board.evaluations_for("alpha"), 2);
    assert_eq!(score_board.evaluations_for("beta"), 1);
    assert_eq!(score_board.evaluations_for("gamma"), 0);
    assert_eq!(score_board.evaluations_log().len(), 2);
}

#[test]
fn test_trial_vetoed_only_counts_vetoes() {
    let mut fixture = RunFixture::new(vetoing_problem());

    evaluate(&mut fixture, "alpha", &[1.0, 2.0, 3.0]);

    let score_board = &fixture.score_board;
    assert_eq!(score_board.vetoes(), 3);
    assert_eq!(score_board.evaluations(), 0);
    assert!(score_board.evaluations_log().is_empty());
    assert!(score_board.best_solution().is_none());
    assert!(score_board.judge().optimal_solutions().is_empty());
}

#[test]
fn test_found_new_optimal_solution_replaces_best_unconditionally() {
    let problem = Arc::new(abs_problem(1.0));
    let mut score_board = ScoreBoard::default();
    score_board.reset();

    let mut good = Trial::new(Arc::clone(&problem), point_x(problem.variables(), 0.0), None);
    good.set_satisfaction(0.9).unwrap();
    let mut bad = Trial::new(Arc::clone(&problem), point_x(problem.variables(), 5.0), None);
    bad.set_satisfaction(0.1).unwrap();

    score_board.found_new_optimal_solution(&good);
    score_board.found_new_optimal_solution(&bad);

    assert_eq!(score_board.optimal_solutions_found(), 2);
    assert_eq!(score_board.best_satisfaction(), Some(0.1));
}

#[test]
fn test_reset_clears_everything() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    evaluate(&mut fixture, "alpha", &[0.0, 1.0]);
    fixture.score_board.algorithm_run_executed("alpha");

    fixture.score_board.reset();

    let score_board = &fixture.score_board;
    assert_eq!(score_board.evaluations(), 0);
    assert_eq!(score_board.vetoes(), 0);
    assert_eq!(score_board.algorithm_run_executions(), 0);
    assert_eq!(score_board.optimal_solutions_found(), 0);
    assert!(score_board.best_solution().is_none());
    assert!(score_board.evaluations_log().is_empty());
    assert!(score_board.judge().optimal_solutions().is_empty());
    assert!(score_board.elapsed_seconds() < 60.0);
}

#[test]
fn test_elapsed_is_zero_before_reset() {
    let score_board = ScoreBoard::default();
    assert_eq!(score_board.elapsed(), std::time::Duration::ZERO);
}

#[test]
fn test_set_judge() {
    let mut score_board = ScoreBoard::default();
    score_board.set_judge(Box::new(SatisfactionSolutionJudge::new(Aggregation::Mean)));
    assert!(score_board.judge().optimal_solutions().is_empty());
}

#[test]
fn test_summary() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    evaluate(&mut fixture, "alpha", &[0.1]);

    let summary = fixture.score_board.summary();
    assert!(summary.contains("evaluations:             1"));
    assert!(summary.contains("variable x = 0.1"));
    assert!(summary.contains("objective score = 0.1"));
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn test_counting_listener() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    let listener = Arc::new(CountingScoreBoardListener::new());
    fixture.score_board.add_listener(listener.clone());
    assert_eq!(fixture.score_board.listener_count(), 1);

    evaluate(&mut fixture, "alpha", &[4.0, 2.0, 3.0]);

    assert_eq!(listener.scored_count(), 3);
    assert_eq!(listener.vetoed_count(), 0);
    assert_eq!(listener.optimal_count(), 2);

    listener.reset();
    assert_eq!(listener.scored_count(), 0);
}

#[test]
fn test_counting_listener_vetoes() {
    let mut fixture = RunFixture::new(vetoing_problem());
    let listener = Arc::new(CountingScoreBoardListener::new());
    fixture.score_board.add_listener(listener.clone());

    evaluate(&mut fixture, "alpha", &[1.0, 2.0]);

    assert_eq!(listener.scored_count(), 0);
    assert_eq!(listener.vetoed_count(), 2);
    assert_eq!(listener.optimal_count(), 0);
}

#[test]
fn test_logging_listener_leaves_other_listeners_intact() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    let counter = Arc::new(CountingScoreBoardListener::new());
    fixture
        .score_board
        .add_listener(Arc::new(LoggingScoreBoardListener::with_prefix("abs")));
    fixture.score_board.add_listener(counter.clone());
    assert_eq!(fixture.score_board.listener_count(), 2);

    evaluate(&mut fixture, "alpha", &[4.0, 2.0]);

    assert_eq!(counter.scored_count(), 2);
    assert_eq!(counter.optimal_count(), 2);
    assert_eq!(fixture.score_board.evaluations(), 2);
}

#[test]
fn test_logging_listener_on_vetoes() {
    let mut fixture = RunFixture::new(vetoing_problem());
    fixture
        .score_board
        .add_listener(Arc::new(LoggingScoreBoardListener::new()));

    evaluate(&mut fixture, "alpha", &[1.0, 2.0, 3.0]);

    assert_eq!(fixture.score_board.vetoes(), 3);
    assert!(fixture.score_board.best_solution().is_none());
}

#[test]
fn test_channel_listener() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    let (listener, mut receiver) = ChannelScoreBoardListener::new();
    fixture.score_board.add_listener(Arc::new(listener));

    evaluate(&mut fixture, "alpha", &[0.0]);

    match receiver.try_recv().unwrap() {
        ScoreBoardEvent::TrialScored {
            algorithm,
            satisfaction,
            evaluations,
        } => {
            assert_eq!(algorithm.as_deref(), Some("alpha"));
            assert_eq!(satisfaction, 1.0);
            assert_eq!(evaluations, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(matches!(
        receiver.try_recv().unwrap(),
        ScoreBoardEvent::NewOptimalSolution {
            optimal_solutions_found: 1,
            ..
        }
    ));
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_channel_listener_optimal_only() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    let (listener, mut receiver) = ChannelScoreBoardListener::optimal_only();
    fixture.score_board.add_listener(Arc::new(listener));

    evaluate(&mut fixture, "alpha", &[2.0, 3.0, 1.0]);

    let mut optimal = 0;
    while let Ok(event) = receiver.try_recv() {
        assert!(matches!(event, ScoreBoardEvent::NewOptimalSolution { .. }));
        optimal += 1;
    }
    assert_eq!(optimal, 2);
}

#[test]
fn test_channel_listener_vetoed_event() {
    let problem = Arc::new(abs_problem(1.0));
    let mut score_board = ScoreBoard::default();
    score_board.reset();
    let (listener, mut receiver) = ChannelScoreBoardListener::new();
    score_board.add_listener(Arc::new(listener));

    let mut trial = Trial::new(
        Arc::clone(&problem),
        point_x(problem.variables(), 1.0),
        Some("alpha".to_string()),
    );
    trial.veto_trial(Veto::new("out of stock"));
    score_board.trial_vetoed(&trial);

    match receiver.try_recv().unwrap() {
        ScoreBoardEvent::TrialVetoed { reason, vetoes, .. } => {
            assert_eq!(reason, "out of stock");
            assert_eq!(vetoes, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

// ============================================================================
// Efficiency
// ============================================================================

#[test]
fn test_efficiency_window() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    fixture.score_board.record_efficiency(2);

    evaluate(&mut fixture, "alpha", &[5.0, 0.0]);

    let history = fixture.score_board.efficiency_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].label, "alpha");
    assert_eq!(history[0].evaluations, 2);
    assert_eq!(history[0].total_evaluations, 2);
    assert!((history[0].efficiency - 0.5).abs() < 1e-12);
}

#[test]
fn test_efficiency_window_per_label() {
    let mut logger = EfficiencyLogger::new(3);

    logger.record("alpha", 0.5, 1);
    logger.record("beta", 0.2, 2);
    assert!(logger.history().is_empty());
    logger.record("alpha", 0.75, 3);

    let history = logger.history();
    assert_eq!(history.len(), 2);
    let alpha = history.iter().find(|e| e.label == "alpha").unwrap();
    assert_eq!(alpha.evaluations, 2);
    assert!((alpha.efficiency - 0.25).abs() < 1e-12);
    let beta = history.iter().find(|e| e.label == "beta").unwrap();
    assert_eq!(beta.efficiency, 0.0);
}

#[test]
fn test_efficiency_without_headroom_is_zero() {
    let mut logger = EfficiencyLogger::new(1);
    logger.record("alpha", 1.0, 1);
    assert_eq!(logger.history()[0].efficiency, 0.0);
}

#[test]
fn test_efficiency_default_step() {
    let logger = EfficiencyLogger::new(0);
    assert_eq!(logger.evaluations_step(), 1000);
}

#[test]
fn test_efficiency_disabled_by_default() {
    let mut fixture = RunFixture::new(abs_problem(1.0));
    evaluate(&mut fixture, "alpha", &[1.0, 0.0]);
    assert!(fixture.score_board.efficiency_history().is_empty());
}
