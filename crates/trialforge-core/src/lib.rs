//! TrialForge Core - Core types and traits for satisfaction driven optimization
//!
//! This crate provides the fundamental abstractions for TrialForge:
//! - Variables, trial points and trials describing candidate solutions
//! - Objectives and satisfaction curves mapping raw scores onto [0, 1]
//! - Problems bundling variables, objectives and an evaluator
//! - The shared error type

pub mod domain;
pub mod error;
pub mod problem_factory;
pub mod satisfaction;

pub use domain::{
    CurveObjective, Evaluator, FnObjective, MutableTrialPoint, Objective, Problem, Score, Scorer,
    ScorerEvaluator, Trial, TrialPoint, Variable, Veto,
};
pub use error::{check_satisfaction, Result, TrialForgeError};
pub use problem_factory::{ProblemFactory, DEFAULT_OBJECTIVE_NAME};
pub use satisfaction::SatisfactionCurve;
