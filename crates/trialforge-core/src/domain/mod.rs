//! Domain model: variables, trial points, objectives, problems and trials.

mod objective;
mod problem;
mod trial;
mod trial_point;
mod variable;

pub use objective::{CurveObjective, FnObjective, Objective, Score};
pub use problem::{Evaluator, Problem, Scorer, ScorerEvaluator};
pub use trial::{Trial, Veto};
pub use trial_point::{MutableTrialPoint, TrialPoint};
pub use variable::Variable;
