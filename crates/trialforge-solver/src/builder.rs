//! Wiring between configuration types and solver components.

use std::time::Duration;

use trialforge_config::{
    AlgorithmKind, JudgeConfig, MarketConfig, SolverConfig, StopperConfig, StrategyKind,
    DEFAULT_MAX_EVALUATIONS,
};

use crate::algorithm::{
    InitialAlgorithm, RandomSearch, RandomShrinkSearch, SearchAlgorithm, SimplexSearch,
};
use crate::judge::{SatisfactionSolutionJudge, SolutionJudge};
use crate::market::{
    AlgorithmMarket, AlgorithmStrategy, RandomAlgorithmStrategy, WeightedAlgorithmStrategy,
};
use crate::solver::Solver;
use crate::stopper::{
    or_stoppers, FlatOptimizationStopper, MaxElapsedTimeStopper, MaxEvaluationsStopper,
    MaxOptimalSolutionsStopper, MinMaxTimeSatisfactionStopper, MinSatisfactionStopper, OrStopper,
    Stopper,
};

/// Builder for constructing stoppers from configuration.
pub struct StopperBuilder;

impl StopperBuilder {
    /// Builds the stopper described by `config`.
    ///
    /// Every configured limit is OR-ed. Without any limit the solve stops
    /// after [`DEFAULT_MAX_EVALUATIONS`] evaluations.
    pub fn build(config: Option<&StopperConfig>) -> OrStopper<Vec<Box<dyn Stopper>>> {
        let config = config.cloned().unwrap_or_default();
        let mut stoppers: Vec<Box<dyn Stopper>> = Vec::new();

        match (config.max_evaluations, config.max_algorithm_executions) {
            (Some(evaluations), Some(runs)) => stoppers.push(Box::new(
                MaxEvaluationsStopper::new(evaluations).with_max_algorithm_executions(runs),
            )),
            (Some(evaluations), None) => {
                stoppers.push(Box::new(MaxEvaluationsStopper::new(evaluations)))
            }
            (None, Some(runs)) => {
                stoppers.push(Box::new(MaxEvaluationsStopper::max_algorithm_executions(runs)))
            }
            (None, None) => {}
        }

        match (config.min_satisfaction, config.min_time()) {
            (Some(satisfaction), Some(min_time)) => {
                let max_time = config.time_limit().unwrap_or(Duration::MAX);
                stoppers.push(Box::new(MinMaxTimeSatisfactionStopper::new(
                    min_time,
                    max_time,
                    satisfaction,
                )));
            }
            (satisfaction, _) => {
                if let Some(satisfaction) = satisfaction {
                    stoppers.push(Box::new(MinSatisfactionStopper::new(satisfaction)));
                }
                if let Some(limit) = config.time_limit() {
                    stoppers.push(Box::new(MaxElapsedTimeStopper::new(limit)));
                }
            }
        }

        if let Some(solutions) = config.max_optimal_solutions {
            stoppers.push(Box::new(MaxOptimalSolutionsStopper::new(solutions)));
        }
        if let Some(solutions) = config.flat_optimal_solutions {
            stoppers.push(Box::new(FlatOptimizationStopper::new(solutions)));
        }

        if stoppers.is_empty() {
            stoppers.push(Box::new(MaxEvaluationsStopper::new(DEFAULT_MAX_EVALUATIONS)));
        }
        or_stoppers(stoppers)
    }
}

/// Builder for constructing algorithm markets from configuration.
pub struct MarketBuilder;

impl MarketBuilder {
    pub fn build(config: &MarketConfig) -> AlgorithmMarket {
        let mut market = AlgorithmMarket::new(Self::strategy(config))
            .with_evaluations_per_run(config.evaluations_per_run);
        for kind in &config.algorithms {
            market.add_algorithm(Self::algorithm(*kind));
        }
        market
    }

    pub fn strategy(config: &MarketConfig) -> Box<dyn AlgorithmStrategy> {
        match config.strategy {
            StrategyKind::Random => Box::new(RandomAlgorithmStrategy),
            StrategyKind::Weighted => Box::new(WeightedAlgorithmStrategy::new(config.exploration)),
        }
    }

    pub fn algorithm(kind: AlgorithmKind) -> Box<dyn SearchAlgorithm> {
        match kind {
            AlgorithmKind::Initial => Box::new(InitialAlgorithm::new()),
            AlgorithmKind::Random => Box::new(RandomSearch::new()),
            AlgorithmKind::RandomShrink => Box::new(RandomShrinkSearch::new()),
            AlgorithmKind::Simplex => Box::new(SimplexSearch::new()),
        }
    }
}

/// Builder for constructing solution judges from configuration.
pub struct JudgeBuilder;

impl JudgeBuilder {
    pub fn build(config: &JudgeConfig) -> Box<dyn SolutionJudge> {
        Box::new(SatisfactionSolutionJudge::from_config(config))
    }
}

impl Solver {
    /// Creates a solver configured by `config`.
    ///
    /// # Example
    ///
    /// ```
    /// use trialforge_config::SolverConfig;
    /// use trialforge_solver::Solver;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     random_seed = 7
    ///
    ///     [stopper]
    ///     max_evaluations = 500
    ///
    ///     [market]
    ///     strategy = "random"
    ///     algorithms = ["initial", "random"]
    /// "#).unwrap();
    ///
    /// let solver = Solver::from_config(config);
    /// assert_eq!(solver.market().pool().len(), 2);
    /// assert_eq!(solver.market().strategy_name(), "random");
    /// ```
    pub fn from_config(config: SolverConfig) -> Self {
        let stopper = StopperBuilder::build(config.stopper.as_ref());
        let mut solver = Solver::new(stopper)
            .with_market(MarketBuilder::build(&config.market))
            .with_judge(JudgeBuilder::build(&config.judge))
            .with_strict_evaluation(config.strict_evaluation);
        if let Some(seed) = config.random_seed {
            solver = solver.with_seed(seed);
        }
        if let Some(efficiency_log) = &config.efficiency_log {
            solver = solver.with_efficiency_log(efficiency_log.evaluations_step);
        }
        solver.with_config(config)
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
