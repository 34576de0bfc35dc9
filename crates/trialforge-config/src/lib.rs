//! Configuration system for TrialForge.
//!
//! Load solver configuration from TOML or YAML to control stopping,
//! the algorithm market and the solution judge without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use trialforge_config::{AlgorithmKind, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [stopper]
//!     max_evaluations = 5000
//!     max_seconds = 30
//!
//!     [market]
//!     strategy = "weighted"
//!     evaluations_per_run = 20
//!     algorithms = ["initial", "simplex"]
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.market.algorithms, vec![AlgorithmKind::Initial, AlgorithmKind::Simplex]);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use trialforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("trialforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Abort the solve when an evaluator fails instead of vetoing the trial.
    #[serde(default)]
    pub strict_evaluation: bool,

    /// Stopping conditions. Without any, the solver stops after
    /// [`DEFAULT_MAX_EVALUATIONS`] evaluations.
    #[serde(default)]
    pub stopper: Option<StopperConfig>,

    /// Algorithm market configuration.
    #[serde(default)]
    pub market: MarketConfig,

    /// Solution judge configuration.
    #[serde(default)]
    pub judge: JudgeConfig,

    /// Periodic per-algorithm efficiency logging.
    #[serde(default)]
    pub efficiency_log: Option<EfficiencyLogConfig>,
}

/// Evaluation budget applied when no stopper is configured.
pub const DEFAULT_MAX_EVALUATIONS: u64 = 10_000;

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.evaluations_per_run == 0 {
            return Err(ConfigError::Invalid(
                "market.evaluations_per_run must be positive".to_string(),
            ));
        }
        if self.market.algorithms.is_empty() {
            return Err(ConfigError::Invalid(
                "market.algorithms must name at least one algorithm".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.market.exploration) {
            return Err(ConfigError::Invalid(format!(
                "market.exploration must lie in [0, 1], got {}",
                self.market.exploration
            )));
        }
        if self.judge.satisfaction_tolerance < 0.0 {
            return Err(ConfigError::Invalid(
                "judge.satisfaction_tolerance must not be negative".to_string(),
            ));
        }
        if let Some(log) = &self.efficiency_log {
            if log.evaluations_step == 0 {
                return Err(ConfigError::Invalid(
                    "efficiency_log.evaluations_step must be positive".to_string(),
                ));
            }
        }
        if let Some(stopper) = &self.stopper {
            stopper.validate()?;
        }
        Ok(())
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Enables or disables strict evaluation.
    pub fn with_strict_evaluation(mut self, strict: bool) -> Self {
        self.strict_evaluation = strict;
        self
    }

    /// Sets the evaluation limit.
    pub fn with_max_evaluations(mut self, evaluations: u64) -> Self {
        self.stopper = Some(StopperConfig {
            max_evaluations: Some(evaluations),
            ..self.stopper.unwrap_or_default()
        });
        self
    }

    /// Sets the time limit.
    pub fn with_max_seconds(mut self, seconds: f64) -> Self {
        self.stopper = Some(StopperConfig {
            max_seconds: Some(seconds),
            ..self.stopper.unwrap_or_default()
        });
        self
    }

    /// Sets the satisfaction every objective of the best solution must reach.
    pub fn with_min_satisfaction(mut self, satisfaction: f64) -> Self {
        self.stopper = Some(StopperConfig {
            min_satisfaction: Some(satisfaction),
            ..self.stopper.unwrap_or_default()
        });
        self
    }

    /// Replaces the algorithm list of the market.
    pub fn with_algorithms(mut self, algorithms: Vec<AlgorithmKind>) -> Self {
        self.market.algorithms = algorithms;
        self
    }

    /// Sets the market strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.market.strategy = strategy;
        self
    }

    /// Sets the number of evaluations granted to each algorithm run.
    pub fn with_evaluations_per_run(mut self, evaluations: u32) -> Self {
        self.market.evaluations_per_run = evaluations;
        self
    }

    /// Sets the judge's aggregation of objective satisfactions.
    pub fn with_aggregation(mut self, aggregation: AggregationKind) -> Self {
        self.judge.aggregation = aggregation;
        self
    }

    /// Enables efficiency logging every `evaluations_step` evaluations.
    pub fn with_efficiency_log(mut self, evaluations_step: u64) -> Self {
        self.efficiency_log = Some(EfficiencyLogConfig { evaluations_step });
        self
    }

    /// Returns the time limit, if configured.
    ///
    /// Convenience method that delegates to `stopper.time_limit()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use trialforge_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [stopper]
    ///     max_seconds = 1.5
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.stopper.as_ref().and_then(|s| s.time_limit())
    }
}

/// Stopping conditions.
///
/// Every configured limit is an independent reason to stop, except
/// `min_satisfaction` which, when combined with `min_seconds` and
/// `max_seconds`, forms one time window policy: never stop before
/// `min_seconds`, always stop at `max_seconds`, stop in between once the
/// satisfaction target is met.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StopperConfig {
    /// Maximum number of scored trials.
    pub max_evaluations: Option<u64>,

    /// Maximum number of executed algorithm runs.
    pub max_algorithm_executions: Option<u64>,

    /// Maximum wall-clock seconds.
    pub max_seconds: Option<f64>,

    /// Minimum wall-clock seconds before a satisfaction based stop. Only
    /// valid together with `min_satisfaction`.
    pub min_seconds: Option<f64>,

    /// Satisfaction every objective of the best solution must reach.
    pub min_satisfaction: Option<f64>,

    /// Maximum number of new optimal solutions.
    pub max_optimal_solutions: Option<u64>,

    /// Size of the judge's optimal set that signals a plateau.
    pub flat_optimal_solutions: Option<usize>,
}

impl StopperConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.max_seconds.and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// Returns the minimum solving time as a Duration, if any.
    pub fn min_time(&self) -> Option<Duration> {
        self.min_seconds.and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// Whether no limit is configured.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(satisfaction) = self.min_satisfaction {
            if !(0.0..=1.0).contains(&satisfaction) {
                return Err(ConfigError::Invalid(format!(
                    "stopper.min_satisfaction must lie in [0, 1], got {satisfaction}"
                )));
            }
        }
        for (field, seconds) in [
            ("max_seconds", self.max_seconds),
            ("min_seconds", self.min_seconds),
        ] {
            if let Some(seconds) = seconds {
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "stopper.{field} must be a non-negative number, got {seconds}"
                    )));
                }
            }
        }
        if self.min_seconds.is_some() && self.min_satisfaction.is_none() {
            return Err(ConfigError::Invalid(
                "stopper.min_seconds requires stopper.min_satisfaction".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_seconds, self.max_seconds) {
            if min > max {
                return Err(ConfigError::Invalid(format!(
                    "stopper.min_seconds ({min}) exceeds stopper.max_seconds ({max})"
                )));
            }
        }
        Ok(())
    }
}

/// Algorithm market configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MarketConfig {
    /// Policy that picks the algorithm of the next run.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Evaluations granted to each algorithm run.
    #[serde(default = "default_evaluations_per_run")]
    pub evaluations_per_run: u32,

    /// Share of picks the weighted strategy spreads uniformly.
    #[serde(default = "default_exploration")]
    pub exploration: f64,

    /// Algorithms registered with the market.
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<AlgorithmKind>,
}

fn default_evaluations_per_run() -> u32 {
    10
}

fn default_exploration() -> f64 {
    0.1
}

fn default_algorithms() -> Vec<AlgorithmKind> {
    vec![
        AlgorithmKind::Initial,
        AlgorithmKind::Random,
        AlgorithmKind::RandomShrink,
        AlgorithmKind::Simplex,
    ]
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            evaluations_per_run: default_evaluations_per_run(),
            exploration: default_exploration(),
            algorithms: default_algorithms(),
        }
    }
}

/// Market strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Uniform pick among available algorithms.
    Random,

    /// Pick proportional to each algorithm's measured efficiency.
    #[default]
    Weighted,
}

/// Bundled search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    /// Evaluates the variables' initial values.
    Initial,

    /// Uniform re-sampling around the best point.
    Random,

    /// Shrinking windows around the best point.
    RandomShrink,

    /// Nelder-Mead downhill simplex.
    Simplex,
}

/// Solution judge configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JudgeConfig {
    /// How objective satisfactions combine into the overall satisfaction.
    #[serde(default)]
    pub aggregation: AggregationKind,

    /// Overall satisfactions closer than this are ties.
    #[serde(default = "default_satisfaction_tolerance")]
    pub satisfaction_tolerance: f64,
}

fn default_satisfaction_tolerance() -> f64 {
    1e-9
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationKind::default(),
            satisfaction_tolerance: default_satisfaction_tolerance(),
        }
    }
}

/// Aggregation of objective satisfactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    /// Worst objective.
    #[default]
    Min,

    /// Arithmetic mean.
    Mean,

    /// Product of all satisfactions.
    Product,
}

/// Efficiency logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EfficiencyLogConfig {
    /// Evaluations per logging window.
    #[serde(default = "default_evaluations_step")]
    pub evaluations_step: u64,
}

fn default_evaluations_step() -> u64 {
    1000
}

impl Default for EfficiencyLogConfig {
    fn default() -> Self {
        Self {
            evaluations_step: default_evaluations_step(),
        }
    }
}
