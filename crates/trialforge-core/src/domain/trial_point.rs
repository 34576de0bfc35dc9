//! Trial points: assignments of values to variables.

use std::collections::BTreeMap;
use std::fmt;

use super::Variable;
use crate::error::{Result, TrialForgeError};

/// An immutable assignment of a value to each variable, keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialPoint {
    values: BTreeMap<String, f64>,
}

impl TrialPoint {
    pub fn new(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    /// Creates a trial point holding each variable's initial value.
    pub fn from_initial_values(variables: &[Variable]) -> Self {
        MutableTrialPoint::from_initial_values(variables).into_trial_point()
    }

    /// Returns the value assigned to the named variable.
    pub fn value(&self, name: &str) -> Result<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| TrialForgeError::UnknownVariable(name.to_string()))
    }

    /// Returns the value assigned to `variable`.
    pub fn value_of(&self, variable: &Variable) -> Result<f64> {
        self.value(variable.name())
    }

    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the values in the order of `variables`.
    pub fn to_coordinates(&self, variables: &[Variable]) -> Result<Vec<f64>> {
        variables.iter().map(|v| self.value_of(v)).collect()
    }

    /// Builds a trial point from coordinates ordered like `variables`.
    pub fn from_coordinates(variables: &[Variable], coordinates: &[f64]) -> Self {
        let values = variables
            .iter()
            .zip(coordinates)
            .map(|(v, &x)| (v.name().to_string(), x))
            .collect();
        Self { values }
    }

    /// Returns a mutable copy of this trial point.
    pub fn to_mutable(&self) -> MutableTrialPoint {
        MutableTrialPoint {
            values: self.values.clone(),
        }
    }
}

impl fmt::Display for TrialPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// Builder for [`TrialPoint`] allowing incremental assignment.
///
/// # Examples
///
/// ```
/// use trialforge_core::{MutableTrialPoint, Variable};
///
/// let x = Variable::new("x", 0.0, -1.0, 1.0);
/// let mut point = MutableTrialPoint::new();
/// point.set_value(&x, 0.5);
///
/// let point = point.into_trial_point();
/// assert_eq!(point.value_of(&x).unwrap(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MutableTrialPoint {
    values: BTreeMap<String, f64>,
}

impl MutableTrialPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_initial_values(variables: &[Variable]) -> Self {
        let mut point = Self::new();
        for variable in variables {
            point.set_value(variable, variable.initial_value());
        }
        point
    }

    pub fn set_value(&mut self, variable: &Variable, value: f64) -> &mut Self {
        self.values.insert(variable.name().to_string(), value);
        self
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Snapshot of the current assignment.
    pub fn trial_point(&self) -> TrialPoint {
        TrialPoint {
            values: self.values.clone(),
        }
    }

    pub fn into_trial_point(self) -> TrialPoint {
        TrialPoint {
            values: self.values,
        }
    }
}
