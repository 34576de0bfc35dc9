//! Variables of an optimization problem.

use std::fmt;

/// A named scalar parameter with an initial value and inclusive limits.
///
/// Limits are not checked against the initial value; use
/// [`Variable::is_consistent`] to detect malformed variables.
///
/// # Examples
///
/// ```
/// use trialforge_core::Variable;
///
/// let x = Variable::new("x", 1.0, -10.0, 10.0);
/// let moved = x.copy_with_initial_value(4.0);
///
/// assert_eq!(moved.name(), "x");
/// assert_eq!(moved.initial_value(), 4.0);
/// assert_eq!(moved.lower_limit(), -10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    name: String,
    initial_value: f64,
    lower_limit: f64,
    upper_limit: f64,
}

impl Variable {
    pub fn new(
        name: impl Into<String>,
        initial_value: f64,
        lower_limit: f64,
        upper_limit: f64,
    ) -> Self {
        Self {
            name: name.into(),
            initial_value,
            lower_limit,
            upper_limit,
        }
    }

    /// Returns a copy of this variable with a different initial value.
    pub fn copy_with_initial_value(&self, initial_value: f64) -> Self {
        Self {
            initial_value,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn lower_limit(&self) -> f64 {
        self.lower_limit
    }

    pub fn upper_limit(&self) -> f64 {
        self.upper_limit
    }

    /// Width of the search domain.
    pub fn range(&self) -> f64 {
        self.upper_limit - self.lower_limit
    }

    /// Returns true if `value` lies within the inclusive limits.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_limit && value <= self.upper_limit
    }

    /// Clamps `value` to the variable limits.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lower_limit).min(self.upper_limit)
    }

    /// Returns true if `lower_limit <= initial_value <= upper_limit`.
    pub fn is_consistent(&self) -> bool {
        self.lower_limit <= self.upper_limit && self.contains(self.initial_value)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} in [{}, {}]",
            self.name, self.initial_value, self.lower_limit, self.upper_limit
        )
    }
}
