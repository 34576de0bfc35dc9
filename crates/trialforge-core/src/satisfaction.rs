//! Satisfaction curves.
//!
//! Stateless functions mapping a raw objective value onto a satisfaction in
//! [0, 1]. Tolerance based curves are calibrated so that a value equal to the
//! tolerance yields roughly 90% satisfaction.
//!
//! # Examples
//!
//! ```
//! use trialforge_core::satisfaction::{inverse_satisfaction, inverse_square_satisfaction};
//!
//! assert!((inverse_satisfaction(0.5, 0.5) - 0.9).abs() < 1e-12);
//! assert!((inverse_square_satisfaction(0.1, 0.1) - 0.9).abs() < 1e-12);
//! assert_eq!(inverse_square_satisfaction(0.0, 0.0), 1.0);
//! ```

/// `exp(-0.1 * |value| / tolerance)`.
///
/// A value equal to the tolerance yields `exp(-0.1)`, about 0.905.
pub fn exponential_satisfaction(value: f64, tolerance: f64) -> f64 {
    if value == 0.0 {
        return 1.0;
    }
    (-0.1 * value.abs() / tolerance).exp()
}

/// `a / (a + |value|)` with `a = 9 * tolerance`.
pub fn inverse_satisfaction(value: f64, tolerance: f64) -> f64 {
    if value == 0.0 {
        return 1.0;
    }
    let a = 9.0 * tolerance;
    a / (a + value.abs())
}

/// Rising mirror of [`inverse_satisfaction`]: `1 - inverse(value, 1 - tolerance)`.
///
/// A tolerance of 1 or more saturates: 0 at `value == 0`, 1 elsewhere.
pub fn inverse_rising_satisfaction(value: f64, tolerance: f64) -> f64 {
    let mirrored = 1.0 - tolerance;
    if mirrored <= 0.0 {
        return if value == 0.0 { 0.0 } else { 1.0 };
    }
    1.0 - inverse_satisfaction(value, mirrored)
}

/// `a / (a + value^2)` with `a = 9 * tolerance^2`.
///
/// Exactly 1 at `value == 0`, even for a zero tolerance.
pub fn inverse_square_satisfaction(value: f64, tolerance: f64) -> f64 {
    if value == 0.0 {
        return 1.0;
    }
    let a = 9.0 * tolerance * tolerance;
    a / (a + value * value)
}

/// Rising mirror of [`inverse_square_satisfaction`].
pub fn inverse_square_rising_satisfaction(value: f64, tolerance: f64) -> f64 {
    1.0 - inverse_square_satisfaction(value, 1.0 - tolerance)
}

/// S-curve `0.5 + d / (1 + 2|d|)` with `d = slope * (value - center)`.
///
/// The result approaches but never reaches 0 and 1.
pub fn s_curve_satisfaction_with_center_and_slope(value: f64, center: f64, slope: f64) -> f64 {
    let delta = slope * (value - center);
    if delta.abs() > 1.0 {
        // Same ratio rearranged so `2|d|` cannot overflow.
        return 0.5 + delta.signum() / (delta.abs().recip() + 2.0);
    }
    0.5 + delta / (1.0 + 2.0 * delta.abs())
}

/// 0 at or below `min`, 1 at or above `max`, linear in between.
pub fn linear_rising_satisfaction(value: f64, min: f64, max: f64) -> f64 {
    if value <= min {
        0.0
    } else if value >= max {
        1.0
    } else {
        (value - min) / (max - min)
    }
}

/// `1 - linear_rising_satisfaction(value, min, max)`.
pub fn linear_falling_satisfaction(value: f64, min: f64, max: f64) -> f64 {
    1.0 - linear_rising_satisfaction(value, min, max)
}

/// Linear ramp raised to `end_slope`. A negative slope yields the complement
/// of the curve for the positive slope.
pub fn accelerating_satisfaction(value: f64, min: f64, max: f64, end_slope: f64) -> f64 {
    if end_slope >= 0.0 {
        linear_rising_satisfaction(value, min, max).powf(end_slope)
    } else {
        1.0 - accelerating_satisfaction(value, min, max, -end_slope)
    }
}

/// `1 - (1 - linear)^start_slope`. A negative slope yields the complement of
/// the curve for the positive slope.
pub fn decelerating_satisfaction(value: f64, min: f64, max: f64, start_slope: f64) -> f64 {
    if start_slope >= 0.0 {
        1.0 - (1.0 - linear_rising_satisfaction(value, min, max)).powf(start_slope)
    } else {
        1.0 - decelerating_satisfaction(value, min, max, -start_slope)
    }
}

/// A curve family together with its shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum SatisfactionCurve {
    Exponential { tolerance: f64 },
    Inverse { tolerance: f64 },
    InverseRising { tolerance: f64 },
    InverseSquare { tolerance: f64 },
    InverseSquareRising { tolerance: f64 },
    SCurve { center: f64, slope: f64 },
    LinearRising { min: f64, max: f64 },
    LinearFalling { min: f64, max: f64 },
    Accelerating { min: f64, max: f64, end_slope: f64 },
    Decelerating { min: f64, max: f64, start_slope: f64 },
}

impl SatisfactionCurve {
    /// Evaluates the curve at `value`.
    pub fn satisfaction(&self, value: f64) -> f64 {
        match *self {
            SatisfactionCurve::Exponential { tolerance } => {
                exponential_satisfaction(value, tolerance)
            }
            SatisfactionCurve::Inverse { tolerance } => inverse_satisfaction(value, tolerance),
            SatisfactionCurve::InverseRising { tolerance } => {
                inverse_rising_satisfaction(value, tolerance)
            }
            SatisfactionCurve::InverseSquare { tolerance } => {
                inverse_square_satisfaction(value, tolerance)
            }
            SatisfactionCurve::InverseSquareRising { tolerance } => {
                inverse_square_rising_satisfaction(value, tolerance)
            }
            SatisfactionCurve::SCurve { center, slope } => {
                s_curve_satisfaction_with_center_and_slope(value, center, slope)
            }
            SatisfactionCurve::LinearRising { min, max } => {
                linear_rising_satisfaction(value, min, max)
            }
            SatisfactionCurve::LinearFalling { min, max } => {
                linear_falling_satisfaction(value, min, max)
            }
            SatisfactionCurve::Accelerating { min, max, end_slope } => {
                accelerating_satisfaction(value, min, max, end_slope)
            }
            SatisfactionCurve::Decelerating {
                min,
                max,
                start_slope,
            } => decelerating_satisfaction(value, min, max, start_slope),
        }
    }
}

#[cfg(test)]
#[path = "satisfaction_tests.rs"]
mod tests;
