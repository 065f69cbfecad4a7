//! Errors raised at the parameter boundary.

use std::fmt;

/// Rejected control values. The per-frame path never produces these; they come
/// from constructors and setters that guard what reaches [`crate::Simulator`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Mass must be positive and finite.
    InvalidMass(f64),
    /// Initial speed must be non-negative and finite.
    InvalidSpeed(f64),
    /// Friction and air-resistance coefficients must be non-negative and finite.
    InvalidCoefficient { name: &'static str, value: f64 },
    /// Track length must be positive and finite.
    InvalidTrackLength(f64),
    /// Time scale must be positive and finite.
    InvalidTimeScale(f64),
    /// Body index is out of bounds.
    BodyOutOfBounds { index: usize, count: usize },
    /// Reset was given a different number of speeds than there are bodies.
    SpeedCountMismatch { expected: usize, got: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidMass(m) => write!(f, "mass must be positive and finite (got {})", m),
            SimError::InvalidSpeed(v) => {
                write!(f, "speed must be non-negative and finite (got {})", v)
            }
            SimError::InvalidCoefficient { name, value } => {
                write!(f, "{} must be non-negative and finite (got {})", name, value)
            }
            SimError::InvalidTrackLength(l) => {
                write!(f, "track length must be positive and finite (got {})", l)
            }
            SimError::InvalidTimeScale(s) => {
                write!(f, "time scale must be positive and finite (got {})", s)
            }
            SimError::BodyOutOfBounds { index, count } => {
                write!(f, "body index {} out of bounds (count: {})", index, count)
            }
            SimError::SpeedCountMismatch { expected, got } => {
                write!(f, "expected {} initial speeds, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for SimError {}

pub(crate) fn check_mass(mass: f64) -> Result<f64, SimError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(SimError::InvalidMass(mass))
    }
}

pub(crate) fn check_speed(speed: f64) -> Result<f64, SimError> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(speed)
    } else {
        Err(SimError::InvalidSpeed(speed))
    }
}
