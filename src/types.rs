//! Shared scalar types and small validated wrappers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row index into the Q-table, produced only by an environment's encoding.
pub type State = usize;

/// Column index into the Q-table, one of the environment's fixed actions.
pub type Action = usize;

/// Scalar reward signal.
pub type Reward = f64;

/// Estimated action value.
pub type QValue = f64;

/// Closed-open interval `[lo, hi)` used for bucketing a continuous value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub(crate) lo: f64,
    pub(crate) hi: f64,
}

impl Bounds {
    /// Create bounds, validating `lo < hi` and that both are finite.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidParameter`] when the interval is empty or not finite.
    pub fn new(lo: f64, hi: f64) -> Result<Self, crate::Error> {
        if lo.is_finite() && hi.is_finite() && lo < hi {
            Ok(Self { lo, hi })
        } else {
            Err(crate::Error::invalid_parameter(
                "bounds",
                format!("expected finite lo < hi, got [{lo}, {hi}]"),
            ))
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lo, self.hi)
    }
}

/// Validate a probability-like hyperparameter lies in `[0, 1]`.
pub(crate) fn unit_interval(name: &str, value: f64) -> Result<f64, crate::Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(crate::Error::invalid_parameter(
            name,
            format!("{value} is outside [0, 1]"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_reject_empty_interval() {
        assert!(Bounds::new(1.0, 1.0).is_err());
        assert!(Bounds::new(2.0, -2.0).is_err());
        assert!(Bounds::new(f64::NAN, 1.0).is_err());
        assert!(Bounds::new(-2.0, 2.0).is_ok());
    }

    #[test]
    fn unit_interval_accepts_endpoints() {
        assert_eq!(unit_interval("alpha", 0.0).unwrap(), 0.0);
        assert_eq!(unit_interval("alpha", 1.0).unwrap(), 1.0);
        assert!(unit_interval("alpha", 1.5).is_err());
        assert!(unit_interval("alpha", -0.1).is_err());
    }
}
