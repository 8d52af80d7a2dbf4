//! Support bounds shared by every distribution.

use std::fmt;

use crate::error::{Result, RvError};

/// The interval `[lower, upper]` on which a distribution places its mass.
///
/// `upper` may be `+∞`. Whether each end is attained is a property of the
/// distribution; the bounds themselves are stored as plain `f64` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    lower: f64,
    upper: f64,
}

impl Support {
    /// Creates a support interval.
    ///
    /// # Errors
    /// Returns [`RvError::Construction`] if either bound is NaN or `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(RvError::Construction(format!(
                "support bounds must not be NaN, got [{lower}, {upper}]"
            )));
        }
        if lower > upper {
            return Err(RvError::Construction(format!(
                "l= {lower} should be <= u= {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if `x ∈ [lower, upper]`.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Intersection with the optional interval `(a, b)`.
    ///
    /// Missing bounds leave the corresponding end unchanged.
    pub fn restrict(&self, a: Option<f64>, b: Option<f64>) -> Result<Self> {
        let lower = a.map_or(self.lower, |a| self.lower.max(a));
        let upper = b.map_or(self.upper, |b| self.upper.min(b));
        Self::new(lower, upper)
    }
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}
