//! Numerical-integration settings.
//!
//! Conditional moments of distributions without a closed form are computed
//! by adaptive quadrature (see [`crate::quadrature`]). These settings control
//! when that routine stops refining.

use crate::error::{Result, RvError};

/// Configuration for adaptive quadrature.
///
/// Integration stops once the estimated absolute error is at most
/// `max(abs_tol, rel_tol · |estimate|)`. If that has not happened after
/// `max_subdivisions` bisections the integral is reported as
/// [`RvError::Convergence`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureConfig {
    /// Absolute error tolerance. Default: 1e-10.
    pub abs_tol: f64,

    /// Relative error tolerance. Default: 1e-10.
    pub rel_tol: f64,

    /// Maximum number of interval bisections. Default: 200.
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            abs_tol: 1e-10,
            rel_tol: 1e-10,
            max_subdivisions: 200,
        }
    }
}

impl QuadratureConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    /// Returns [`RvError::Construction`] if a tolerance is not a positive
    /// finite number or `max_subdivisions` is zero.
    pub fn new(abs_tol: f64, rel_tol: f64, max_subdivisions: usize) -> Result<Self> {
        let config = Self {
            abs_tol,
            rel_tol,
            max_subdivisions,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    pub fn with_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    pub fn with_max_subdivisions(mut self, max_subdivisions: usize) -> Self {
        self.max_subdivisions = max_subdivisions;
        self
    }

    /// Checks that the settings can drive the integrator.
    pub fn validate(&self) -> Result<()> {
        if !(self.abs_tol.is_finite() && self.abs_tol > 0.0) {
            return Err(RvError::Construction(format!(
                "abs_tol must be positive and finite, got {}",
                self.abs_tol
            )));
        }
        if !(self.rel_tol.is_finite() && self.rel_tol > 0.0) {
            return Err(RvError::Construction(format!(
                "rel_tol must be positive and finite, got {}",
                self.rel_tol
            )));
        }
        if self.max_subdivisions == 0 {
            return Err(RvError::Construction(
                "max_subdivisions must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Tolerance the integrator must meet for an estimate of `value`.
    pub(crate) fn tolerance_for(&self, value: f64) -> f64 {
        self.abs_tol.max(self.rel_tol * value.abs())
    }
}
