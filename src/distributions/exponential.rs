//! Shifted exponential distribution.

use std::fmt;

use rand::RngCore;
use rand_distr::{Distribution, Exp1};

use super::{check_probability, moment_exponent, RandomVariable};
use crate::error::{Result, RvError};
use crate::special;
use crate::support::Support;

/// Exponential distribution with rate μ shifted right by D ≥ 0.
///
/// # Mathematical Definition
/// - PDF: f(x) = μ·exp(−μ(x−D)) for x > D
/// - CDF: F(x) = 1 − exp(−μ(x−D)) for x > D
/// - Mean: D + 1/μ
/// - Variance: 1/μ²
///
/// # Moments and the shift
///
/// [`moment`](RandomVariable::moment) returns `Γ(i+1)/μ^i`, the raw moment of
/// the *unshifted* variable. For `D ≠ 0` this ignores the shift; a warning is
/// logged on every such call. [`mean`](RandomVariable::mean) and
/// [`variance`](RandomVariable::variance) are exact for any `D`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftedExponential {
    mu: f64,
    shift: f64,
    support: Support,
}

impl ShiftedExponential {
    /// Creates `D + Exp(μ)`.
    ///
    /// # Errors
    /// Returns [`RvError::Construction`] unless `μ > 0` and `D ≥ 0`, both finite.
    pub fn new(mu: f64, shift: f64) -> Result<Self> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(RvError::Construction(format!(
                "Exp requires finite mu > 0, got mu={mu}"
            )));
        }
        if !shift.is_finite() || shift < 0.0 {
            return Err(RvError::Construction(format!(
                "Exp requires finite shift D >= 0, got D={shift}"
            )));
        }
        Ok(Self {
            mu,
            shift,
            support: Support::new(shift, f64::INFINITY)?,
        })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Laplace transform `E[e^{−sX}] = μ/(s+μ)`.
    ///
    /// # Errors
    /// [`RvError::Unsupported`] when the variable is shifted (`D ≠ 0`).
    pub fn laplace(&self, s: f64) -> Result<f64> {
        if self.shift != 0.0 {
            return Err(RvError::unsupported(
                "laplace (undefined for shifted variable, D != 0)",
                self.to_string(),
            ));
        }
        Ok(self.mu / (s + self.mu))
    }
}

impl RandomVariable for ShiftedExponential {
    fn name(&self) -> &'static str {
        "ShiftedExponential"
    }

    fn support(&self) -> Support {
        self.support
    }

    fn pdf(&self, x: f64) -> Result<f64> {
        if x <= self.shift {
            return Ok(0.0);
        }
        Ok(self.mu * (-self.mu * (x - self.shift)).exp())
    }

    fn cdf(&self, x: f64) -> Result<f64> {
        if x <= self.shift {
            return Ok(0.0);
        }
        Ok(-(-self.mu * (x - self.shift)).exp_m1())
    }

    fn tail(&self, x: f64) -> Result<f64> {
        if x <= self.shift {
            return Ok(1.0);
        }
        Ok((-self.mu * (x - self.shift)).exp())
    }

    fn moment(&self, i: u32) -> Result<f64> {
        let exponent = moment_exponent(i)?;
        if self.shift != 0.0 {
            log::warn!(
                "{self}: moment({i}) uses Γ(i+1)/mu^i, which ignores the shift D={}",
                self.shift
            );
        }
        Ok(special::factorial(i) / self.mu.powi(exponent))
    }

    fn mean(&self) -> Result<f64> {
        Ok(self.shift + 1.0 / self.mu)
    }

    fn variance(&self) -> Result<f64> {
        Ok(1.0 / (self.mu * self.mu))
    }

    /// `F⁻¹(p) = D − ln(1−p)/μ`; `F⁻¹(1) = ∞`.
    fn quantile(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        Ok(self.shift - (-p).ln_1p() / self.mu)
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        let e: f64 = Exp1.sample(rng);
        Ok(self.shift + e / self.mu)
    }
}

impl fmt::Display for ShiftedExponential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift == 0.0 {
            write!(f, "Exp(mu={})", self.mu)
        } else {
            write!(f, "{} + Exp(mu={})", self.shift, self.mu)
        }
    }
}
