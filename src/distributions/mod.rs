//! Probability distributions behind a single [`RandomVariable`] contract.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Support | Analytic operations |
//! |---|---|---|---|
//! | [`ShiftedExponential`] | μ, D | [D, ∞) | pdf, cdf, quantile, moments, Laplace |
//! | [`TruncatedPareto`] | l, u, α | [l, u) | pdf, cdf, quantile, moments |
//! | [`DiscreteDistribution`] | values, probabilities | [min v, max v] | pmf, cdf, quantile, moments |
//! | [`SumOfIndependent`] | components | Σ bounds | mean, variance |
//! | [`CyclicSelection`] | components | [min l, max u] | sampling only |
//! | [`TruncatedView`] | X, (a, b) | [max(l,a), min(u,b)] | pdf, cdf, quantile, moments by quadrature |
//!
//! Operations a distribution cannot support return
//! [`RvError::Unsupported`] instead of a placeholder value.
//!
//! # Sampling
//!
//! `sample` takes `&mut dyn RngCore` so the trait stays object-safe and
//! components of different types can be mixed behind `Arc<dyn RandomVariable>`.
//! Only [`CyclicSelection`] changes state when sampled.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;

use crate::config::QuadratureConfig;
use crate::error::{Result, RvError};
use crate::quadrature::integrate;
use crate::support::Support;

mod composite;
mod discrete;
mod exponential;
mod pareto;
mod truncated;

pub use composite::{CyclicSelection, SumOfIndependent};
pub use discrete::DiscreteDistribution;
pub use exponential::ShiftedExponential;
pub use pareto::TruncatedPareto;
pub use truncated::TruncatedView;

/// Uniform contract for a real-valued random variable.
///
/// `Display` renders the distribution with its parameters, e.g. `Exp(mu=2)`.
pub trait RandomVariable: fmt::Display {
    /// Short type name used in error messages.
    fn name(&self) -> &'static str;

    /// The interval `[l, u]` carrying all probability mass.
    fn support(&self) -> Support;

    /// Probability density at `x`; zero outside the support.
    fn pdf(&self, x: f64) -> Result<f64>;

    /// `P(X ≤ x)`; 0 below the support, 1 at or above its upper bound.
    fn cdf(&self, x: f64) -> Result<f64>;

    /// `P(X > x) = 1 − cdf(x)`.
    fn tail(&self, x: f64) -> Result<f64> {
        Ok(1.0 - self.cdf(x)?)
    }

    /// Raw moment `E[X^i]`.
    fn moment(&self, i: u32) -> Result<f64>;

    /// Unnormalised partial moment `E[X^i; a < X ≤ b]`, the contribution of
    /// the interval to the raw moment. A missing bound leaves that side open.
    ///
    /// The default integrates `x^i·pdf(x)` over the support clipped to the
    /// interval, so it fails for distributions without a density. Discrete
    /// distributions sum over their atoms instead.
    fn partial_moment(
        &self,
        i: u32,
        a: Option<f64>,
        b: Option<f64>,
        config: &QuadratureConfig,
    ) -> Result<f64> {
        let exponent = moment_exponent(i)?;
        let support = self.support();
        let lower = a.map_or(support.lower(), |a| support.lower().max(a));
        let upper = b.map_or(support.upper(), |b| support.upper().min(b));
        if !(lower < upper) {
            return Ok(0.0);
        }
        integrate(|x| Ok(x.powi(exponent) * self.pdf(x)?), lower, upper, config)
    }

    fn mean(&self) -> Result<f64> {
        self.moment(1)
    }

    fn variance(&self) -> Result<f64> {
        let m = self.mean()?;
        Ok((self.moment(2)? - m * m).max(0.0))
    }

    fn std_dev(&self) -> Result<f64> {
        Ok(self.variance()?.sqrt())
    }

    /// Inverse CDF `F⁻¹(p)` for `p ∈ [0, 1]`.
    fn quantile(&self, _p: f64) -> Result<f64> {
        Err(RvError::unsupported("quantile", self.name()))
    }

    /// Draws one value within the support.
    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64>;

    /// Draws `n` values.
    fn sample_n(&self, n: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// Rejects probabilities outside `[0, 1]`.
pub(crate) fn check_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(RvError::Domain(format!(
            "Prob p= {p}, has to lie in [0, 1]."
        )));
    }
    Ok(())
}

/// Moment order as a `powi` exponent.
pub(crate) fn moment_exponent(i: u32) -> Result<i32> {
    i32::try_from(i)
        .map_err(|_| RvError::Domain(format!("moment order i= {i} exceeds {}", i32::MAX)))
}

/// Support of a list of components, or a construction error if it is empty.
pub(crate) fn component_supports<D: RandomVariable>(
    components: &[D],
    kind: &str,
) -> Result<Vec<Support>> {
    if components.is_empty() {
        return Err(RvError::Construction(format!(
            "{kind} requires at least one component"
        )));
    }
    Ok(components.iter().map(|c| c.support()).collect())
}

macro_rules! forward_random_variable {
    ($($ty:ty),*) => {$(
        impl<T: RandomVariable + ?Sized> RandomVariable for $ty {
            fn name(&self) -> &'static str {
                (**self).name()
            }
            fn support(&self) -> Support {
                (**self).support()
            }
            fn pdf(&self, x: f64) -> Result<f64> {
                (**self).pdf(x)
            }
            fn cdf(&self, x: f64) -> Result<f64> {
                (**self).cdf(x)
            }
            fn tail(&self, x: f64) -> Result<f64> {
                (**self).tail(x)
            }
            fn moment(&self, i: u32) -> Result<f64> {
                (**self).moment(i)
            }
            fn partial_moment(
                &self,
                i: u32,
                a: Option<f64>,
                b: Option<f64>,
                config: &QuadratureConfig,
            ) -> Result<f64> {
                (**self).partial_moment(i, a, b, config)
            }
            fn mean(&self) -> Result<f64> {
                (**self).mean()
            }
            fn variance(&self) -> Result<f64> {
                (**self).variance()
            }
            fn std_dev(&self) -> Result<f64> {
                (**self).std_dev()
            }
            fn quantile(&self, p: f64) -> Result<f64> {
                (**self).quantile(p)
            }
            fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
                (**self).sample(rng)
            }
        }
    )*};
}

forward_random_variable!(&T, Box<T>, Arc<T>);
