//! # u-randvar
//!
//! Random-variable primitives for queueing and simulation models.
//!
//! Every distribution implements [`RandomVariable`]: density, distribution
//! function, tail, raw moments, quantile and sampling, each returning a
//! [`Result`] so that an operation a distribution cannot provide is reported
//! as [`RvError::Unsupported`] rather than a silent placeholder.
//!
//! ## Modules
//!
//! - [`distributions`] — Shifted exponential, truncated Pareto, discrete,
//!   sums, round-robin selection and truncated views
//! - [`stats`] — Interval probability, conditional moments, coefficient of
//!   variation
//! - [`quadrature`] — Adaptive Gauss–Kronrod integration used for moments
//!   without a closed form
//! - [`support`] — Closed intervals carrying a distribution's mass
//! - [`special`] — Gamma function and factorials
//! - [`random`] — Seeded RNG construction and weighted index sampling
//! - [`config`] — Quadrature tolerances
//! - [`error`] — Error taxonomy
//!
//! ## Example
//!
//! ```
//! use u_randvar::{stats, RandomVariable, ShiftedExponential};
//!
//! let x = ShiftedExponential::new(1.0, 0.0).unwrap();
//! let below = stats::prob(&x, None, Some(0.5)).unwrap();
//! let above = stats::prob(&x, Some(0.5), None).unwrap();
//!
//! // Law of total expectation over a two-piece partition.
//! let total = below * stats::mean(&x, None, Some(0.5)).unwrap()
//!     + above * stats::mean(&x, Some(0.5), None).unwrap();
//! assert!((total - x.mean().unwrap()).abs() < 1e-8);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: `expm1`/`ln_1p` forms near removable
//!   singularities, compensated summation for discrete moments
//! - **Explicit failure**: unsupported operations and out-of-domain
//!   arguments are typed errors
//! - **Property-based testing**: Mathematical invariants verified via proptest

pub mod config;
pub mod distributions;
pub mod error;
pub mod quadrature;
pub mod random;
pub mod special;
pub mod stats;
pub mod support;

pub use config::QuadratureConfig;
pub use distributions::{
    CyclicSelection, DiscreteDistribution, RandomVariable, ShiftedExponential, SumOfIndependent,
    TruncatedPareto, TruncatedView,
};
pub use error::{Result, RvError, Severity};
pub use support::Support;
