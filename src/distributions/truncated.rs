//! Conditioning a distribution on an interval.

use std::fmt;

use rand::{Rng, RngCore};

use super::{check_probability, RandomVariable};
use crate::config::QuadratureConfig;
use crate::error::{Result, RvError};
use crate::support::Support;

/// `X` conditioned on `a < X ≤ b`, rescaled to unit mass.
///
/// Either bound may be omitted, but not both. The probabilities
/// `P(X ≤ a)`, `P(X ≤ b)` and their difference (the conditioning mass) are
/// computed once at construction.
///
/// # Mathematical Definition
/// With `m = F(b) − F(a)`:
/// - PDF: f(x)/m on the truncated support, 0 elsewhere
/// - CDF: (F(x) − F(a))/m
/// - Quantile: F⁻¹(p·m + F(a))
/// - Moment: E[X^i; a < X ≤ b] / m from the inner
///   [`partial_moment`](RandomVariable::partial_moment): adaptive quadrature
///   of `x^i·f(x)` for densities, a sum over atoms for discrete laws.
#[derive(Debug, Clone)]
pub struct TruncatedView<D> {
    inner: D,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    p_lower: f64,
    p_upper: f64,
    mass: f64,
    support: Support,
    quadrature: QuadratureConfig,
}

impl<D: RandomVariable> TruncatedView<D> {
    /// Conditions `inner` on `(a, b)` with the default quadrature settings.
    ///
    /// # Errors
    /// [`RvError::Construction`] if both bounds are missing, `a ≥ b`, the
    /// interval misses the support of `inner`, or the conditioning mass is
    /// not positive. Errors from `inner.cdf` are passed through.
    pub fn new(inner: D, a: Option<f64>, b: Option<f64>) -> Result<Self> {
        Self::with_quadrature(inner, a, b, QuadratureConfig::default())
    }

    /// Like [`new`](Self::new), with explicit quadrature settings for
    /// [`moment`](RandomVariable::moment).
    pub fn with_quadrature(
        inner: D,
        a: Option<f64>,
        b: Option<f64>,
        quadrature: QuadratureConfig,
    ) -> Result<Self> {
        quadrature.validate()?;
        match (a, b) {
            (None, None) => {
                return Err(RvError::Construction(
                    "Either lower or upper boundary should be given.".into(),
                ))
            }
            (Some(a), Some(b)) if !(a < b) => {
                return Err(RvError::Construction(format!(
                    "a= {a} < b= {b} should have hold!"
                )))
            }
            _ => {}
        }
        if a.is_some_and(f64::is_nan) || b.is_some_and(f64::is_nan) {
            return Err(RvError::Construction("truncation bounds must not be NaN".into()));
        }

        let support = inner.support().restrict(a, b)?;
        let p_lower = a.map_or(Ok(0.0), |a| inner.cdf(a))?;
        let p_upper = b.map_or(Ok(1.0), |b| inner.cdf(b))?;
        let mass = p_upper - p_lower;
        log::trace!("truncating {inner} to {support}: P(X<=a)={p_lower}, P(X<=b)={p_upper}, mass={mass}");

        if !(mass > 0.0) {
            return Err(RvError::Construction(format!(
                "conditioning mass of {inner} on (a={a:?}, b={b:?}) must be positive, got {mass}"
            )));
        }

        Ok(Self {
            inner,
            lower_bound: a,
            upper_bound: b,
            p_lower,
            p_upper,
            mass,
            support,
            quadrature,
        })
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// `P(X ≤ a)`, or 0 without a lower bound.
    pub fn p_lower(&self) -> f64 {
        self.p_lower
    }

    /// `P(X ≤ b)`, or 1 without an upper bound.
    pub fn p_upper(&self) -> f64 {
        self.p_upper
    }

    /// Conditioning mass `P(a < X ≤ b)`.
    pub fn mass(&self) -> f64 {
        self.mass
    }
}

impl<D: RandomVariable> RandomVariable for TruncatedView<D> {
    fn name(&self) -> &'static str {
        "TruncatedView"
    }

    fn support(&self) -> Support {
        self.support
    }

    fn pdf(&self, x: f64) -> Result<f64> {
        if !self.support.contains(x) {
            return Ok(0.0);
        }
        Ok(self.inner.pdf(x)? / self.mass)
    }

    fn cdf(&self, x: f64) -> Result<f64> {
        if x < self.support.lower() {
            return Ok(0.0);
        }
        if x >= self.support.upper() {
            return Ok(1.0);
        }
        Ok(((self.inner.cdf(x)? - self.p_lower) / self.mass).clamp(0.0, 1.0))
    }

    fn moment(&self, i: u32) -> Result<f64> {
        let partial =
            self.inner
                .partial_moment(i, self.lower_bound, self.upper_bound, &self.quadrature)?;
        Ok(partial / self.mass)
    }

    /// Partial moment of the view: the inner partial moment over the
    /// intersection of both intervals, rescaled by the conditioning mass.
    fn partial_moment(
        &self,
        i: u32,
        a: Option<f64>,
        b: Option<f64>,
        config: &QuadratureConfig,
    ) -> Result<f64> {
        let lower = tighter(self.lower_bound, a, f64::max);
        let upper = tighter(self.upper_bound, b, f64::min);
        if let (Some(l), Some(u)) = (lower, upper) {
            if !(l < u) {
                return Ok(0.0);
            }
        }
        Ok(self.inner.partial_moment(i, lower, upper, config)? / self.mass)
    }

    fn quantile(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        let x = self.inner.quantile(p * self.mass + self.p_lower)?;
        Ok(x.clamp(self.support.lower(), self.support.upper()))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        let u: f64 = rng.random();
        self.quantile(u)
    }
}

fn tighter(own: Option<f64>, other: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (own, other) {
        (Some(x), Some(y)) => Some(pick(x, y)),
        (x, None) => x,
        (None, y) => y,
    }
}

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map_or_else(|| "None".to_string(), |v| v.to_string())
}

impl<D: RandomVariable> fmt::Display for TruncatedView<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TruncatedX(X={}, a={}, b={})",
            self.inner,
            fmt_bound(self.lower_bound),
            fmt_bound(self.upper_bound)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{
        DiscreteDistribution, ShiftedExponential, SumOfIndependent, TruncatedPareto,
    };
    use crate::random::create_rng;
    use approx::assert_relative_eq;

    fn exp1() -> ShiftedExponential {
        ShiftedExponential::new(1.0, 0.0).unwrap()
    }

    #[test]
    fn test_truncated_cached_probabilities() {
        let t = TruncatedView::new(exp1(), Some(0.2), Some(0.5)).unwrap();
        let x = exp1();
        assert_relative_eq!(t.p_lower(), x.cdf(0.2).unwrap(), epsilon = 1e-15);
        assert_relative_eq!(t.p_upper(), x.cdf(0.5).unwrap(), epsilon = 1e-15);
        assert_relative_eq!(
            t.mass(),
            (-0.2_f64).exp() - (-0.5_f64).exp(),
            epsilon = 1e-14
        );
        assert_eq!(t.support().lower(), 0.2);
        assert_eq!(t.support().upper(), 0.5);
    }

    #[test]
    fn test_truncated_cdf_and_pdf() {
        let t = TruncatedView::new(exp1(), Some(0.2), Some(0.5)).unwrap();
        assert_eq!(t.cdf(0.1).unwrap(), 0.0);
        assert!(t.cdf(0.2).unwrap().abs() < 1e-15);
        assert_eq!(t.cdf(0.5).unwrap(), 1.0);
        assert_eq!(t.pdf(0.6).unwrap(), 0.0);
        assert_eq!(t.pdf(0.1).unwrap(), 0.0);
        assert_relative_eq!(
            t.pdf(0.3).unwrap(),
            (-0.3_f64).exp() / t.mass(),
            epsilon = 1e-14
        );
        // Density of the view integrates to one.
        assert_relative_eq!(t.moment(0).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_truncated_mean_closed_form() {
        // ∫ₐᵇ x e^{-x} dx = (a+1)e^{-a} − (b+1)e^{-b}
        let (a, b) = (0.2_f64, 0.5_f64);
        let t = TruncatedView::new(exp1(), Some(a), Some(b)).unwrap();
        let expected = ((a + 1.0) * (-a).exp() - (b + 1.0) * (-b).exp()) / t.mass();
        assert_relative_eq!(t.mean().unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_truncated_memoryless_upper_tail() {
        // E[X | X > a] = a + 1/mu for the exponential.
        let t = TruncatedView::new(exp1(), Some(0.5), None).unwrap();
        assert!(t.support().upper().is_infinite());
        assert_relative_eq!(t.mean().unwrap(), 1.5, epsilon = 1e-8);
        assert_relative_eq!(t.variance().unwrap(), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_truncated_quantile_and_sampling() {
        let t = TruncatedView::new(exp1(), Some(0.2), Some(0.5)).unwrap();
        assert_relative_eq!(t.quantile(0.0).unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(t.quantile(1.0).unwrap(), 0.5, epsilon = 1e-12);
        let q = t.quantile(0.37).unwrap();
        assert_relative_eq!(t.cdf(q).unwrap(), 0.37, epsilon = 1e-12);
        assert!(matches!(t.quantile(1.2), Err(RvError::Domain(_))));

        let mut rng = create_rng(42);
        let xs = t.sample_n(20_000, &mut rng).unwrap();
        assert!(xs.iter().all(|&x| (0.2..=0.5).contains(&x)));
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((mean - t.mean().unwrap()).abs() < 0.005, "sample mean {mean}");
    }

    #[test]
    fn test_truncated_pareto() {
        let p = TruncatedPareto::new(1.0, 10.0, 2.0).unwrap();
        let t = TruncatedView::new(&p, Some(2.0), Some(5.0)).unwrap();
        // Truncating a Pareto is again a truncated Pareto on the narrower range.
        let direct = TruncatedPareto::new(2.0, 5.0, 2.0).unwrap();
        assert_relative_eq!(t.mean().unwrap(), direct.mean().unwrap(), epsilon = 1e-9);
        assert_relative_eq!(t.cdf(3.0).unwrap(), direct.cdf(3.0).unwrap(), epsilon = 1e-12);
        assert_relative_eq!(
            t.quantile(0.6).unwrap(),
            direct.quantile(0.6).unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_truncated_discrete_moments() {
        let d = DiscreteDistribution::new(vec![1.0, 2.0, 3.0], vec![0.2, 0.3, 0.5]).unwrap();
        let t = TruncatedView::new(&d, Some(1.5), None).unwrap();
        assert_relative_eq!(t.mass(), 0.8, epsilon = 1e-15);
        // (0.3·2 + 0.5·3) / 0.8
        assert_relative_eq!(t.mean().unwrap(), 2.625, epsilon = 1e-12);
        // (0.3·4 + 0.5·9) / 0.8 − 2.625²
        assert_relative_eq!(t.variance().unwrap(), 5.7 / 0.8 - 2.625 * 2.625, epsilon = 1e-12);

        // The upper bound is inclusive, the lower exclusive.
        let t = TruncatedView::new(&d, Some(1.0), Some(2.0)).unwrap();
        assert_relative_eq!(t.mean().unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_truncated_view_of_view() {
        let d = DiscreteDistribution::new(vec![1.0, 2.0, 3.0], vec![0.2, 0.3, 0.5]).unwrap();
        let outer = TruncatedView::new(&d, Some(1.5), None).unwrap();
        let inner = TruncatedView::new(&outer, None, Some(2.5)).unwrap();
        // Only the atom at 2 survives both cuts.
        assert_relative_eq!(inner.mean().unwrap(), 2.0, epsilon = 1e-12);

        let x = exp1();
        let once = TruncatedView::new(&x, Some(0.2), Some(0.5)).unwrap();
        let twice = TruncatedView::new(
            TruncatedView::new(&x, Some(0.2), None).unwrap(),
            None,
            Some(0.5),
        )
        .unwrap();
        assert_relative_eq!(twice.mean().unwrap(), once.mean().unwrap(), epsilon = 1e-9);
    }

    #[test]
    fn test_truncated_requires_a_bound() {
        assert!(matches!(
            TruncatedView::new(exp1(), None, None),
            Err(RvError::Construction(_))
        ));
    }

    #[test]
    fn test_truncated_rejects_inverted_interval() {
        assert!(TruncatedView::new(exp1(), Some(0.5), Some(0.5)).is_err());
        assert!(TruncatedView::new(exp1(), Some(0.7), Some(0.5)).is_err());
        assert!(TruncatedView::new(exp1(), Some(f64::NAN), None).is_err());
    }

    #[test]
    fn test_truncated_zero_mass_fails_at_construction() {
        // Support collapses to the single point 0.
        assert!(matches!(
            TruncatedView::new(exp1(), None, Some(0.0)),
            Err(RvError::Construction(_))
        ));
        // Interval entirely below the support.
        let shifted = ShiftedExponential::new(1.0, 2.0).unwrap();
        assert!(matches!(
            TruncatedView::new(shifted, Some(0.0), Some(1.0)),
            Err(RvError::Construction(_))
        ));
    }

    #[test]
    fn test_truncated_composite_without_cdf() {
        let s = SumOfIndependent::new(vec![exp1(), exp1()]).unwrap();
        assert!(matches!(
            TruncatedView::new(&s, Some(1.0), None),
            Err(RvError::Unsupported { operation: "cdf", .. })
        ));
    }

    #[test]
    fn test_truncated_invalid_quadrature() {
        let bad = QuadratureConfig::default().with_rel_tol(0.0);
        assert!(matches!(
            TruncatedView::with_quadrature(exp1(), Some(0.1), None, bad),
            Err(RvError::Construction(_))
        ));
    }

    #[test]
    fn test_truncated_display() {
        let t = TruncatedView::new(exp1(), None, Some(0.5)).unwrap();
        assert_eq!(t.to_string(), "TruncatedX(X=Exp(mu=1), a=None, b=0.5)");
    }
}
