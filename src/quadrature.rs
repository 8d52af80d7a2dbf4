//! Adaptive numerical integration.
//!
//! Globally adaptive Gauss–Kronrod quadrature: each interval is integrated
//! with the 15-point Kronrod rule, its error estimated against the embedded
//! 7-point Gauss rule, and the interval with the largest estimated error is
//! bisected until the total error meets the configured tolerance.
//!
//! Infinite limits are handled by the substitution `x = a + t/(1−t)` (and its
//! mirror image), mapping the half-line onto `(0, 1)`. Kronrod nodes are
//! interior, so the singular endpoint `t = 1` is never evaluated.
//!
//! Reference: Piessens et al. (1983), *QUADPACK*, routines QK15 and QAG.

use crate::config::QuadratureConfig;
use crate::error::{Result, RvError};

/// Kronrod abscissae on `[0, 1]`; odd indices are the Gauss-7 nodes, index 7 is the centre.
#[allow(clippy::excessive_precision)]
const XGK: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

#[allow(clippy::excessive_precision)]
const WGK: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

#[allow(clippy::excessive_precision)]
const WG: [f64; 4] = [
    0.129484966168869693270611432679082,
    0.279705391489276667901467771423780,
    0.381830050505118944950369775488975,
    0.417959183673469387755102040816327,
];

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Integrates `f` over `[a, b]`; either limit may be infinite.
///
/// The integrand is fallible so that distribution densities, which may
/// report unsupported operations, can be integrated directly.
///
/// # Errors
/// - Any error returned by `f`.
/// - [`RvError::Domain`] if a limit is NaN or `f` returns a non-finite value.
/// - [`RvError::Convergence`] if the tolerance is not met within
///   `config.max_subdivisions` bisections.
///
/// # Examples
/// ```
/// use u_randvar::config::QuadratureConfig;
/// use u_randvar::quadrature::integrate;
/// let v = integrate(|x| Ok((-x).exp()), 0.0, f64::INFINITY, &QuadratureConfig::default()).unwrap();
/// assert!((v - 1.0).abs() < 1e-10);
/// ```
pub fn integrate<F>(f: F, a: f64, b: f64, config: &QuadratureConfig) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    config.validate()?;
    integrate_dyn(&f, a, b, config)
}

fn integrate_dyn(
    f: &dyn Fn(f64) -> Result<f64>,
    a: f64,
    b: f64,
    config: &QuadratureConfig,
) -> Result<f64> {
    if a.is_nan() || b.is_nan() {
        return Err(RvError::Domain(format!(
            "integration limits must not be NaN, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Ok(0.0);
    }
    if a > b {
        return Ok(-integrate_dyn(f, b, a, config)?);
    }

    match (a.is_finite(), b.is_finite()) {
        (true, true) => adaptive(f, a, b, config),
        (true, false) => {
            let mapped = |t: f64| -> Result<f64> {
                let s = 1.0 - t;
                Ok(f(a + t / s)? / (s * s))
            };
            adaptive(&mapped, 0.0, 1.0, config)
        }
        (false, true) => {
            let mapped = |t: f64| -> Result<f64> {
                let s = 1.0 - t;
                Ok(f(b - t / s)? / (s * s))
            };
            adaptive(&mapped, 0.0, 1.0, config)
        }
        (false, false) => {
            Ok(integrate_dyn(f, a, 0.0, config)? + integrate_dyn(f, 0.0, b, config)?)
        }
    }
}

/// 15-point Kronrod estimate and its distance from the 7-point Gauss estimate.
fn gauss_kronrod(f: &dyn Fn(f64) -> Result<f64>, a: f64, b: f64) -> Result<(f64, f64)> {
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let fc = eval(f, center)?;
    let mut kronrod = WGK[7] * fc;
    let mut gauss = WG[3] * fc;

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = eval(f, center - dx)? + eval(f, center + dx)?;
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Ok((kronrod * half, ((kronrod - gauss) * half).abs()))
}

fn eval(f: &dyn Fn(f64) -> Result<f64>, x: f64) -> Result<f64> {
    let y = f(x)?;
    if !y.is_finite() {
        return Err(RvError::Domain(format!(
            "integrand is not finite at x= {x} (value {y})"
        )));
    }
    Ok(y)
}

fn adaptive(
    f: &dyn Fn(f64) -> Result<f64>,
    a: f64,
    b: f64,
    config: &QuadratureConfig,
) -> Result<f64> {
    let (value, error) = gauss_kronrod(f, a, b)?;
    let mut segments = vec![Segment { a, b, value, error }];
    let mut total = value;
    let mut total_error = error;
    let mut subdivisions = 0;

    loop {
        let tolerance = config.tolerance_for(total);
        if total_error <= tolerance {
            log::debug!(
                "quadrature on [{a}, {b}] converged: value={total}, error={total_error:e}, subdivisions={subdivisions}"
            );
            return Ok(total);
        }
        if subdivisions >= config.max_subdivisions {
            return Err(RvError::Convergence {
                subdivisions,
                error_estimate: total_error,
                tolerance,
            });
        }

        let worst = match segments
            .iter()
            .enumerate()
            .max_by(|x, y| x.1.error.total_cmp(&y.1.error))
        {
            Some((i, _)) => segments.swap_remove(i),
            None => return Ok(total),
        };

        let mid = 0.5 * (worst.a + worst.b);
        let (lv, le) = gauss_kronrod(f, worst.a, mid)?;
        let (rv, re) = gauss_kronrod(f, mid, worst.b)?;
        segments.push(Segment {
            a: worst.a,
            b: mid,
            value: lv,
            error: le,
        });
        segments.push(Segment {
            a: mid,
            b: worst.b,
            value: rv,
            error: re,
        });
        subdivisions += 1;

        total = segments.iter().map(|s| s.value).sum();
        total_error = segments.iter().map(|s| s.error).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cfg() -> QuadratureConfig {
        QuadratureConfig::default()
    }

    #[test]
    fn test_polynomial_exact() {
        // ∫₀² x³ dx = 4
        let v = integrate(|x| Ok(x * x * x), 0.0, 2.0, &cfg()).unwrap();
        assert_relative_eq!(v, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_limits() {
        let v = integrate(|x| Ok(x), 1.0, 0.0, &cfg()).unwrap();
        assert_relative_eq!(v, -0.5, epsilon = 1e-12);
        assert_eq!(integrate(|x| Ok(x), 3.0, 3.0, &cfg()).unwrap(), 0.0);
    }

    #[test]
    fn test_upper_half_line() {
        // ∫₀^∞ x² e^{-x} dx = 2
        let v = integrate(|x| Ok(x * x * (-x).exp()), 0.0, f64::INFINITY, &cfg()).unwrap();
        assert_relative_eq!(v, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lower_half_line() {
        // ∫_{-∞}^0 e^{x} dx = 1
        let v = integrate(|x| Ok(x.exp()), f64::NEG_INFINITY, 0.0, &cfg()).unwrap();
        assert_relative_eq!(v, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_whole_line_gaussian() {
        let v = integrate(
            |x| Ok((-x * x).exp()),
            f64::NEG_INFINITY,
            f64::INFINITY,
            &cfg(),
        )
        .unwrap();
        assert_relative_eq!(v, std::f64::consts::PI.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_non_convergence_reported() {
        let tight = cfg().with_max_subdivisions(1);
        let r = integrate(|x| Ok(1.0 / x.sqrt()), 0.0, 1.0, &tight);
        assert!(matches!(r, Err(RvError::Convergence { subdivisions: 1, .. })));
    }

    #[test]
    fn test_integrand_error_propagates() {
        let r = integrate(
            |_| Err(RvError::unsupported("pdf", "test")),
            0.0,
            1.0,
            &cfg(),
        );
        assert!(matches!(r, Err(RvError::Unsupported { .. })));
    }

    #[test]
    fn test_nan_limit() {
        assert!(matches!(
            integrate(|x| Ok(x), f64::NAN, 1.0, &cfg()),
            Err(RvError::Domain(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let bad = cfg().with_abs_tol(-1.0);
        assert!(matches!(
            integrate(|x| Ok(x), 0.0, 1.0, &bad),
            Err(RvError::Construction(_))
        ));
    }
}
