//! Empirical discrete distribution over explicit values.

use std::fmt;

use rand::RngCore;

use super::{check_probability, moment_exponent, RandomVariable};
use crate::config::QuadratureConfig;
use crate::error::{Result, RvError};
use crate::random::WeightedSampler;
use crate::stats::kahan_sum;
use crate::support::Support;

/// Allowed deviation of the total probability from 1.
const MASS_TOLERANCE: f64 = 1e-9;

/// Discrete distribution placing probability `pᵢ` on value `vᵢ`.
///
/// Duplicate values are allowed; their masses are merged for
/// [`pmf`](Self::pmf), [`cdf`](RandomVariable::cdf) and moments. The
/// distribution has no density, so [`pdf`](RandomVariable::pdf) is
/// unsupported.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteDistribution {
    values: Vec<f64>,
    probabilities: Vec<f64>,
    /// Distinct values with positive merged mass, ascending.
    atoms: Vec<f64>,
    /// Cumulative mass at each atom.
    cumulative: Vec<f64>,
    masses: Vec<f64>,
    sampler: WeightedSampler,
    support: Support,
}

impl DiscreteDistribution {
    /// Creates a distribution from parallel value and probability lists.
    ///
    /// # Errors
    /// Returns [`RvError::Construction`] if the lists are empty or differ in
    /// length, a value is not finite, a probability is negative or not
    /// finite, or the probabilities do not sum to 1 (within 1e-9).
    pub fn new(values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self> {
        if values.is_empty() || values.len() != probabilities.len() {
            return Err(RvError::Construction(format!(
                "DiscreteRV requires equally long non-empty lists, got {} values and {} probabilities",
                values.len(),
                probabilities.len()
            )));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(RvError::Construction(format!(
                "DiscreteRV values must be finite, got {v}"
            )));
        }
        if let Some(p) = probabilities.iter().find(|p| !(p.is_finite() && **p >= 0.0)) {
            return Err(RvError::Construction(format!(
                "DiscreteRV probabilities must be non-negative, got {p}"
            )));
        }
        let total = kahan_sum(&probabilities);
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(RvError::Construction(format!(
                "DiscreteRV probabilities must sum to 1, got {total}"
            )));
        }

        let mut pairs: Vec<(f64, f64)> = values
            .iter()
            .copied()
            .zip(probabilities.iter().copied())
            .filter(|&(_, p)| p > 0.0)
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut atoms: Vec<f64> = Vec::with_capacity(pairs.len());
        let mut masses: Vec<f64> = Vec::with_capacity(pairs.len());
        for (v, p) in pairs {
            if atoms.last() == Some(&v) {
                if let Some(m) = masses.last_mut() {
                    *m += p;
                }
            } else {
                atoms.push(v);
                masses.push(p);
            }
        }

        let cumulative: Vec<f64> = masses
            .iter()
            .scan(0.0, |running, &m| {
                *running += m;
                Some(*running)
            })
            .collect();

        let sampler = WeightedSampler::new(&probabilities).ok_or_else(|| {
            RvError::Construction("DiscreteRV requires a positive probability".into())
        })?;
        let support = match (atoms.first(), atoms.last()) {
            (Some(&lo), Some(&hi)) => Support::new(lo, hi)?,
            _ => {
                return Err(RvError::Construction(
                    "DiscreteRV requires a positive probability".into(),
                ))
            }
        };

        Ok(Self {
            values,
            probabilities,
            atoms,
            cumulative,
            masses,
            sampler,
            support,
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability mass `P(X = x)`, merged over duplicate values.
    pub fn pmf(&self, x: f64) -> f64 {
        self.atoms
            .iter()
            .position(|&v| v == x)
            .map_or(0.0, |i| self.masses[i])
    }
}

impl RandomVariable for DiscreteDistribution {
    fn name(&self) -> &'static str {
        "DiscreteDistribution"
    }

    fn support(&self) -> Support {
        self.support
    }

    fn pdf(&self, _x: f64) -> Result<f64> {
        Err(RvError::unsupported("pdf", self.name()))
    }

    fn cdf(&self, x: f64) -> Result<f64> {
        let n = self.atoms.partition_point(|&v| v <= x);
        if n == 0 {
            return Ok(0.0);
        }
        if n == self.atoms.len() {
            return Ok(1.0);
        }
        Ok(self.cumulative[n - 1].min(1.0))
    }

    fn moment(&self, i: u32) -> Result<f64> {
        self.partial_moment(i, None, None, &QuadratureConfig::default())
    }

    /// `Σ pᵢ·vᵢ^i` over the atoms with `a < vᵢ ≤ b`; no quadrature involved.
    fn partial_moment(
        &self,
        i: u32,
        a: Option<f64>,
        b: Option<f64>,
        _config: &QuadratureConfig,
    ) -> Result<f64> {
        let exponent = moment_exponent(i)?;
        let terms: Vec<f64> = self
            .atoms
            .iter()
            .zip(&self.masses)
            .filter(|&(&v, _)| a.map_or(true, |a| v > a) && b.map_or(true, |b| v <= b))
            .map(|(&v, &p)| p * v.powi(exponent))
            .collect();
        Ok(kahan_sum(&terms))
    }

    /// Smallest value `v` with `P(X ≤ v) ≥ p`.
    fn quantile(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        let i = self
            .cumulative
            .partition_point(|&c| c < p)
            .min(self.atoms.len() - 1);
        Ok(self.atoms[i])
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        Ok(self.values[self.sampler.sample(rng)])
    }
}

impl fmt::Display for DiscreteDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DiscreteRV(p_l={:?}, v_l={:?})",
            self.probabilities, self.values
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn discrete_mean_within_support(
            values in proptest::collection::vec(-100.0_f64..100.0, 1..20),
            weights in proptest::collection::vec(0.01_f64..1.0, 20),
        ) {
            let w = &weights[..values.len()];
            let total: f64 = w.iter().sum();
            let probs: Vec<f64> = w.iter().map(|x| x / total).collect();
            if let Ok(d) = DiscreteDistribution::new(values, probs) {
                let m = d.mean().unwrap();
                let s = d.support();
                prop_assert!(m >= s.lower() - 1e-9 && m <= s.upper() + 1e-9);
                prop_assert_eq!(d.cdf(s.upper()).unwrap(), 1.0);
            }
        }
    }
}
