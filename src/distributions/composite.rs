//! Distributions built from other distributions by sampling.
//!
//! Neither type computes a convolution or mixture density: they exist to
//! feed simulations with draws. Operations that would need the combined
//! density return [`RvError::Unsupported`].

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::RngCore;

use super::{component_supports, RandomVariable};
use crate::error::{Result, RvError};
use crate::support::Support;

fn write_components<D: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    components: &[D],
) -> fmt::Result {
    write!(f, "{label}(rv_l=[")?;
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, "])")
}

// ============================================================================
// Sum of independent variables
// ============================================================================

/// `X₁ + X₂ + … + Xₙ` for independent components.
///
/// Components are held as given; pass `Arc<dyn RandomVariable>` or
/// references to share them with other owners. The support is the
/// elementwise sum of the component supports.
///
/// Mean and variance follow from linearity and independence. The density,
/// distribution function and higher moments are unsupported.
#[derive(Debug, Clone)]
pub struct SumOfIndependent<D> {
    components: Vec<D>,
    support: Support,
}

impl<D: RandomVariable> SumOfIndependent<D> {
    /// # Errors
    /// Returns [`RvError::Construction`] if `components` is empty.
    pub fn new(components: Vec<D>) -> Result<Self> {
        let supports = component_supports(&components, "SumOfRVs")?;
        let lower: f64 = supports.iter().map(Support::lower).sum();
        let upper: f64 = supports.iter().map(Support::upper).sum();
        Ok(Self {
            components,
            support: Support::new(lower, upper)?,
        })
    }

    pub fn components(&self) -> &[D] {
        &self.components
    }
}

impl<D: RandomVariable> RandomVariable for SumOfIndependent<D> {
    fn name(&self) -> &'static str {
        "SumOfIndependent"
    }

    fn support(&self) -> Support {
        self.support
    }

    fn pdf(&self, _x: f64) -> Result<f64> {
        Err(RvError::unsupported("pdf", self.name()))
    }

    fn cdf(&self, _x: f64) -> Result<f64> {
        Err(RvError::unsupported("cdf", self.name()))
    }

    fn moment(&self, _i: u32) -> Result<f64> {
        Err(RvError::unsupported("moment", self.name()))
    }

    fn mean(&self) -> Result<f64> {
        self.components.iter().map(|c| c.mean()).sum()
    }

    fn variance(&self) -> Result<f64> {
        self.components.iter().map(|c| c.variance()).sum()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        self.components.iter().map(|c| c.sample(rng)).sum()
    }
}

impl<D: RandomVariable> fmt::Display for SumOfIndependent<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_components(f, "SumOfRVs", &self.components)
    }
}

// ============================================================================
// Cyclic selection
// ============================================================================

/// Round-robin over a list of distributions.
///
/// Each call to [`sample`](RandomVariable::sample) draws from the component
/// at the cursor and moves the cursor to the next component, wrapping at the
/// end. After `n` calls every one of the `n` components has been used once.
///
/// The cursor is the only mutable state and is advanced with an atomic
/// compare-and-swap, so concurrent callers each get a distinct slot.
#[derive(Debug)]
pub struct CyclicSelection<D> {
    components: Vec<D>,
    cursor: AtomicUsize,
    support: Support,
}

impl<D: RandomVariable> CyclicSelection<D> {
    /// # Errors
    /// Returns [`RvError::Construction`] if `components` is empty.
    pub fn new(components: Vec<D>) -> Result<Self> {
        let supports = component_supports(&components, "CycleOverRVs")?;
        let lower = supports
            .iter()
            .map(Support::lower)
            .fold(f64::INFINITY, f64::min);
        let upper = supports
            .iter()
            .map(Support::upper)
            .fold(f64::NEG_INFINITY, f64::max);
        Ok(Self {
            components,
            cursor: AtomicUsize::new(0),
            support: Support::new(lower, upper)?,
        })
    }

    pub fn components(&self) -> &[D] {
        &self.components
    }

    /// Index of the component the next sample is drawn from.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Claims the current slot and advances the cursor.
    fn advance(&self) -> usize {
        let n = self.components.len();
        match self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| Some((c + 1) % n))
        {
            Ok(i) | Err(i) => i,
        }
    }
}

impl<D: RandomVariable> RandomVariable for CyclicSelection<D> {
    fn name(&self) -> &'static str {
        "CyclicSelection"
    }

    fn support(&self) -> Support {
        self.support
    }

    fn pdf(&self, _x: f64) -> Result<f64> {
        Err(RvError::unsupported("pdf", self.name()))
    }

    fn cdf(&self, _x: f64) -> Result<f64> {
        Err(RvError::unsupported("cdf", self.name()))
    }

    fn moment(&self, _i: u32) -> Result<f64> {
        Err(RvError::unsupported("moment", self.name()))
    }

    fn mean(&self) -> Result<f64> {
        Err(RvError::unsupported("mean", self.name()))
    }

    fn variance(&self) -> Result<f64> {
        Err(RvError::unsupported("variance", self.name()))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Result<f64> {
        let i = self.advance();
        self.components[i].sample(rng)
    }
}

impl<D: RandomVariable> fmt::Display for CyclicSelection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_components(f, "CycleOverRVs", &self.components)
    }
}
