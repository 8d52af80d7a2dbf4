//! Random number generation and weighted index sampling.
//!
//! # Reproducibility
//!
//! Every `sample` method in this crate takes the generator as an argument.
//! For reproducible experiments, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::Rng;

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
///
/// # Examples
/// ```
/// use u_randvar::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Pre-computed weighted sampler for O(log n) repeated sampling.
///
/// Builds a cumulative table from the weights, then locates each uniform
/// threshold with a binary search. Zero weights are never selected.
///
/// # Complexity
/// - Construction: O(n)
/// - Sampling: O(log n)
///
/// # Examples
/// ```
/// use u_randvar::random::{create_rng, WeightedSampler};
/// let sampler = WeightedSampler::new(&[0.1, 0.2, 0.3, 0.4]).unwrap();
/// let mut rng = create_rng(42);
/// assert!(sampler.sample(&mut rng) < 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl WeightedSampler {
    /// Creates a new weighted sampler from the given weights.
    ///
    /// Negative and NaN weights count as zero.
    ///
    /// # Returns
    /// - `None` if `weights` is empty or no weight is positive.
    pub fn new(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() {
            return None;
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for &w in weights {
            if w > 0.0 {
                total += w;
            }
            cumulative.push(total);
        }

        if !(total > 0.0 && total.is_finite()) {
            return None;
        }

        Some(Self { cumulative, total })
    }

    /// Samples an index according to the weights.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let threshold = rng.random_range(0.0..self.total);
        self.cumulative
            .partition_point(|&c| c <= threshold)
            .min(self.cumulative.len() - 1)
    }

    /// Returns the number of categories.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Returns true if there are no categories.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Returns the total weight.
    pub fn total_weight(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);
        let vals1: Vec<f64> = (0..10).map(|_| rng1.random()).collect();
        let vals2: Vec<f64> = (0..10).map(|_| rng2.random()).collect();
        assert_eq!(vals1, vals2);
    }

    #[test]
    fn test_weighted_sampler_basic() {
        let sampler = WeightedSampler::new(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(sampler.len(), 3);
        assert!(!sampler.is_empty());
        assert!((sampler.total_weight() - 6.0).abs() < 1e-15);
    }

    #[test]
    fn test_weighted_sampler_skips_zero_weights() {
        let sampler = WeightedSampler::new(&[0.0, 0.0, 1.0]).unwrap();
        let mut rng = create_rng(42);
        for _ in 0..100 {
            assert_eq!(sampler.sample(&mut rng), 2);
        }
        let sampler = WeightedSampler::new(&[0.5, 0.0, 0.5]).unwrap();
        for _ in 0..1000 {
            assert_ne!(sampler.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_weighted_sampler_distribution() {
        let sampler = WeightedSampler::new(&[1.0, 3.0]).unwrap();
        let mut rng = create_rng(42);
        let mut counts = [0u32; 2];
        let n = 10000;
        for _ in 0..n {
            counts[sampler.sample(&mut rng)] += 1;
        }
        let ratio = counts[1] as f64 / counts[0] as f64;
        assert!(
            (ratio - 3.0).abs() < 0.5,
            "expected ratio ~3.0, got {ratio}"
        );
    }

    #[test]
    fn test_weighted_sampler_dyn_rng() {
        let sampler = WeightedSampler::new(&[1.0, 1.0]).unwrap();
        let mut rng = create_rng(7);
        let dyn_rng: &mut dyn RngCore = &mut rng;
        assert!(sampler.sample(dyn_rng) < 2);
    }

    #[test]
    fn test_weighted_sampler_invalid() {
        assert!(WeightedSampler::new(&[]).is_none());
        assert!(WeightedSampler::new(&[0.0, -1.0]).is_none());
    }
}
