//! Mutation operators
//!
//! This module provides the bounded mutation operators used by the engines,
//! the differential mutant builder and importance-weighted mutation.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError, OperatorError, OperatorResult, RepairInfo};
use crate::genome::bounds::{Bounds, MultiBounds};
use crate::genome::real_vector::RealVector;
use crate::operators::traits::BoundedMutationOperator;

/// Uniform reset mutation
///
/// Each gene is independently replaced by a fresh uniform draw from its bound
/// with probability `mutation_rate`. The gene is re-sampled, never clipped.
#[derive(Clone, Debug)]
pub struct UniformResetMutation {
    /// Per-gene mutation probability
    pub mutation_rate: f64,
}

impl UniformResetMutation {
    /// Create a new uniform reset mutation
    pub fn new(mutation_rate: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&mutation_rate),
            "Probability must be in [0, 1]"
        );
        Self { mutation_rate }
    }
}

impl BoundedMutationOperator for UniformResetMutation {
    fn mutate_bounded<R: Rng + ?Sized>(
        &self,
        genome: &mut RealVector,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> usize {
        let mut mutated = 0;
        for (gene, bound) in genome.genes_mut().iter_mut().zip(bounds.iter()) {
            if rng.gen::<f64>() < self.mutation_rate {
                *gene = bound.sample(rng);
                mutated += 1;
            }
        }
        mutated
    }
}

/// Difference-vector mutation for differential evolution
///
/// Builds `a + F * (b - c)` and clips it into the bounds. Clipping is reported
/// as a repair.
#[derive(Clone, Debug)]
pub struct DifferentialMutation {
    /// Scale factor F applied to the difference vector
    pub mutation_factor: f64,
}

impl DifferentialMutation {
    /// Create a new differential mutation
    pub fn new(mutation_factor: f64) -> Self {
        Self { mutation_factor }
    }

    /// Build the mutant vector from three donors
    pub fn mutant(
        &self,
        a: &RealVector,
        b: &RealVector,
        c: &RealVector,
        bounds: &MultiBounds,
    ) -> OperatorResult<RealVector> {
        let difference = match b.sub(c) {
            Ok(d) => d,
            Err(e) => return OperatorResult::Failed(OperatorError::MutationFailed(e.to_string())),
        };
        let mut mutant = match a.add(&difference.scale(self.mutation_factor)) {
            Ok(m) => m,
            Err(e) => return OperatorResult::Failed(OperatorError::MutationFailed(e.to_string())),
        };

        let clipped = mutant.apply_bounds(bounds);
        if clipped.is_empty() {
            OperatorResult::Success(mutant)
        } else {
            OperatorResult::Repaired(
                mutant,
                RepairInfo {
                    repaired_genes: clipped,
                    repair_method: "clip",
                },
            )
        }
    }
}

/// Per-variable importance weights
///
/// One non-negative weight per dimension, typically derived from a surrogate
/// model's feature importances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportanceWeights {
    weights: Vec<f64>,
}

impl ImportanceWeights {
    /// Wrap weights, rejecting negative or non-finite entries
    pub fn new(weights: Vec<f64>) -> EvoResult<Self> {
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(EvolutionError::Configuration(format!(
                "importance weight {} must be finite and non-negative, got {}",
                i, w
            )));
        }
        Ok(Self { weights })
    }

    /// Build from raw importances, clamping negative and `NaN` entries to 0
    pub fn from_importances(importances: &[f64]) -> Self {
        Self {
            weights: importances
                .iter()
                .map(|&v| if v > 0.0 && v.is_finite() { v } else { 0.0 })
                .collect(),
        }
    }

    /// Equal weight on every dimension
    pub fn uniform(dimension: usize) -> Self {
        Self {
            weights: vec![1.0; dimension],
        }
    }

    /// Number of weights
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True if there are no weights
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Raw weights
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Weights rescaled to sum to 1; `None` when they sum to 0
    pub fn normalized(&self) -> Option<Vec<f64>> {
        let total: f64 = self.weights.iter().sum();
        if total > 0.0 {
            Some(self.weights.iter().map(|w| w / total).collect())
        } else {
            None
        }
    }

    /// Expand each bound by `factor * w_i * span` on both sides, staying inside `limit`
    ///
    /// Uses the normalized weights, or `1/D` each when they sum to 0.
    pub fn widen_bounds(
        &self,
        bounds: &MultiBounds,
        factor: f64,
        limit: Bounds,
    ) -> EvoResult<MultiBounds> {
        bounds.check_dimension(&self.weights)?;
        let dimension = bounds.dimension();
        let weights = self
            .normalized()
            .unwrap_or_else(|| vec![1.0 / dimension as f64; dimension]);

        Ok(bounds
            .iter()
            .zip(weights)
            .map(|(b, w)| {
                let expand = b.span() * factor * w;
                Bounds::new(
                    (b.min - expand).max(limit.min).min(b.min),
                    (b.max + expand).min(limit.max).max(b.max),
                )
            })
            .collect())
    }
}

/// Importance-weighted mixed mutation
///
/// Gene `i` mutates with probability `base_rate * (1 + gain * w_i)` where `w`
/// are the normalized importance weights. Without usable weights every gene
/// mutates at exactly `base_rate`. A mutating gene takes a Gaussian step of
/// `sigma_fraction * span` (clipped) with probability `local_probability`,
/// otherwise it is re-drawn uniformly.
#[derive(Clone, Debug)]
pub struct ImportanceWeightedMutation {
    /// Base per-gene mutation probability
    pub base_rate: f64,
    /// Normalized weights, `None` for uniform behavior
    weights: Option<Vec<f64>>,
    /// Scale of the importance boost
    pub gain: f64,
    /// Probability of a local Gaussian step instead of a uniform jump
    pub local_probability: f64,
    /// Gaussian standard deviation as a fraction of the bound's span
    pub sigma_fraction: f64,
}

impl ImportanceWeightedMutation {
    /// Importance boost applied to normalized weights
    pub const DEFAULT_GAIN: f64 = 2.5;
    /// Share of local Gaussian steps
    pub const DEFAULT_LOCAL_PROBABILITY: f64 = 0.7;
    /// Gaussian step size relative to span
    pub const DEFAULT_SIGMA_FRACTION: f64 = 0.15;

    /// Create a mutation with uniform weighting
    pub fn new(base_rate: f64) -> Self {
        Self {
            base_rate,
            weights: None,
            gain: Self::DEFAULT_GAIN,
            local_probability: Self::DEFAULT_LOCAL_PROBABILITY,
            sigma_fraction: Self::DEFAULT_SIGMA_FRACTION,
        }
    }

    /// Use importance weights; a zero-sum set keeps uniform weighting
    pub fn with_weights(mut self, weights: &ImportanceWeights) -> Self {
        self.weights = weights.normalized();
        if self.weights.is_none() {
            log::warn!(
                "importance weights sum to 0; mutating every gene at the base rate {}",
                self.base_rate
            );
        }
        self
    }

    /// Mutation probability for one gene
    pub fn gene_probability(&self, gene: usize) -> f64 {
        match &self.weights {
            Some(w) => self.base_rate * (1.0 + self.gain * w.get(gene).copied().unwrap_or(0.0)),
            None => self.base_rate,
        }
    }
}

impl BoundedMutationOperator for ImportanceWeightedMutation {
    fn mutate_bounded<R: Rng + ?Sized>(
        &self,
        genome: &mut RealVector,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> usize {
        let mut mutated = 0;
        for (i, (gene, bound)) in genome
            .genes_mut()
            .iter_mut()
            .zip(bounds.iter())
            .enumerate()
        {
            if rng.gen::<f64>() >= self.gene_probability(i) {
                continue;
            }
            mutated += 1;

            if rng.gen::<f64>() < self.local_probability {
                let sigma = self.sigma_fraction * bound.span();
                // Zero-span bounds give sigma 0; Normal accepts that
                let step = match Normal::new(0.0, sigma) {
                    Ok(normal) => normal.sample(rng),
                    Err(_) => 0.0,
                };
                *gene = bound.clamp(*gene + step);
            } else {
                *gene = bound.sample(rng);
            }
        }
        mutated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_reset_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = MultiBounds::symmetric(2.0, 5);
        let mut genome = RealVector::zeros(5);

        let mutated = UniformResetMutation::new(1.0).mutate_bounded(&mut genome, &bounds, &mut rng);
        assert_eq!(mutated, 5);
        assert!(bounds.contains_vec(genome.genes()));
    }

    #[test]
    fn test_uniform_reset_zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(2);
        let bounds = MultiBounds::symmetric(2.0, 4);
        let mut genome = RealVector::new(vec![0.1, 0.2, 0.3, 0.4]);
        let before = genome.clone();

        let mutated = UniformResetMutation::new(0.0).mutate_bounded(&mut genome, &bounds, &mut rng);
        assert_eq!(mutated, 0);
        assert_eq!(genome, before);
    }

    #[test]
    fn test_differential_mutant_value() {
        let bounds = MultiBounds::symmetric(10.0, 2);
        let a = RealVector::new(vec![1.0, 1.0]);
        let b = RealVector::new(vec![3.0, 0.0]);
        let c = RealVector::new(vec![1.0, 2.0]);

        let result = DifferentialMutation::new(0.5).mutant(&a, &b, &c, &bounds);
        assert!(!result.was_repaired());
        assert_eq!(result.genome().unwrap().genes(), &[2.0, 0.0]);
    }

    #[test]
    fn test_differential_mutant_is_clipped() {
        let bounds = MultiBounds::symmetric(1.0, 2);
        let a = RealVector::new(vec![0.9, -0.9]);
        let b = RealVector::new(vec![1.0, -1.0]);
        let c = RealVector::new(vec![-1.0, 1.0]);

        match DifferentialMutation::new(0.8).mutant(&a, &b, &c, &bounds) {
            OperatorResult::Repaired(mutant, info) => {
                assert_eq!(mutant.genes(), &[1.0, -1.0]);
                assert_eq!(info.repaired_genes, vec![0, 1]);
            }
            other => panic!("expected a repaired mutant, got {:?}", other),
        }
    }

    #[test]
    fn test_importance_weights_from_importances() {
        let weights = ImportanceWeights::from_importances(&[0.5, -0.2, f64::NAN, 1.5]);
        assert_eq!(weights.as_slice(), &[0.5, 0.0, 0.0, 1.5]);
        let normalized = weights.normalized().unwrap();
        assert_relative_eq!(normalized.iter().sum::<f64>(), 1.0);
        assert_relative_eq!(normalized[3], 0.75);
    }

    #[test]
    fn test_importance_weights_reject_negative() {
        assert!(ImportanceWeights::new(vec![0.1, -0.1]).is_err());
        assert!(ImportanceWeights::new(vec![0.0, 0.0]).unwrap().normalized().is_none());
    }

    #[test]
    fn test_widen_bounds() {
        let bounds = MultiBounds::new(vec![Bounds::new(0.2, 0.4), Bounds::new(0.0, 1.0)]);
        let weights = ImportanceWeights::new(vec![1.0, 0.0]).unwrap();
        let widened = weights.widen_bounds(&bounds, 0.5, Bounds::unit()).unwrap();

        assert_relative_eq!(widened.bounds[0].min, 0.1);
        assert_relative_eq!(widened.bounds[0].max, 0.5);
        assert_eq!(widened.bounds[1], Bounds::new(0.0, 1.0));
        assert!(weights
            .widen_bounds(&MultiBounds::symmetric(1.0, 3), 0.5, Bounds::unit())
            .is_err());
    }

    #[test]
    fn test_gene_probability() {
        let weights = ImportanceWeights::new(vec![3.0, 1.0]).unwrap();
        let mutation = ImportanceWeightedMutation::new(0.1).with_weights(&weights);
        assert_relative_eq!(mutation.gene_probability(0), 0.1 * (1.0 + 2.5 * 0.75));
        assert_relative_eq!(mutation.gene_probability(1), 0.1 * (1.0 + 2.5 * 0.25));
    }

    #[test]
    fn test_zero_sum_weights_use_base_rate() {
        let weights = ImportanceWeights::new(vec![0.0, 0.0, 0.0]).unwrap();
        let mutation = ImportanceWeightedMutation::new(0.05).with_weights(&weights);
        for i in 0..3 {
            assert_eq!(mutation.gene_probability(i), 0.05);
        }
    }

    #[test]
    fn test_weighted_mutation_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let bounds = MultiBounds::new(vec![Bounds::new(0.0, 1.0), Bounds::new(5.0, 5.0)]);
        let mutation = ImportanceWeightedMutation::new(1.0);

        for _ in 0..200 {
            let mut genome = RealVector::new(vec![0.99, 5.0]);
            mutation.mutate_bounded(&mut genome, &bounds, &mut rng);
            assert!(bounds.contains_vec(genome.genes()));
        }
    }

    #[test]
    fn test_weighted_mutation_favors_important_genes() {
        let mut rng = StdRng::seed_from_u64(10);
        let bounds = MultiBounds::uniform(Bounds::unit(), 2);
        let weights = ImportanceWeights::new(vec![1.0, 0.0]).unwrap();
        let mutation = ImportanceWeightedMutation::new(0.2).with_weights(&weights);

        let mut changed = [0usize; 2];
        for _ in 0..2000 {
            let mut genome = RealVector::new(vec![0.5, 0.5]);
            mutation.mutate_bounded(&mut genome, &bounds, &mut rng);
            for i in 0..2 {
                if genome[i] != 0.5 {
                    changed[i] += 1;
                }
            }
        }
        // Expected rates are 0.7 and 0.2
        assert!(changed[0] > 2 * changed[1]);
    }
}
