//! Crossover operators
//!
//! Single-point tail exchange for the generational engines and per-gene
//! binomial mixing for differential evolution.

use rand::Rng;

use crate::error::{OperatorError, OperatorResult};
use crate::genome::real_vector::RealVector;
use crate::operators::traits::CrossoverOperator;

fn dimension_mismatch(a: &RealVector, b: &RealVector) -> OperatorError {
    OperatorError::CrossoverFailed(format!(
        "Parent dimensions do not match: {} vs {}",
        a.dimension(),
        b.dimension()
    ))
}

/// One-point crossover
///
/// Draws a split point in `[1, D-1]` and swaps the tails, so every child
/// inherits at least one gene from each parent. With fewer than two genes
/// the parents are returned unchanged.
#[derive(Clone, Debug, Default)]
pub struct OnePointCrossover;

impl OnePointCrossover {
    /// Create a new one-point crossover
    pub fn new() -> Self {
        Self
    }

    /// Swap tails at a fixed split point
    pub fn split_at(parent1: &RealVector, parent2: &RealVector, point: usize) -> (RealVector, RealVector) {
        let (head1, tail1) = parent1.genes().split_at(point);
        let (head2, tail2) = parent2.genes().split_at(point);

        let child1 = head1.iter().chain(tail2).copied().collect::<Vec<_>>();
        let child2 = head2.iter().chain(tail1).copied().collect::<Vec<_>>();
        (child1.into(), child2.into())
    }
}

impl CrossoverOperator for OnePointCrossover {
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        rng: &mut R,
    ) -> OperatorResult<(RealVector, RealVector)> {
        if parent1.dimension() != parent2.dimension() {
            return OperatorResult::Failed(dimension_mismatch(parent1, parent2));
        }

        let n = parent1.dimension();
        if n < 2 {
            return OperatorResult::Success((parent1.clone(), parent2.clone()));
        }

        let crossover_point = rng.gen_range(1..n);
        OperatorResult::Success(Self::split_at(parent1, parent2, crossover_point))
    }
}

/// Binomial crossover for differential evolution
///
/// Each gene independently comes from the mutant with probability
/// `crossover_rate`, otherwise from the target. No gene is forced.
#[derive(Clone, Debug)]
pub struct BinomialCrossover {
    /// Per-gene probability of taking the mutant's value
    pub crossover_rate: f64,
}

impl BinomialCrossover {
    /// Create a new binomial crossover
    pub fn new(crossover_rate: f64) -> Self {
        Self { crossover_rate }
    }

    /// Build the trial vector for one target
    pub fn trial<R: Rng + ?Sized>(
        &self,
        target: &RealVector,
        mutant: &RealVector,
        rng: &mut R,
    ) -> OperatorResult<RealVector> {
        if target.dimension() != mutant.dimension() {
            return OperatorResult::Failed(dimension_mismatch(target, mutant));
        }

        let genes = target
            .genes()
            .iter()
            .zip(mutant.genes())
            .map(|(&t, &m)| if rng.gen::<f64>() < self.crossover_rate { m } else { t })
            .collect::<Vec<_>>();
        OperatorResult::Success(genes.into())
    }
}
