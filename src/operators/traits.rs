//! Operator traits
//!
//! This module defines the core operator traits shared by the engines.

use rand::Rng;

use crate::error::{OperatorError, OperatorResult};
use crate::fitness::traits::Direction;
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;

/// Selection operator trait
///
/// Selects individuals from a population for reproduction. The pool is the
/// population's fitness values in population order.
pub trait SelectionOperator {
    /// Select a single individual, returning its index
    fn select<R: Rng + ?Sized>(
        &self,
        fitness: &[f64],
        direction: Direction,
        rng: &mut R,
    ) -> Result<usize, OperatorError>;

    /// Select two parents; the default draws them independently
    fn select_pair<R: Rng + ?Sized>(
        &self,
        fitness: &[f64],
        direction: Direction,
        rng: &mut R,
    ) -> Result<(usize, usize), OperatorError> {
        let first = self.select(fitness, direction, rng)?;
        let second = self.select(fitness, direction, rng)?;
        Ok((first, second))
    }
}

/// Crossover operator trait
///
/// Combines genetic material from two parents to create offspring.
pub trait CrossoverOperator {
    /// Apply crossover to two parents and produce two offspring
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        rng: &mut R,
    ) -> OperatorResult<(RealVector, RealVector)>;
}

/// Bounded mutation operator trait
///
/// Mutation that leaves every gene inside its bound.
pub trait BoundedMutationOperator {
    /// Mutate in place, returning how many genes were touched
    fn mutate_bounded<R: Rng + ?Sized>(
        &self,
        genome: &mut RealVector,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> usize;
}
