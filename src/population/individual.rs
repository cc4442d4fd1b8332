//! Individual wrapper type
//!
//! This module provides the Individual type that pairs a genome with its
//! last known fitness.

use serde::{Deserialize, Serialize};

use crate::fitness::traits::Direction;
use crate::genome::real_vector::RealVector;

/// An individual in the population
///
/// Fitness is `None` until the individual has been evaluated. Replacing the
/// genome through [`Individual::set_genome`] clears it again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// The genome of this individual
    pub genome: RealVector,
    /// The fitness value (None if not yet evaluated)
    pub fitness: Option<f64>,
}

impl Individual {
    /// Create a new individual with an unevaluated genome
    pub fn new(genome: RealVector) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Create a new individual with a known fitness
    pub fn with_fitness(genome: RealVector, fitness: f64) -> Self {
        Self {
            genome,
            fitness: Some(fitness),
        }
    }

    /// Check if this individual has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Fitness as a plain value; unevaluated individuals read as `NaN`
    pub fn fitness_or_nan(&self) -> f64 {
        self.fitness.unwrap_or(f64::NAN)
    }

    /// Set the fitness value
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Replace the genome and forget the stale fitness
    pub fn set_genome(&mut self, genome: RealVector) {
        self.genome = genome;
        self.fitness = None;
    }

    /// Get a reference to the genome
    pub fn genome(&self) -> &RealVector {
        &self.genome
    }

    /// Take the genome out of this individual
    pub fn into_genome(self) -> RealVector {
        self.genome
    }

    /// Check if this individual is strictly better than another
    pub fn is_better_than(&self, other: &Self, direction: Direction) -> bool {
        direction.is_better(self.fitness_or_nan(), other.fitness_or_nan())
    }
}

impl From<RealVector> for Individual {
    fn from(genome: RealVector) -> Self {
        Self::new(genome)
    }
}
