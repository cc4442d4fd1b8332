//! Diagnostics and run results
//!
//! This module provides per-generation statistics and the result types the
//! engines return.

pub mod convergence;

use serde::{Deserialize, Serialize};

use crate::fitness::traits::{is_invalid_fitness, Direction};
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;
use crate::population::population::Population;

pub use convergence::FitnessHistory;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Best fitness in this generation
    pub best_fitness: f64,
    /// Worst fitness in this generation
    pub worst_fitness: f64,
    /// Mean of the valid fitness values
    pub mean_fitness: f64,
    /// Number of individuals with `NaN` or `+∞` fitness
    pub invalid_count: usize,
    /// Mean pairwise normalized distance; `NaN` unless filled by
    /// [`GenerationStats::with_diversity`] or debug logging is enabled
    pub diversity: f64,
}

impl GenerationStats {
    /// Compute statistics from an evaluated population
    ///
    /// Diversity is quadratic in the population size, so it is only measured
    /// when the debug line that reports it will be emitted.
    pub fn from_population(
        population: &Population,
        generation: usize,
        direction: Direction,
        bounds: &MultiBounds,
    ) -> Self {
        let invalid_count = population
            .iter()
            .filter(|i| is_invalid_fitness(i.fitness_or_nan()))
            .count();

        let stats = Self {
            generation,
            best_fitness: population
                .best(direction)
                .map_or(f64::NAN, |i| i.fitness_or_nan()),
            worst_fitness: population
                .worst(direction)
                .map_or(f64::NAN, |i| i.fitness_or_nan()),
            mean_fitness: population.mean_fitness().unwrap_or(f64::NAN),
            invalid_count,
            diversity: f64::NAN,
        };
        if log::log_enabled!(log::Level::Debug) {
            stats.with_diversity(population, bounds)
        } else {
            stats
        }
    }

    /// Fill in the mean pairwise normalized distance of `population`
    pub fn with_diversity(mut self, population: &Population, bounds: &MultiBounds) -> Self {
        self.diversity = population.diversity(bounds);
        self
    }

    /// Emit the statistics at debug level
    pub fn log(&self, engine: &str) {
        log::debug!(
            "{} generation {}: best={:.6} worst={:.6} mean={:.6} invalid={} diversity={:.4}",
            engine,
            self.generation,
            self.best_fitness,
            self.worst_fitness,
            self.mean_fitness,
            self.invalid_count,
            self.diversity
        );
    }
}

/// Result of a GA or DE run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best individual of the final population
    pub best_solution: RealVector,
    /// Its fitness
    pub best_value: f64,
    /// Best fitness per generation
    pub history: Vec<f64>,
}

impl EvolutionResult {
    /// Wrap the history for convergence queries
    pub fn convergence(&self, direction: Direction) -> FitnessHistory {
        FitnessHistory::from_values(self.history.clone(), direction)
    }
}

/// Result of a surrogate-driven run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurrogateResult {
    /// Best individual of the final population
    pub best_solution: RealVector,
    /// Its predicted fitness
    pub best_fitness: f64,
    /// Best predicted fitness per generation
    pub history: Vec<f64>,
}

impl SurrogateResult {
    /// Wrap the history for convergence queries
    pub fn convergence(&self, direction: Direction) -> FitnessHistory {
        FitnessHistory::from_values(self.history.clone(), direction)
    }
}

pub mod prelude {
    pub use super::convergence::*;
    pub use super::{EvolutionResult, GenerationStats, SurrogateResult};
}
