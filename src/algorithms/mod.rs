//! Evolutionary algorithms
//!
//! This module provides the genetic algorithm, differential evolution and the
//! surrogate-guided hybrid GA.

pub mod differential_evolution;
pub mod genetic;
pub mod hybrid;

use rand::Rng;

use crate::diagnostics::EvolutionResult;
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::traits::Direction;
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;
use crate::population::population::Population;

pub(crate) fn check_probability(name: &str, value: f64) -> EvoResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EvolutionError::Configuration(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Build an initial population of exactly `size` individuals
///
/// Seeds come first, clipped into the bounds; the remainder is drawn
/// uniformly. Extra seeds are dropped.
pub(crate) fn seed_population<R: Rng + ?Sized>(
    size: usize,
    bounds: &MultiBounds,
    seeds: Vec<RealVector>,
    rng: &mut R,
) -> EvoResult<Population> {
    for seed in &seeds {
        bounds.check_dimension(seed.genes())?;
    }
    if seeds.len() > size {
        log::warn!(
            "{} seeds supplied for a population of {}; keeping the first {}",
            seeds.len(),
            size,
            size
        );
    }

    let mut genomes: Vec<RealVector> = Vec::with_capacity(size);
    for mut seed in seeds.into_iter().take(size) {
        if !seed.apply_bounds(bounds).is_empty() {
            log::warn!("seed outside the search space was clipped into bounds");
        }
        genomes.push(seed);
    }
    while genomes.len() < size {
        genomes.push(RealVector::generate(rng, bounds));
    }
    Ok(Population::from_genomes(genomes))
}

/// Pick the best of an evaluated final population
pub(crate) fn finish(
    engine: &str,
    population: Population,
    history: Vec<f64>,
    direction: Direction,
) -> EvoResult<EvolutionResult> {
    let best = population
        .best(direction)
        .ok_or(EvolutionError::EmptyPopulation)?;
    log::info!(
        "{} finished after {} generations, best {:.6}",
        engine,
        history.len(),
        best.fitness_or_nan()
    );
    Ok(EvolutionResult {
        best_solution: best.genome().clone(),
        best_value: best.fitness_or_nan(),
        history,
    })
}

pub mod prelude {
    pub use super::differential_evolution::*;
    pub use super::genetic::*;
    pub use super::hybrid::*;
}
