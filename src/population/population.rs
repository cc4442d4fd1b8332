//! Population type
//!
//! This module provides the Population container type.

use crate::diversification::distance::normalized_distance;
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::traits::{is_invalid_fitness, Direction, Fitness};
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;
use crate::population::individual::Individual;

/// A population of individuals
#[derive(Clone, Debug, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Create an unevaluated population from genomes
    pub fn from_genomes(genomes: Vec<RealVector>) -> Self {
        genomes.into_iter().map(Individual::new).collect()
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// Get a mutable reference to an individual by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Individual> {
        self.individuals.get_mut(index)
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual) {
        self.individuals.push(individual);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    /// Get a mutable iterator over the individuals
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Individual> {
        self.individuals.iter_mut()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Cloned genomes in population order, as a surrogate batch
    pub fn genomes(&self) -> Vec<RealVector> {
        self.individuals.iter().map(|i| i.genome.clone()).collect()
    }

    /// Evaluate every individual, replacing any previous fitness
    ///
    /// Evaluator errors abort the pass and propagate.
    pub fn evaluate<F: Fitness + ?Sized>(&mut self, fitness: &F) -> EvoResult<()> {
        for individual in &mut self.individuals {
            let value = fitness.evaluate(individual.genome.genes())?;
            individual.set_fitness(value);
        }
        Ok(())
    }

    /// Assign externally computed fitness values in population order
    pub fn assign_fitness(&mut self, values: &[f64]) -> EvoResult<()> {
        if values.len() != self.individuals.len() {
            return Err(EvolutionError::Configuration(format!(
                "got {} fitness values for {} individuals",
                values.len(),
                self.individuals.len()
            )));
        }
        for (individual, &value) in self.individuals.iter_mut().zip(values) {
            individual.set_fitness(value);
        }
        Ok(())
    }

    /// Fitness of each individual; unevaluated ones read as `NaN`
    pub fn fitness_values(&self) -> Vec<f64> {
        self.individuals.iter().map(Individual::fitness_or_nan).collect()
    }

    /// Index of the best individual; the earliest one wins ties
    pub fn best_index(&self, direction: Direction) -> Option<usize> {
        direction.best_index(&self.fitness_values())
    }

    /// Get the best individual under the given direction
    pub fn best(&self, direction: Direction) -> Option<&Individual> {
        self.best_index(direction).map(|i| &self.individuals[i])
    }

    /// Get the worst individual under the given direction
    pub fn worst(&self, direction: Direction) -> Option<&Individual> {
        let mut worst: Option<&Individual> = None;
        for individual in &self.individuals {
            match worst {
                Some(w) if !w.is_better_than(individual, direction) => {}
                _ => worst = Some(individual),
            }
        }
        worst
    }

    /// Sort best first; equal fitness keeps the current relative order
    pub fn sort_by_fitness(&mut self, direction: Direction) {
        self.individuals.sort_by(|a, b| {
            direction.compare(b.fitness_or_nan(), a.fitness_or_nan())
        });
    }

    /// Mean of the valid fitness values
    pub fn mean_fitness(&self) -> Option<f64> {
        let valid: Vec<f64> = self
            .individuals
            .iter()
            .filter_map(|i| i.fitness)
            .filter(|f| !is_invalid_fitness(*f))
            .collect();

        if valid.is_empty() {
            None
        } else {
            Some(valid.iter().sum::<f64>() / valid.len() as f64)
        }
    }

    /// Mean pairwise bound-normalized distance between genomes
    pub fn diversity(&self, bounds: &MultiBounds) -> f64 {
        if self.len() < 2 {
            return 0.0;
        }

        let mut total_distance = 0.0;
        let mut count = 0;

        for i in 0..self.len() {
            for j in (i + 1)..self.len() {
                total_distance += normalized_distance(
                    self.individuals[i].genome.genes(),
                    self.individuals[j].genome.genes(),
                    bounds,
                );
                count += 1;
            }
        }

        total_distance / count as f64
    }

    /// Check that every genome lies inside the bounds
    pub fn within_bounds(&self, bounds: &MultiBounds) -> bool {
        self.individuals
            .iter()
            .all(|i| bounds.contains_vec(i.genome.genes()))
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl std::ops::IndexMut<usize> for Population {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.individuals[index]
    }
}

impl IntoIterator for Population {
    type Item = Individual;
    type IntoIter = std::vec::IntoIter<Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

impl FromIterator<Individual> for Population {
    fn from_iter<I: IntoIterator<Item = Individual>>(iter: I) -> Self {
        Self::from_individuals(iter.into_iter().collect())
    }
}
