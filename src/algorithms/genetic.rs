//! Genetic Algorithm
//!
//! This module implements a steady-state genetic algorithm: each generation
//! produces two children that overwrite random slots of the population.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithms::{check_probability, finish, seed_population};
use crate::diagnostics::{EvolutionResult, GenerationStats};
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::traits::{Direction, Fitness};
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;
use crate::operators::crossover::OnePointCrossover;
use crate::operators::mutation::UniformResetMutation;
use crate::operators::selection::{RouletteSelection, UniformSelection};
use crate::operators::traits::{BoundedMutationOperator, CrossoverOperator, SelectionOperator};

/// How the GA picks its two parents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentSelection {
    /// Fitness-proportional, see [`RouletteSelection`]
    #[default]
    Roulette,
    /// Two distinct parents drawn uniformly
    Uniform,
}

impl ParentSelection {
    fn select_pair<R: Rng + ?Sized>(
        self,
        fitness: &[f64],
        direction: Direction,
        rng: &mut R,
    ) -> EvoResult<(usize, usize)> {
        let pair = match self {
            Self::Roulette => RouletteSelection.select_pair(fitness, direction, rng)?,
            Self::Uniform => UniformSelection.select_pair(fitness, direction, rng)?,
        };
        Ok(pair)
    }
}

/// Configuration for the genetic algorithm
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticAlgorithmConfig {
    /// Population size
    pub population_size: usize,
    /// Per-gene probability of a uniform re-draw
    pub mutation_rate: f64,
    /// Probability that a parent pair is crossed over
    pub crossover_rate: f64,
    /// Number of generations
    #[serde(alias = "max_generations")]
    pub generations: usize,
    /// Whether lower or higher fitness is better
    pub direction: Direction,
    /// Parent selection policy
    pub selection: ParentSelection,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            mutation_rate: 0.01,
            crossover_rate: 0.7,
            generations: 100,
            direction: Direction::Minimize,
            selection: ParentSelection::Roulette,
        }
    }
}

impl GeneticAlgorithmConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size < 2 {
            return Err(EvolutionError::Configuration(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        check_probability("mutation_rate", self.mutation_rate)?;
        check_probability("crossover_rate", self.crossover_rate)?;
        Ok(())
    }

    /// Parse from JSON, then validate
    pub fn from_json(json: &str) -> EvoResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EvolutionError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for [`GeneticAlgorithm`]
#[derive(Clone, Debug, Default)]
pub struct GeneticAlgorithmBuilder {
    config: GeneticAlgorithmConfig,
    bounds: Option<MultiBounds>,
}

impl GeneticAlgorithmBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: GeneticAlgorithmConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the per-gene mutation rate
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.config.mutation_rate = rate;
        self
    }

    /// Set the crossover rate
    pub fn crossover_rate(mut self, rate: f64) -> Self {
        self.config.crossover_rate = rate;
        self
    }

    /// Set the number of generations
    pub fn generations(mut self, generations: usize) -> Self {
        self.config.generations = generations;
        self
    }

    /// Set the ranking direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    /// Minimize when `true`, maximize otherwise
    pub fn minimize(self, minimize: bool) -> Self {
        self.direction(Direction::from_minimize(minimize))
    }

    /// Set the parent selection policy
    pub fn selection(mut self, selection: ParentSelection) -> Self {
        self.config.selection = selection;
        self
    }

    /// Set the search space bounds
    pub fn bounds(mut self, bounds: MultiBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Build the GA instance
    pub fn build(self) -> EvoResult<GeneticAlgorithm> {
        let bounds = self
            .bounds
            .ok_or_else(|| EvolutionError::Configuration("Bounds must be specified".to_string()))?;
        bounds.validate()?;
        self.config.validate()?;

        Ok(GeneticAlgorithm {
            config: self.config,
            bounds,
        })
    }
}

/// Steady-state genetic algorithm
///
/// ```ignore
/// let ga = GeneticAlgorithm::builder()
///     .bounds(MultiBounds::symmetric(5.0, 3))
///     .mutation_rate(0.02)
///     .build()?;
/// let result = ga.run(&Sphere::new(3), &mut rng)?;
/// ```
#[derive(Clone, Debug)]
pub struct GeneticAlgorithm {
    config: GeneticAlgorithmConfig,
    bounds: MultiBounds,
}

impl GeneticAlgorithm {
    /// Create a builder for the GA
    pub fn builder() -> GeneticAlgorithmBuilder {
        GeneticAlgorithmBuilder::new()
    }

    /// Create directly from a configuration and bounds
    pub fn new(config: GeneticAlgorithmConfig, bounds: MultiBounds) -> EvoResult<Self> {
        Self::builder().config(config).bounds(bounds).build()
    }

    /// The configuration
    pub fn config(&self) -> &GeneticAlgorithmConfig {
        &self.config
    }

    /// The search space
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    /// Run from a uniformly random population
    pub fn run<F, R>(&self, fitness: &F, rng: &mut R) -> EvoResult<EvolutionResult>
    where
        F: Fitness + ?Sized,
        R: Rng + ?Sized,
    {
        self.run_seeded(fitness, Vec::new(), rng)
    }

    /// Run from caller-supplied seeds, topped up with random individuals
    pub fn run_seeded<F, R>(
        &self,
        fitness: &F,
        seeds: Vec<RealVector>,
        rng: &mut R,
    ) -> EvoResult<EvolutionResult>
    where
        F: Fitness + ?Sized,
        R: Rng + ?Sized,
    {
        let direction = self.config.direction;
        let crossover = OnePointCrossover::new();
        let mutation = UniformResetMutation::new(self.config.mutation_rate);

        let mut population =
            seed_population(self.config.population_size, &self.bounds, seeds, rng)?;
        let mut history = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            population.evaluate(fitness)?;
            let stats =
                GenerationStats::from_population(&population, generation, direction, &self.bounds);
            stats.log("ga");
            history.push(stats.best_fitness);

            let fitness_values = population.fitness_values();
            let (i, j) = self
                .config
                .selection
                .select_pair(&fitness_values, direction, rng)?;
            let (parent1, parent2) = (population[i].genome(), population[j].genome());

            let (mut child1, mut child2) = if rng.gen::<f64>() < self.config.crossover_rate {
                crossover.crossover(parent1, parent2, rng).into_result()?
            } else {
                (parent1.clone(), parent2.clone())
            };

            mutation.mutate_bounded(&mut child1, &self.bounds, rng);
            mutation.mutate_bounded(&mut child2, &self.bounds, rng);

            for child in [child1, child2] {
                let slot = rng.gen_range(0..population.len());
                population[slot].set_genome(child);
            }
        }

        population.evaluate(fitness)?;
        finish("ga", population, history, direction)
    }
}
