//! Differential Evolution
//!
//! DE/rand/1/bin with greedy in-place replacement. A replaced target is
//! visible to the remaining targets of the same sweep.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithms::{check_probability, finish, seed_population};
use crate::diagnostics::{EvolutionResult, GenerationStats};
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::traits::{Direction, Fitness};
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;
use crate::operators::crossover::BinomialCrossover;
use crate::operators::mutation::DifferentialMutation;
use crate::operators::selection::distinct_indices_excluding;

/// Configuration for differential evolution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferentialEvolutionConfig {
    /// Population size, at least 4
    pub population_size: usize,
    /// Scale factor F of the difference vector
    pub mutation_factor: f64,
    /// Per-gene probability of taking the mutant's value
    pub crossover_rate: f64,
    /// Number of full sweeps
    #[serde(alias = "max_generations")]
    pub generations: usize,
    /// Whether lower or higher fitness is better
    pub direction: Direction,
}

impl Default for DifferentialEvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            mutation_factor: 0.8,
            crossover_rate: 0.9,
            generations: 100,
            direction: Direction::Minimize,
        }
    }
}

impl DifferentialEvolutionConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size < 4 {
            return Err(EvolutionError::Configuration(format!(
                "population_size must be at least 4 for differential evolution, got {}",
                self.population_size
            )));
        }
        if !self.mutation_factor.is_finite() {
            return Err(EvolutionError::Configuration(format!(
                "mutation_factor must be finite, got {}",
                self.mutation_factor
            )));
        }
        if !(0.0..=2.0).contains(&self.mutation_factor) {
            log::warn!(
                "mutation_factor {} is outside the usual [0, 2] range",
                self.mutation_factor
            );
        }
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

/// Builder for [`DifferentialEvolution`]
#[derive(Clone, Debug, Default)]
pub struct DifferentialEvolutionBuilder {
    config: DifferentialEvolutionConfig,
    bounds: Option<MultiBounds>,
}

impl DifferentialEvolutionBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: DifferentialEvolutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the scale factor F
    pub fn mutation_factor(mut self, factor: f64) -> Self {
        self.config.mutation_factor = factor;
        self
    }

    /// Set the crossover rate CR
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

    /// Set the search space bounds
    pub fn bounds(mut self, bounds: MultiBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Build the DE instance
    pub fn build(self) -> EvoResult<DifferentialEvolution> {
        let bounds = self
            .bounds
            .ok_or_else(|| EvolutionError::Configuration("Bounds must be specified".to_string()))?;
        bounds.validate()?;
        self.config.validate()?;

        Ok(DifferentialEvolution {
            config: self.config,
            bounds,
        })
    }
}

/// Differential evolution optimizer
#[derive(Clone, Debug)]
pub struct DifferentialEvolution {
    config: DifferentialEvolutionConfig,
    bounds: MultiBounds,
}

impl DifferentialEvolution {
    /// Create a builder for DE
    pub fn builder() -> DifferentialEvolutionBuilder {
        DifferentialEvolutionBuilder::new()
    }

    /// Create directly from a configuration and bounds
    pub fn new(config: DifferentialEvolutionConfig, bounds: MultiBounds) -> EvoResult<Self> {
        Self::builder().config(config).bounds(bounds).build()
    }

    /// The configuration
    pub fn config(&self) -> &DifferentialEvolutionConfig {
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
        let mutation = DifferentialMutation::new(self.config.mutation_factor);
        let crossover = BinomialCrossover::new(self.config.crossover_rate);

        let mut population =
            seed_population(self.config.population_size, &self.bounds, seeds, rng)?;
        population.evaluate(fitness)?;
        let n = population.len();
        let mut history = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            let mut replaced = 0;
            let mut clipped = 0;

            for target in 0..n {
                let donors = distinct_indices_excluding(n, target, 3, rng)?;
                let mutant = mutation.mutant(
                    population[donors[0]].genome(),
                    population[donors[1]].genome(),
                    population[donors[2]].genome(),
                    &self.bounds,
                );
                if mutant.was_repaired() {
                    clipped += 1;
                }
                let mutant = mutant.into_result()?;

                let trial = crossover
                    .trial(population[target].genome(), &mutant, rng)
                    .into_result()?;
                let trial_fitness = fitness.evaluate(trial.genes())?;

                if direction.is_better(trial_fitness, population[target].fitness_or_nan()) {
                    population[target].set_genome(trial);
                    population[target].set_fitness(trial_fitness);
                    replaced += 1;
                }
            }

            let stats =
                GenerationStats::from_population(&population, generation, direction, &self.bounds);
            stats.log("de");
            log::trace!(
                "de generation {}: {} targets replaced, {} mutants clipped",
                generation,
                replaced,
                clipped
            );
            history.push(stats.best_fitness);
        }

        finish("de", population, history, direction)
    }
}
