//! Surrogate-guided hybrid GA
//!
//! A generational GA whose fitness comes from one batch prediction per
//! generation. Elites survive unchanged, parents are picked by tournament and
//! genes the model considers important mutate more often.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::algorithms::{check_probability, seed_population};
use crate::diagnostics::{GenerationStats, SurrogateResult};
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::surrogate::{predict_checked, SurrogateModel};
use crate::fitness::traits::Direction;
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;
use crate::operators::crossover::OnePointCrossover;
use crate::operators::mutation::{ImportanceWeightedMutation, ImportanceWeights};
use crate::operators::selection::TournamentSelection;
use crate::operators::traits::{BoundedMutationOperator, CrossoverOperator, SelectionOperator};
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Configuration for the hybrid GA
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridGAConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations
    #[serde(alias = "max_generations")]
    pub generations: usize,
    /// Per-gene mutation rate before importance scaling
    pub base_mutation_rate: f64,
    /// Probability that a parent pair is crossed over
    pub crossover_rate: f64,
    /// Individuals copied unchanged into the next generation
    pub elitism: usize,
    /// Contenders per tournament
    pub tournament_size: usize,
    /// Ranking direction for model predictions
    pub direction: Direction,
    /// Per-variable importance weights; uniform when absent
    #[serde(alias = "variable_mutation_weights")]
    pub importance_weights: Option<ImportanceWeights>,
}

impl Default for HybridGAConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            generations: 120,
            base_mutation_rate: 0.05,
            crossover_rate: 0.7,
            elitism: 2,
            tournament_size: 3,
            direction: Direction::Maximize,
            importance_weights: None,
        }
    }
}

impl HybridGAConfig {
    /// Check parameter ranges that do not depend on the bounds
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size < 2 {
            return Err(EvolutionError::Configuration(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.elitism > self.population_size {
            return Err(EvolutionError::Configuration(format!(
                "elitism {} exceeds population_size {}",
                self.elitism, self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(EvolutionError::Configuration(
                "tournament_size must be at least 1".to_string(),
            ));
        }
        check_probability("base_mutation_rate", self.base_mutation_rate)?;
        check_probability("crossover_rate", self.crossover_rate)?;
        if let Some(weights) = &self.importance_weights {
            // Re-check entries that came in through deserialization
            ImportanceWeights::new(weights.as_slice().to_vec())?;
        }
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

/// Builder for [`HybridGA`]
#[derive(Clone, Debug, Default)]
pub struct HybridGABuilder {
    config: HybridGAConfig,
    bounds: Option<MultiBounds>,
}

impl HybridGABuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: HybridGAConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the number of generations
    pub fn generations(mut self, generations: usize) -> Self {
        self.config.generations = generations;
        self
    }

    /// Set the base mutation rate
    pub fn base_mutation_rate(mut self, rate: f64) -> Self {
        self.config.base_mutation_rate = rate;
        self
    }

    /// Set the crossover rate
    pub fn crossover_rate(mut self, rate: f64) -> Self {
        self.config.crossover_rate = rate;
        self
    }

    /// Set the number of elites
    pub fn elitism(mut self, count: usize) -> Self {
        self.config.elitism = count;
        self
    }

    /// Set the tournament size
    pub fn tournament_size(mut self, size: usize) -> Self {
        self.config.tournament_size = size;
        self
    }

    /// Set the ranking direction
    pub fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    /// Set the importance weights
    pub fn importance_weights(mut self, weights: ImportanceWeights) -> Self {
        self.config.importance_weights = Some(weights);
        self
    }

    /// Set the search space bounds
    pub fn bounds(mut self, bounds: MultiBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Build the hybrid GA instance
    pub fn build(self) -> EvoResult<HybridGA> {
        let bounds = self
            .bounds
            .ok_or_else(|| EvolutionError::Configuration("Bounds must be specified".to_string()))?;
        bounds.validate()?;
        self.config.validate()?;

        let mut mutation = ImportanceWeightedMutation::new(self.config.base_mutation_rate);
        if let Some(weights) = &self.config.importance_weights {
            if weights.len() != bounds.dimension() {
                return Err(EvolutionError::Configuration(format!(
                    "{} importance weights for {} dimensions",
                    weights.len(),
                    bounds.dimension()
                )));
            }
            mutation = mutation.with_weights(weights);
        }

        Ok(HybridGA {
            config: self.config,
            bounds,
            mutation,
        })
    }
}

/// Surrogate-guided GA with elitism and importance-weighted mutation
///
/// ```ignore
/// let hybrid = HybridGA::builder()
///     .bounds(MultiBounds::uniform(Bounds::unit(), 4))
///     .importance_weights(ImportanceWeights::from_importances(&importances))
///     .build()?;
/// let result = hybrid.run(&model, &mut rng)?;
/// ```
#[derive(Clone, Debug)]
pub struct HybridGA {
    config: HybridGAConfig,
    bounds: MultiBounds,
    mutation: ImportanceWeightedMutation,
}

impl HybridGA {
    /// Create a builder for the hybrid GA
    pub fn builder() -> HybridGABuilder {
        HybridGABuilder::new()
    }

    /// Create directly from a configuration and bounds
    pub fn new(config: HybridGAConfig, bounds: MultiBounds) -> EvoResult<Self> {
        Self::builder().config(config).bounds(bounds).build()
    }

    /// The configuration
    pub fn config(&self) -> &HybridGAConfig {
        &self.config
    }

    /// The search space
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    /// Run from a uniformly random population
    pub fn run<M, R>(&self, model: &M, rng: &mut R) -> EvoResult<SurrogateResult>
    where
        M: SurrogateModel + ?Sized,
        R: Rng + ?Sized,
    {
        self.run_seeded(model, Vec::new(), rng)
    }

    /// Run from caller-supplied seeds, topped up with random individuals
    pub fn run_seeded<M, R>(
        &self,
        model: &M,
        seeds: Vec<RealVector>,
        rng: &mut R,
    ) -> EvoResult<SurrogateResult>
    where
        M: SurrogateModel + ?Sized,
        R: Rng + ?Sized,
    {
        let direction = self.config.direction;
        let size = self.config.population_size;
        let selection = TournamentSelection::new(self.config.tournament_size);
        let crossover = OnePointCrossover::new();

        let mut population = seed_population(size, &self.bounds, seeds, rng)?;
        let mut history = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            self.predict(model, &mut population)?;
            let stats =
                GenerationStats::from_population(&population, generation, direction, &self.bounds);
            stats.log("hybrid");
            history.push(stats.best_fitness);

            population.sort_by_fitness(direction);
            let fitness = population.fitness_values();

            let mut next: Vec<Individual> = Vec::with_capacity(size);
            next.extend(population.iter().take(self.config.elitism).cloned());

            while next.len() < size {
                let i = selection.select(&fitness, direction, rng)?;
                let j = selection.select(&fitness, direction, rng)?;
                let (parent1, parent2) = (population[i].genome(), population[j].genome());

                let (mut child1, mut child2) = if rng.gen::<f64>() <= self.config.crossover_rate
                {
                    crossover.crossover(parent1, parent2, rng).into_result()?
                } else {
                    (parent1.clone(), parent2.clone())
                };

                self.mutation.mutate_bounded(&mut child1, &self.bounds, rng);
                next.push(Individual::new(child1));
                if next.len() < size {
                    self.mutation.mutate_bounded(&mut child2, &self.bounds, rng);
                    next.push(Individual::new(child2));
                }
            }

            population = Population::from_individuals(next);
        }

        self.predict(model, &mut population)?;
        let best = population
            .best(direction)
            .ok_or(EvolutionError::EmptyPopulation)?;
        log::info!(
            "hybrid finished after {} generations, best prediction {:.6}",
            history.len(),
            best.fitness_or_nan()
        );

        Ok(SurrogateResult {
            best_solution: best.genome().clone(),
            best_fitness: best.fitness_or_nan(),
            history,
        })
    }

    fn predict<M: SurrogateModel + ?Sized>(
        &self,
        model: &M,
        population: &mut Population,
    ) -> EvoResult<()> {
        let predictions = predict_checked(model, &population.genomes())?;
        population.assign_fitness(&predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::surrogate::FnSurrogate;
    use crate::genome::bounds::Bounds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn centered_model() -> FnSurrogate<impl Fn(&[f64]) -> f64> {
        FnSurrogate::new(|x: &[f64]| -x.iter().map(|v| (v - 0.5).powi(2)).sum::<f64>())
    }

    fn unit_hybrid(generations: usize, elitism: usize) -> HybridGA {
        HybridGA::builder()
            .bounds(MultiBounds::uniform(Bounds::unit(), 4))
            .generations(generations)
            .elitism(elitism)
            .build()
            .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = HybridGAConfig::default();
        assert_eq!(config.population_size, 40);
        assert_eq!(config.generations, 120);
        assert_eq!(config.base_mutation_rate, 0.05);
        assert_eq!(config.crossover_rate, 0.7);
        assert_eq!(config.elitism, 2);
        assert_eq!(config.direction, Direction::Maximize);
        assert!(config.importance_weights.is_none());
    }

    #[test]
    fn test_config_from_json_aliases() {
        let config = HybridGAConfig::from_json(
            r#"{"max_generations": 160, "elitism": 3, "variable_mutation_weights": [0.2, 0.8]}"#,
        )
        .unwrap();
        assert_eq!(config.generations, 160);
        assert_eq!(config.elitism, 3);
        assert_eq!(
            config.importance_weights.as_ref().map(|w| w.as_slice().to_vec()),
            Some(vec![0.2, 0.8])
        );
        assert!(HybridGAConfig::from_json(r#"{"importance_weights": [-1.0]}"#).is_err());
    }

    #[test]
    fn test_elitism_larger_than_population_rejected() {
        let result = HybridGA::builder()
            .bounds(MultiBounds::uniform(Bounds::unit(), 2))
            .population_size(4)
            .elitism(5)
            .build();
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_weight_length_checked() {
        let result = HybridGA::builder()
            .bounds(MultiBounds::uniform(Bounds::unit(), 3))
            .importance_weights(ImportanceWeights::uniform(2))
            .build();
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_elitism_keeps_best_monotonic() {
        let mut rng = StdRng::seed_from_u64(42);
        let hybrid = unit_hybrid(50, 3);
        let result = hybrid.run(&centered_model(), &mut rng).unwrap();

        assert_eq!(result.history.len(), 50);
        assert!(result.convergence(Direction::Maximize).is_monotonic());
        assert!(result.best_fitness >= result.history[0]);
        assert!(hybrid.bounds().contains_vec(result.best_solution.genes()));
    }

    #[test]
    fn test_population_equal_to_elitism() {
        let mut rng = StdRng::seed_from_u64(1);
        let hybrid = HybridGA::builder()
            .bounds(MultiBounds::uniform(Bounds::unit(), 2))
            .population_size(3)
            .elitism(3)
            .generations(5)
            .build()
            .unwrap();
        let result = hybrid.run(&centered_model(), &mut rng).unwrap();
        assert!(result.history.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_zero_sum_weights_fall_back_to_base_rate() {
        let mut rng = StdRng::seed_from_u64(8);
        let hybrid = HybridGA::builder()
            .bounds(MultiBounds::uniform(Bounds::unit(), 2))
            .importance_weights(ImportanceWeights::from_importances(&[0.0, -1.0]))
            .generations(10)
            .build()
            .unwrap();
        assert_eq!(hybrid.mutation.gene_probability(0), 0.05);
        assert_eq!(hybrid.mutation.gene_probability(1), 0.05);
        assert!(hybrid.run(&centered_model(), &mut rng).is_ok());
    }

    #[test]
    fn test_minimize_direction() {
        let mut rng = StdRng::seed_from_u64(4);
        let hybrid = HybridGA::builder()
            .bounds(MultiBounds::uniform(Bounds::unit(), 3))
            .direction(Direction::Minimize)
            .generations(30)
            .build()
            .unwrap();
        let cost = FnSurrogate::new(|x: &[f64]| x.iter().sum::<f64>());
        let result = hybrid.run(&cost, &mut rng).unwrap();
        assert!(result.convergence(Direction::Minimize).is_monotonic());
        assert!(result.best_fitness <= result.history[0]);
    }

    #[test]
    fn test_short_prediction_is_an_error() {
        struct Truncating;
        impl SurrogateModel for Truncating {
            fn batch_predict(&self, individuals: &[RealVector]) -> EvoResult<Vec<f64>> {
                Ok(vec![0.0; individuals.len().saturating_sub(1)])
            }
        }
        let mut rng = StdRng::seed_from_u64(0);
        let err = unit_hybrid(3, 1).run(&Truncating, &mut rng).unwrap_err();
        assert!(matches!(err, EvolutionError::Surrogate(_)));
    }
}
