//! Greedy max-min sampling over a continuous box
//!
//! Each new sample is the random candidate whose nearest selected neighbour is
//! furthest away.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::diversification::distance::{mean_pairwise_distance, min_distance_to, normalized_distance};
use crate::error::{EvoResult, EvolutionError};
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;

/// Configuration for max-min diversification
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxMinConfig {
    /// Target size of the sample set
    pub num_samples: usize,
    /// Random candidates scored per added sample
    pub candidates_per_iteration: usize,
}

impl Default for MaxMinConfig {
    fn default() -> Self {
        Self {
            num_samples: 10,
            candidates_per_iteration: 100,
        }
    }
}

impl MaxMinConfig {
    /// Create a configuration
    pub fn new(num_samples: usize, candidates_per_iteration: usize) -> Self {
        Self {
            num_samples,
            candidates_per_iteration,
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> EvoResult<()> {
        if self.candidates_per_iteration == 0 {
            return Err(EvolutionError::Configuration(
                "candidates_per_iteration must be at least 1".to_string(),
            ));
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

/// Grow `selected` to `target` items by greedy max-min selection
///
/// Seeds an empty set with one random sample. Among each batch of candidates
/// the first one reaching the largest minimum distance wins.
pub(crate) fn extend_max_min<T, R, S, D>(
    selected: &mut Vec<T>,
    target: usize,
    candidates_per_iteration: usize,
    rng: &mut R,
    mut sample: S,
    distance: D,
) where
    R: Rng + ?Sized,
    S: FnMut(&mut R) -> T,
    D: Fn(&T, &T) -> f64,
{
    if selected.is_empty() && target > 0 {
        selected.push(sample(rng));
    }

    while selected.len() < target {
        let mut best: Option<(f64, T)> = None;
        for _ in 0..candidates_per_iteration {
            let candidate = sample(rng);
            let score = min_distance_to(&candidate, selected.as_slice(), &distance);
            match &best {
                Some((best_score, _)) if score <= *best_score => {}
                _ => best = Some((score, candidate)),
            }
        }
        match best {
            Some((_, chosen)) => selected.push(chosen),
            None => break,
        }
    }
}

/// Max-min diversifier over continuous bounds
///
/// ```ignore
/// let mut diversifier = MaxMinDiversifier::new(bounds, MaxMinConfig::default())?;
/// diversifier.generate(&mut rng);
/// println!("{}", diversifier.diversity_score());
/// ```
#[derive(Clone, Debug)]
pub struct MaxMinDiversifier {
    bounds: MultiBounds,
    config: MaxMinConfig,
    samples: Vec<RealVector>,
}

impl MaxMinDiversifier {
    /// Create a diversifier with an empty sample set
    pub fn new(bounds: MultiBounds, config: MaxMinConfig) -> EvoResult<Self> {
        bounds.validate()?;
        config.validate()?;
        if bounds.iter().any(|b| b.is_degenerate()) {
            log::warn!("zero-span bounds contribute nothing to sample distances");
        }
        Ok(Self {
            bounds,
            config,
            samples: Vec::new(),
        })
    }

    /// Start from caller-supplied samples
    pub fn with_initial_samples(mut self, samples: Vec<RealVector>) -> EvoResult<Self> {
        for sample in &samples {
            self.bounds.check_dimension(sample.genes())?;
        }
        if samples.len() >= self.config.num_samples {
            log::warn!(
                "{} initial samples already meet the target of {}; nothing will be generated",
                samples.len(),
                self.config.num_samples
            );
        }
        self.samples = samples;
        Ok(self)
    }

    /// Fill the sample set up to `num_samples` and return it
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[RealVector] {
        let bounds = &self.bounds;
        let before = self.samples.len();
        extend_max_min(
            &mut self.samples,
            self.config.num_samples,
            self.config.candidates_per_iteration,
            rng,
            |rng: &mut R| RealVector::generate(rng, bounds),
            |a: &RealVector, b: &RealVector| normalized_distance(a.genes(), b.genes(), bounds),
        );
        log::debug!(
            "max-min added {} samples, diversity {:.4}",
            self.samples.len() - before,
            self.diversity_score()
        );
        &self.samples
    }

    /// Normalized distance between two points of this space
    pub fn distance(&self, a: &RealVector, b: &RealVector) -> f64 {
        normalized_distance(a.genes(), b.genes(), &self.bounds)
    }

    /// Mean pairwise normalized distance of the current set
    pub fn diversity_score(&self) -> f64 {
        mean_pairwise_distance(&self.samples, |a, b| self.distance(a, b))
    }

    /// Current samples
    pub fn samples(&self) -> &[RealVector] {
        &self.samples
    }

    /// Take the samples
    pub fn into_samples(self) -> Vec<RealVector> {
        self.samples
    }

    /// The search space
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    /// The configuration
    pub fn config(&self) -> &MaxMinConfig {
        &self.config
    }
}
