//! Convergence history
//!
//! Per-generation best-fitness records and the questions callers usually ask
//! of them.

use serde::{Deserialize, Serialize};

use crate::fitness::traits::Direction;

/// Append-only record of the best fitness per generation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    values: Vec<f64>,
    direction: Direction,
}

impl FitnessHistory {
    /// Create an empty history
    pub fn new(direction: Direction) -> Self {
        Self {
            values: Vec::new(),
            direction,
        }
    }

    /// Create an empty history with room for `generations` entries
    pub fn with_capacity(direction: Direction, generations: usize) -> Self {
        Self {
            values: Vec::with_capacity(generations),
            direction,
        }
    }

    /// Wrap an existing history
    pub fn from_values(values: Vec<f64>, direction: Direction) -> Self {
        Self { values, direction }
    }

    /// Record one generation
    pub fn push(&mut self, best: f64) {
        self.values.push(best);
    }

    /// Number of recorded generations
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True before the first generation
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ranking direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Recorded values in generation order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Take the values
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }

    /// Best value ever recorded
    pub fn best(&self) -> Option<f64> {
        self.direction.best_value(&self.values)
    }

    /// Gain from the first to the last entry, positive when the run improved
    pub fn improvement(&self) -> Option<f64> {
        let first = *self.values.first()?;
        let last = *self.values.last()?;
        Some(self.direction.key(last) - self.direction.key(first))
    }

    /// True if no entry is worse than the one before it
    pub fn is_monotonic(&self) -> bool {
        self.values
            .windows(2)
            .all(|w| !self.direction.is_better(w[0], w[1]))
    }

    /// Generations since the last improvement larger than `threshold`
    pub fn stagnation(&self, threshold: f64) -> usize {
        let mut best_key = f64::NEG_INFINITY;
        let mut last_improvement = 0;
        for (generation, &value) in self.values.iter().enumerate() {
            let key = self.direction.key(value);
            if generation == 0 || key > best_key + threshold {
                best_key = best_key.max(key);
                last_improvement = generation;
            }
        }
        self.values.len().saturating_sub(last_improvement + 1)
    }
}

impl From<FitnessHistory> for Vec<f64> {
    fn from(history: FitnessHistory) -> Self {
        history.values
    }
}
