//! Fitness traits
//!
//! This module defines the fitness evaluation contract and the comparison
//! direction shared by every engine.

use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};

/// Returns true for the sentinel values an evaluator uses to flag an
/// unevaluable configuration (`NaN` and `+∞`).
pub fn is_invalid_fitness(value: f64) -> bool {
    value.is_nan() || value == f64::INFINITY
}

/// Whether lower or higher fitness values are better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Lower fitness is better
    #[default]
    Minimize,
    /// Higher fitness is better
    Maximize,
}

impl Direction {
    /// Map a `minimize` flag onto a direction
    pub fn from_minimize(minimize: bool) -> Self {
        if minimize {
            Self::Minimize
        } else {
            Self::Maximize
        }
    }

    /// True for [`Direction::Minimize`]
    pub fn is_minimize(self) -> bool {
        matches!(self, Self::Minimize)
    }

    /// Ranking key where higher is always better.
    ///
    /// Invalid fitness maps to `-∞` in both directions, so it never wins a
    /// comparison against a valid value.
    pub fn key(self, value: f64) -> f64 {
        if is_invalid_fitness(value) {
            return f64::NEG_INFINITY;
        }
        match self {
            Self::Minimize => -value,
            Self::Maximize => value,
        }
    }

    /// True if `a` is strictly better than `b`
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.key(a) > self.key(b)
    }

    /// Order two fitness values; `Ordering::Greater` means `a` is better
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        self.key(a)
            .partial_cmp(&self.key(b))
            .unwrap_or(Ordering::Equal)
    }

    /// Index of the best value; the first one wins ties
    pub fn best_index(self, values: &[f64]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, &v) in values.iter().enumerate() {
            match best {
                Some(b) if !self.is_better(v, values[b]) => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// The best value of a slice, if any
    pub fn best_value(self, values: &[f64]) -> Option<f64> {
        self.best_index(values).map(|i| values[i])
    }
}

/// Fitness evaluation trait
///
/// Maps one parameter vector to a scalar. Errors are not caught by the
/// engines; they propagate out of `run`.
pub trait Fitness {
    /// Evaluate one parameter vector
    fn evaluate(&self, genes: &[f64]) -> EvoResult<f64>;
}

impl<T: Fitness + ?Sized> Fitness for &T {
    fn evaluate(&self, genes: &[f64]) -> EvoResult<f64> {
        (**self).evaluate(genes)
    }
}

impl<T: Fitness + ?Sized> Fitness for Box<T> {
    fn evaluate(&self, genes: &[f64]) -> EvoResult<f64> {
        (**self).evaluate(genes)
    }
}

/// A simple function wrapper for infallible fitness functions
pub struct FnFitness<F>
where
    F: Fn(&[f64]) -> f64,
{
    f: F,
}

impl<F> FnFitness<F>
where
    F: Fn(&[f64]) -> f64,
{
    /// Create a new function-based fitness evaluator
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Fitness for FnFitness<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, genes: &[f64]) -> EvoResult<f64> {
        Ok((self.f)(genes))
    }
}

/// Wrapper for fallible fitness functions
///
/// The closure's error is surfaced as [`EvolutionError::FitnessEvaluation`].
pub struct TryFnFitness<F, E>
where
    F: Fn(&[f64]) -> Result<f64, E>,
    E: Display,
{
    f: F,
}

impl<F, E> TryFnFitness<F, E>
where
    F: Fn(&[f64]) -> Result<f64, E>,
    E: Display,
{
    /// Create a new fallible fitness evaluator
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, E> Fitness for TryFnFitness<F, E>
where
    F: Fn(&[f64]) -> Result<f64, E>,
    E: Display,
{
    fn evaluate(&self, genes: &[f64]) -> EvoResult<f64> {
        (self.f)(genes).map_err(|e| EvolutionError::FitnessEvaluation(e.to_string()))
    }
}
