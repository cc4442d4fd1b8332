//! Real-valued vector genome
//!
//! This module provides the fixed-length real-valued vector used as the
//! individual representation by every engine.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::bounds::MultiBounds;

/// Fixed-length real-valued vector genome
///
/// One coordinate per search-space dimension. Individuals carry no identity
/// beyond their values and are freely cloned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealVector {
    genes: Vec<f64>,
}

impl RealVector {
    /// Create a new real vector with the given genes
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Create a zero-filled vector of the given dimension
    pub fn zeros(dimension: usize) -> Self {
        Self {
            genes: vec![0.0; dimension],
        }
    }

    /// Create a vector filled with a constant value
    pub fn filled(dimension: usize, value: f64) -> Self {
        Self {
            genes: vec![value; dimension],
        }
    }

    /// Draw a vector uniformly inside the bounds
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, bounds: &MultiBounds) -> Self {
        Self {
            genes: bounds.sample(rng),
        }
    }

    /// Number of genes
    pub fn dimension(&self) -> usize {
        self.genes.len()
    }

    /// Get a reference to the genes
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Get a mutable reference to the genes
    pub fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.genes
    }

    /// Get the underlying vector
    pub fn into_inner(self) -> Vec<f64> {
        self.genes
    }

    /// Clamp every gene into its bound, returning the indices that moved
    pub fn apply_bounds(&mut self, bounds: &MultiBounds) -> Vec<usize> {
        bounds.clamp_vec(&mut self.genes)
    }

    /// Element-wise addition
    pub fn add(&self, other: &Self) -> Result<Self, GenomeError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise subtraction
    pub fn sub(&self, other: &Self) -> Result<Self, GenomeError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Scalar multiplication
    pub fn scale(&self, scalar: f64) -> Self {
        Self {
            genes: self.genes.iter().map(|x| x * scalar).collect(),
        }
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, GenomeError> {
        if self.genes.len() != other.genes.len() {
            return Err(GenomeError::DimensionMismatch {
                expected: self.genes.len(),
                actual: other.genes.len(),
            });
        }
        Ok(Self {
            genes: self
                .genes
                .iter()
                .zip(other.genes.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}

impl std::ops::Index<usize> for RealVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.genes[index]
    }
}

impl std::ops::IndexMut<usize> for RealVector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.genes[index]
    }
}

impl AsRef<[f64]> for RealVector {
    fn as_ref(&self) -> &[f64] {
        &self.genes
    }
}

impl From<Vec<f64>> for RealVector {
    fn from(genes: Vec<f64>) -> Self {
        Self { genes }
    }
}

impl From<RealVector> for Vec<f64> {
    fn from(genome: RealVector) -> Self {
        genome.genes
    }
}

impl<const N: usize> From<[f64; N]> for RealVector {
    fn from(arr: [f64; N]) -> Self {
        Self {
            genes: arr.to_vec(),
        }
    }
}

impl<'a> IntoIterator for &'a RealVector {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.genes.iter()
    }
}
