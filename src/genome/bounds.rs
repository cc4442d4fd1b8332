//! Search-space bounds
//!
//! Box constraints for every dimension of the search space. A bound with
//! `min == max` is legal and pins the dimension to a single value.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;

/// Bounds for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Create bounds without panicking, reporting the offending dimension
    pub fn try_new(dimension: usize, min: f64, max: f64) -> Result<Self, GenomeError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(GenomeError::InvalidBounds { dimension, min, max });
        }
        Ok(Self { min, max })
    }

    /// Create symmetric bounds centered at 0
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Create unit bounds [0, 1]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Width of the interval (max - min)
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True when the interval has zero width
    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Draw a value uniformly from the closed interval
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }

    /// Difference `a - b` expressed as a fraction of the span.
    ///
    /// Zero-span bounds contribute nothing.
    pub fn normalized_delta(&self, a: f64, b: f64) -> f64 {
        let span = self.span();
        if span > 0.0 {
            (a - b) / span
        } else {
            0.0
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Multi-dimensional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create new multi-dimensional bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Build from `(min, max)` pairs, rejecting inverted or non-finite pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, GenomeError> {
        let bounds = pairs
            .iter()
            .enumerate()
            .map(|(i, &(min, max))| Bounds::try_new(i, min, max))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bounds })
    }

    /// Create uniform bounds for all dimensions
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Create symmetric bounds for all dimensions
    pub fn symmetric(half_width: f64, dimension: usize) -> Self {
        Self::uniform(Bounds::symmetric(half_width), dimension)
    }

    /// Get number of dimensions
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// True when there are no dimensions
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Get bounds for a specific dimension
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Iterate over the per-dimension bounds
    pub fn iter(&self) -> std::slice::Iter<'_, Bounds> {
        self.bounds.iter()
    }

    /// Check that the space is non-empty and every bound is finite with min <= max
    pub fn validate(&self) -> Result<(), GenomeError> {
        if self.bounds.is_empty() {
            return Err(GenomeError::EmptySearchSpace);
        }
        for (i, b) in self.bounds.iter().enumerate() {
            Bounds::try_new(i, b.min, b.max)?;
        }
        Ok(())
    }

    /// Check that a vector has one coordinate per dimension
    pub fn check_dimension(&self, values: &[f64]) -> Result<(), GenomeError> {
        if values.len() != self.dimension() {
            return Err(GenomeError::DimensionMismatch {
                expected: self.dimension(),
                actual: values.len(),
            });
        }
        Ok(())
    }

    /// Draw one uniform point inside the box
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.bounds.iter().map(|b| b.sample(rng)).collect()
    }

    /// Clamp a vector to be within bounds, returning the indices that moved
    pub fn clamp_vec(&self, values: &mut [f64]) -> Vec<usize> {
        let mut clipped = Vec::new();
        for (i, value) in values.iter_mut().enumerate() {
            if let Some(b) = self.bounds.get(i) {
                let c = b.clamp(*value);
                if c != *value {
                    clipped.push(i);
                    *value = c;
                }
            }
        }
        clipped
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.dimension()
            && values
                .iter()
                .zip(self.bounds.iter())
                .all(|(&v, b)| b.contains(v))
    }
}

impl FromIterator<Bounds> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = Bounds>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(f64, f64)> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().map(Bounds::from).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MultiBounds {
    type Item = &'a Bounds;
    type IntoIter = std::slice::Iter<'a, Bounds>;

    fn into_iter(self) -> Self::IntoIter {
        self.bounds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bounds_new() {
        let b = Bounds::new(-5.0, 5.0);
        assert_eq!(b.min, -5.0);
        assert_eq!(b.max, 5.0);
    }

    #[test]
    #[should_panic(expected = "Invalid bounds")]
    fn test_bounds_invalid() {
        Bounds::new(5.0, -5.0);
    }

    #[test]
    fn test_bounds_try_new_rejects_inverted() {
        let err = Bounds::try_new(3, 1.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            GenomeError::InvalidBounds {
                dimension: 3,
                min: 1.0,
                max: 0.0
            }
        );
        assert!(Bounds::try_new(0, f64::NAN, 1.0).is_err());
        assert!(Bounds::try_new(0, 2.0, 2.0).is_ok());
    }

    #[test]
    fn test_bounds_span_and_degenerate() {
        assert_eq!(Bounds::new(-5.0, 5.0).span(), 10.0);
        assert!(Bounds::new(1.0, 1.0).is_degenerate());
        assert!(!Bounds::unit().is_degenerate());
    }

    #[test]
    fn test_bounds_clamp() {
        let b = Bounds::new(-5.0, 5.0);
        assert_eq!(b.clamp(0.0), 0.0);
        assert_eq!(b.clamp(-10.0), -5.0);
        assert_eq!(b.clamp(10.0), 5.0);
    }

    #[test]
    fn test_bounds_normalized_delta() {
        let b = Bounds::new(0.0, 10.0);
        assert_eq!(b.normalized_delta(5.0, 0.0), 0.5);
        assert_eq!(b.normalized_delta(0.0, 10.0), -1.0);
        assert_eq!(Bounds::new(2.0, 2.0).normalized_delta(7.0, 2.0), 0.0);
    }

    #[test]
    fn test_bounds_sample_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = Bounds::new(3.0, 3.0);
        assert_eq!(b.sample(&mut rng), 3.0);
    }

    #[test]
    fn test_multi_bounds_from_pairs() {
        let mb = MultiBounds::from_pairs(&[(0.0, 1.0), (-10.0, 10.0)]).unwrap();
        assert_eq!(mb.dimension(), 2);
        assert_eq!(mb.get(1), Some(&Bounds::new(-10.0, 10.0)));

        let err = MultiBounds::from_pairs(&[(0.0, 1.0), (4.0, -4.0)]).unwrap_err();
        assert!(matches!(err, GenomeError::InvalidBounds { dimension: 1, .. }));
    }

    #[test]
    fn test_multi_bounds_validate() {
        assert_eq!(
            MultiBounds::new(vec![]).validate(),
            Err(GenomeError::EmptySearchSpace)
        );
        assert!(MultiBounds::symmetric(5.0, 3).validate().is_ok());
        let bad = MultiBounds::new(vec![Bounds {
            min: 2.0,
            max: 1.0,
        }]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_multi_bounds_clamp_vec() {
        let mb = MultiBounds::symmetric(5.0, 3);
        let mut values = vec![-10.0, 0.0, 10.0];
        let clipped = mb.clamp_vec(&mut values);
        assert_eq!(values, vec![-5.0, 0.0, 5.0]);
        assert_eq!(clipped, vec![0, 2]);
    }

    #[test]
    fn test_multi_bounds_contains_vec() {
        let mb = MultiBounds::symmetric(5.0, 3);
        assert!(mb.contains_vec(&[0.0, 0.0, 0.0]));
        assert!(mb.contains_vec(&[-5.0, 5.0, 0.0]));
        assert!(!mb.contains_vec(&[-6.0, 0.0, 0.0]));
        assert!(!mb.contains_vec(&[0.0, 0.0]));
    }

    #[test]
    fn test_multi_bounds_sample_within() {
        let mut rng = StdRng::seed_from_u64(7);
        let mb: MultiBounds = vec![(0.0, 1.0), (-3.0, -2.0), (10.0, 10.0)]
            .into_iter()
            .collect();
        for _ in 0..100 {
            let x = mb.sample(&mut rng);
            assert!(mb.contains_vec(&x));
        }
    }
}
