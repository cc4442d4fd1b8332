//! Selection operators
//!
//! This module provides the parent-selection operators used by the engines.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

use crate::error::OperatorError;
use crate::fitness::traits::Direction;
use crate::operators::traits::SelectionOperator;

fn empty_pool() -> OperatorError {
    OperatorError::SelectionFailed("Population cannot be empty".to_string())
}

/// Draw `count` distinct indices from `0..len`, never returning `exclude`
///
/// Used by differential evolution to pick donor vectors for a target.
pub fn distinct_indices_excluding<R: Rng + ?Sized>(
    len: usize,
    exclude: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<usize>, OperatorError> {
    let available = if exclude < len { len - 1 } else { len };
    if available < count {
        return Err(OperatorError::SelectionFailed(format!(
            "need {} distinct individuals besides index {}, population has {}",
            count, exclude, len
        )));
    }
    Ok(index::sample(rng, available, count)
        .into_iter()
        .map(|i| if exclude < len && i >= exclude { i + 1 } else { i })
        .collect())
}

/// Tournament selection operator
///
/// Picks the best of a random subset drawn without replacement. Ties go to
/// the contender drawn first.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Tournament size (number of individuals competing)
    pub tournament_size: usize,
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size
    pub fn new(tournament_size: usize) -> Self {
        assert!(tournament_size >= 1, "Tournament size must be at least 1");
        Self { tournament_size }
    }

    /// Create binary tournament selection (size = 2)
    pub fn binary() -> Self {
        Self::new(2)
    }
}

impl Default for TournamentSelection {
    /// Three contenders
    fn default() -> Self {
        Self::new(3)
    }
}

impl SelectionOperator for TournamentSelection {
    fn select<R: Rng + ?Sized>(
        &self,
        fitness: &[f64],
        direction: Direction,
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        if fitness.is_empty() {
            return Err(empty_pool());
        }

        let tournament_size = self.tournament_size.min(fitness.len());

        let indices: Vec<usize> = (0..fitness.len()).collect();
        let mut tournament = indices.choose_multiple(rng, tournament_size).copied();

        let mut best = tournament.next().ok_or_else(empty_pool)?;
        for contender in tournament {
            if direction.is_better(fitness[contender], fitness[best]) {
                best = contender;
            }
        }
        Ok(best)
    }
}

/// Roulette wheel selection (fitness proportionate)
///
/// Fitness is first mapped to a higher-is-better key, then shifted so the
/// worst valid individual has weight 0. Invalid fitness (`NaN`, `+∞`) always
/// has weight 0. If every weight is 0 the draw is uniform.
#[derive(Clone, Debug, Default)]
pub struct RouletteSelection;

impl RouletteSelection {
    /// Create a new roulette selection
    pub fn new() -> Self {
        Self
    }

    /// Selection weights for a fitness pool
    pub fn weights(fitness: &[f64], direction: Direction) -> Vec<f64> {
        let keys: Vec<f64> = fitness.iter().map(|&f| direction.key(f)).collect();
        let min_key = keys
            .iter()
            .copied()
            .filter(|k| k.is_finite())
            .fold(f64::INFINITY, f64::min);

        keys.iter()
            .map(|&k| if k.is_finite() { k - min_key } else { 0.0 })
            .collect()
    }
}

impl SelectionOperator for RouletteSelection {
    fn select<R: Rng + ?Sized>(
        &self,
        fitness: &[f64],
        direction: Direction,
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        if fitness.is_empty() {
            return Err(empty_pool());
        }

        let weights = Self::weights(fitness, direction);

        // WeightedIndex rejects an all-zero table
        match WeightedIndex::new(&weights) {
            Ok(dist) => Ok(dist.sample(rng)),
            Err(_) => Ok(rng.gen_range(0..fitness.len())),
        }
    }
}

/// Uniform random selection
///
/// Ignores fitness. A pair is always two distinct individuals.
#[derive(Clone, Debug, Default)]
pub struct UniformSelection;

impl UniformSelection {
    /// Create a new uniform selection
    pub fn new() -> Self {
        Self
    }
}

impl SelectionOperator for UniformSelection {
    fn select<R: Rng + ?Sized>(
        &self,
        fitness: &[f64],
        _direction: Direction,
        rng: &mut R,
    ) -> Result<usize, OperatorError> {
        if fitness.is_empty() {
            return Err(empty_pool());
        }
        Ok(rng.gen_range(0..fitness.len()))
    }

    fn select_pair<R: Rng + ?Sized>(
        &self,
        fitness: &[f64],
        _direction: Direction,
        rng: &mut R,
    ) -> Result<(usize, usize), OperatorError> {
        if fitness.len() < 2 {
            return Err(OperatorError::SelectionFailed(format!(
                "need two distinct parents, population has {}",
                fitness.len()
            )));
        }
        let pair = index::sample(rng, fitness.len(), 2);
        Ok((pair.index(0), pair.index(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tournament_selection_prefers_better() {
        let mut rng = StdRng::seed_from_u64(42);
        let fitness = [10.0, 20.0, 30.0, 40.0, 50.0];
        let selection = TournamentSelection::new(3);

        let mut counts = [0usize; 5];
        for _ in 0..1000 {
            let idx = selection
                .select(&fitness, Direction::Maximize, &mut rng)
                .unwrap();
            counts[idx] += 1;
        }
        // Two worst can never win a 3-way tournament without replacement
        assert_eq!(counts[0], 0);
        assert_eq!(counts[1], 0);
        assert!(counts[4] > counts[2]);
    }

    #[test]
    fn test_tournament_respects_direction() {
        let mut rng = StdRng::seed_from_u64(7);
        let fitness = [1.0, 2.0, 3.0];
        let selection = TournamentSelection::new(3);
        assert_eq!(selection.select(&fitness, Direction::Minimize, &mut rng).unwrap(), 0);
        assert_eq!(selection.select(&fitness, Direction::Maximize, &mut rng).unwrap(), 2);
    }

    #[test]
    fn test_tournament_larger_than_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let selection = TournamentSelection::new(10);
        let idx = selection
            .select(&[5.0, f64::NAN], Direction::Maximize, &mut rng)
            .unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_roulette_weights() {
        let weights = RouletteSelection::weights(&[1.0, 3.0, f64::NAN, 2.0], Direction::Minimize);
        assert_eq!(weights, vec![2.0, 0.0, 0.0, 1.0]);

        let weights = RouletteSelection::weights(&[1.0, 3.0, f64::INFINITY], Direction::Maximize);
        assert_eq!(weights, vec![0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_roulette_never_picks_zero_weight() {
        let mut rng = StdRng::seed_from_u64(3);
        let fitness = [0.0, 5.0, f64::NAN, 1.0];
        for _ in 0..500 {
            let idx = RouletteSelection
                .select(&fitness, Direction::Minimize, &mut rng)
                .unwrap();
            assert!(idx == 0 || idx == 3);
        }
    }

    #[test]
    fn test_roulette_uniform_fallback() {
        let mut rng = StdRng::seed_from_u64(4);
        let fitness = [2.0, 2.0, 2.0];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let idx = RouletteSelection
                .select(&fitness, Direction::Minimize, &mut rng)
                .unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_uniform_pair_is_distinct() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let (a, b) = UniformSelection
                .select_pair(&[0.0, 0.0], Direction::Minimize, &mut rng)
                .unwrap();
            assert_ne!(a, b);
        }
        assert!(UniformSelection
            .select_pair(&[0.0], Direction::Minimize, &mut rng)
            .is_err());
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(TournamentSelection::default()
            .select(&[], Direction::Minimize, &mut rng)
            .is_err());
        assert!(RouletteSelection
            .select(&[], Direction::Minimize, &mut rng)
            .is_err());
    }

    #[test]
    fn test_distinct_indices_excluding() {
        let mut rng = StdRng::seed_from_u64(8);
        for target in 0..4 {
            let picked = distinct_indices_excluding(4, target, 3, &mut rng).unwrap();
            assert_eq!(picked.len(), 3);
            assert!(!picked.contains(&target));
            let mut sorted = picked.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 3);
        }
        assert!(distinct_indices_excluding(3, 0, 3, &mut rng).is_err());
    }
}
