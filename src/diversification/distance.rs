//! Bound-normalized distances
//!
//! Continuous coordinates are scaled by their bound's span so that dimensions
//! with different physical ranges contribute comparably. Categorical keys add
//! a fixed penalty per mismatch on top of the continuous distance.

use std::collections::BTreeMap;

use crate::genome::bounds::MultiBounds;

/// Penalty added per categorical key whose values differ
pub const CATEGORICAL_MISMATCH_WEIGHT: f64 = 0.5;

/// Euclidean distance in bound-normalized coordinates
///
/// Zero-span dimensions contribute 0. Coordinates past the end of `bounds`
/// are ignored.
pub fn normalized_distance(a: &[f64], b: &[f64], bounds: &MultiBounds) -> f64 {
    a.iter()
        .zip(b.iter())
        .zip(bounds.iter())
        .map(|((&x, &y), bound)| bound.normalized_delta(x, y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Number of keys, over both maps, whose values differ; a key missing from
/// either side counts
pub fn categorical_mismatches(a: &BTreeMap<String, String>, b: &BTreeMap<String, String>) -> usize {
    let differing = a
        .iter()
        .filter(|(key, value)| b.get(*key) != Some(*value))
        .count();
    let only_in_b = b.keys().filter(|key| !a.contains_key(*key)).count();
    differing + only_in_b
}

/// Normalized continuous distance plus the weighted categorical mismatch count
///
/// The categorical term is added linearly, not in quadrature.
pub fn mixed_distance(
    continuous_a: &[f64],
    continuous_b: &[f64],
    categorical_a: &BTreeMap<String, String>,
    categorical_b: &BTreeMap<String, String>,
    bounds: &MultiBounds,
) -> f64 {
    normalized_distance(continuous_a, continuous_b, bounds)
        + CATEGORICAL_MISMATCH_WEIGHT * categorical_mismatches(categorical_a, categorical_b) as f64
}

/// Smallest distance from `candidate` to any member of `set`; `+∞` for an empty set
pub fn min_distance_to<T, D>(candidate: &T, set: &[T], distance: D) -> f64
where
    D: Fn(&T, &T) -> f64,
{
    set.iter()
        .map(|member| distance(candidate, member))
        .fold(f64::INFINITY, f64::min)
}

/// Arithmetic mean over all unordered pairs; 0 for fewer than two items
pub fn mean_pairwise_distance<T, D>(items: &[T], distance: D) -> f64
where
    D: Fn(&T, &T) -> f64,
{
    if items.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            total += distance(&items[i], &items[j]);
            count += 1;
        }
    }
    total / count as f64
}
