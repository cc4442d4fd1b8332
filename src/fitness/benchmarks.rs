//! Benchmark objective functions
//!
//! Standard test functions plus the Scherrer crystallite-size equation, and a
//! small catalog that pairs each with its default bounds and direction.

use std::f64::consts::PI;

use crate::error::EvoResult;
use crate::fitness::traits::{Direction, Fitness};
use crate::genome::bounds::{Bounds, MultiBounds};

/// Trait for benchmark functions
pub trait BenchmarkFunction {
    /// Name of the benchmark function
    fn name(&self) -> &'static str;

    /// One-line description of the formula
    fn description(&self) -> &'static str;

    /// Dimensionality of the problem
    fn dimension(&self) -> usize;

    /// Default search space
    fn bounds(&self) -> MultiBounds;

    /// Whether the function is meant to be minimized or maximized
    fn direction(&self) -> Direction {
        Direction::Minimize
    }

    /// Optimal value, if known
    fn optimal_fitness(&self) -> Option<f64>;

    /// Evaluate the function on a raw parameter vector
    fn evaluate_raw(&self, x: &[f64]) -> f64;
}

impl Fitness for dyn BenchmarkFunction + '_ {
    fn evaluate(&self, genes: &[f64]) -> EvoResult<f64> {
        Ok(self.evaluate_raw(genes))
    }
}

macro_rules! impl_benchmark_fitness {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Fitness for $ty {
                fn evaluate(&self, genes: &[f64]) -> EvoResult<f64> {
                    Ok(self.evaluate_raw(genes))
                }
            }
        )*
    };
}

/// Sphere function: f(x) = Σxᵢ²
///
/// Unimodal, convex, separable. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Sphere {
    dimension: usize,
}

impl Sphere {
    /// Create a new Sphere function
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl BenchmarkFunction for Sphere {
    fn name(&self) -> &'static str {
        "Sphere"
    }

    fn description(&self) -> &'static str {
        "Simple quadratic minimization"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> MultiBounds {
        MultiBounds::symmetric(5.0, self.dimension)
    }

    fn optimal_fitness(&self) -> Option<f64> {
        Some(0.0)
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        x.iter().map(|xi| xi * xi).sum()
    }
}

/// Rastrigin function: f(x) = 10n + Σ(xᵢ² - 10cos(2πxᵢ))
///
/// Highly multimodal with many local minima. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Rastrigin {
    dimension: usize,
}

impl Rastrigin {
    /// Create a new Rastrigin function
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl BenchmarkFunction for Rastrigin {
    fn name(&self) -> &'static str {
        "Rastrigin"
    }

    fn description(&self) -> &'static str {
        "Multimodal benchmark function"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> MultiBounds {
        MultiBounds::symmetric(5.12, self.dimension)
    }

    fn optimal_fitness(&self) -> Option<f64> {
        Some(0.0)
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        let a = 10.0;
        let n = x.len() as f64;
        a * n
            + x.iter()
                .map(|xi| xi * xi - a * (2.0 * PI * xi).cos())
                .sum::<f64>()
    }
}

/// Rosenbrock function: f(x) = Σ[100(xᵢ₊₁-xᵢ²)² + (1-xᵢ)²]
///
/// Valley structure, non-separable. Optimum at (1,1,...,1).
#[derive(Clone, Debug)]
pub struct Rosenbrock {
    dimension: usize,
}

impl Rosenbrock {
    /// Create a new Rosenbrock function
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl BenchmarkFunction for Rosenbrock {
    fn name(&self) -> &'static str {
        "Rosenbrock"
    }

    fn description(&self) -> &'static str {
        "Valley-shaped benchmark function"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> MultiBounds {
        MultiBounds::symmetric(2.0, self.dimension)
    }

    fn optimal_fitness(&self) -> Option<f64> {
        Some(0.0)
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        x.windows(2)
            .map(|w| {
                let xi = w[0];
                let xi1 = w[1];
                100.0 * (xi1 - xi * xi).powi(2) + (1.0 - xi).powi(2)
            })
            .sum()
    }
}

/// Crystallite size from the Scherrer equation: D = K·λ / (B·cos θ)
///
/// Takes `[K, λ, B, θ]`. Returns `+∞` when `B <= 0` or `cos θ` vanishes,
/// which the engines rank as worst.
#[derive(Clone, Debug, Default)]
pub struct Scherrer;

impl Scherrer {
    /// Create the objective
    pub fn new() -> Self {
        Self
    }

    /// The equation itself, returning `None` outside its domain
    pub fn crystallite_size(k: f64, wavelength: f64, fwhm: f64, theta: f64) -> Option<f64> {
        let cos_t = theta.cos();
        if fwhm <= 0.0 || cos_t.abs() < 1e-12 {
            return None;
        }
        Some((k * wavelength) / (fwhm * cos_t))
    }
}

impl BenchmarkFunction for Scherrer {
    fn name(&self) -> &'static str {
        "Scherrer equation (crystallite size)"
    }

    fn description(&self) -> &'static str {
        "D = (K * lambda) / (B * cos(theta))"
    }

    fn dimension(&self) -> usize {
        4
    }

    fn bounds(&self) -> MultiBounds {
        MultiBounds::new(vec![
            Bounds::new(0.5, 1.0),
            Bounds::new(0.5, 2.0),
            Bounds::new(0.001, 0.1),
            Bounds::new(0.0, PI / 2.0),
        ])
    }

    fn direction(&self) -> Direction {
        Direction::Maximize
    }

    fn optimal_fitness(&self) -> Option<f64> {
        None
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        match x {
            [k, wavelength, fwhm, theta] => {
                Self::crystallite_size(*k, *wavelength, *fwhm, *theta).unwrap_or(f64::INFINITY)
            }
            _ => f64::NAN,
        }
    }
}

impl_benchmark_fitness!(Sphere, Rastrigin, Rosenbrock, Scherrer);

/// Keyed registry of the built-in objectives
pub struct ObjectiveCatalog {
    entries: Vec<(&'static str, Box<dyn BenchmarkFunction>)>,
}

impl ObjectiveCatalog {
    /// The four built-in objectives, keyed "1" to "4"
    pub fn standard() -> Self {
        Self {
            entries: vec![
                ("1", Box::new(Scherrer::new()) as Box<dyn BenchmarkFunction>),
                ("2", Box::new(Sphere::new(3))),
                ("3", Box::new(Rastrigin::new(3))),
                ("4", Box::new(Rosenbrock::new(3))),
            ],
        }
    }

    /// Look up an objective by key
    pub fn get(&self, key: &str) -> Option<&dyn BenchmarkFunction> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, f)| f.as_ref())
    }

    /// Iterate over `(key, objective)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &dyn BenchmarkFunction)> {
        self.entries.iter().map(|(k, f)| (*k, f.as_ref()))
    }

    /// Number of registered objectives
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ObjectiveCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_at_optimum() {
        let f = Sphere::new(3);
        assert_eq!(f.evaluate_raw(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(f.evaluate(&[1.0, 2.0, 2.0]).unwrap(), 9.0);
    }

    #[test]
    fn test_rastrigin_at_optimum() {
        let f = Rastrigin::new(3);
        assert_relative_eq!(f.evaluate_raw(&[0.0, 0.0, 0.0]), 0.0, epsilon = 1e-12);
        assert!(f.evaluate_raw(&[0.5, 0.5, 0.5]) > 0.0);
    }

    #[test]
    fn test_rosenbrock_at_optimum() {
        let f = Rosenbrock::new(3);
        assert_relative_eq!(f.evaluate_raw(&[1.0, 1.0, 1.0]), 0.0);
        assert_relative_eq!(f.evaluate_raw(&[0.0, 0.0, 0.0]), 2.0);
    }

    #[test]
    fn test_scherrer_value() {
        let f = Scherrer::new();
        let d = f.evaluate_raw(&[0.9, 1.54, 0.015, 0.0]);
        assert_relative_eq!(d, 0.9 * 1.54 / 0.015, epsilon = 1e-9);
    }

    #[test]
    fn test_scherrer_invalid_inputs_are_infinite() {
        let f = Scherrer::new();
        assert_eq!(f.evaluate_raw(&[0.9, 1.54, 0.0, 0.3]), f64::INFINITY);
        assert_eq!(f.evaluate_raw(&[0.9, 1.54, 0.02, PI / 2.0]), f64::INFINITY);
        assert!(f.evaluate_raw(&[0.9, 1.54]).is_nan());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ObjectiveCatalog::standard();
        assert_eq!(catalog.len(), 4);

        let sphere = catalog.get("2").unwrap();
        assert_eq!(sphere.name(), "Sphere");
        assert_eq!(sphere.bounds().dimension(), 3);
        assert_eq!(sphere.direction(), Direction::Minimize);
        assert_eq!(sphere.evaluate(&[1.0, 1.0, 1.0]).unwrap(), 3.0);

        let scherrer = catalog.get("1").unwrap();
        assert_eq!(scherrer.direction(), Direction::Maximize);
        assert_eq!(scherrer.bounds().dimension(), scherrer.dimension());

        assert!(catalog.get("x").is_none());
        let keys: Vec<_> = catalog.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["1", "2", "3", "4"]);
    }
}
