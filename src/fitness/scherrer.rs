//! Scherrer-equation curve fitting
//!
//! An evaluator that owns a synthetic XRD dataset and scores candidate
//! `[K, λ, B]` parameter vectors by mean squared error against it. The dataset
//! is generated once, by the caller, and lives inside the evaluator.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError, GenomeError};
use crate::fitness::benchmarks::Scherrer;
use crate::fitness::traits::Fitness;
use crate::genome::bounds::{Bounds, MultiBounds};

/// Parameters of the Scherrer equation that a fit recovers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScherrerParams {
    /// Shape factor K
    pub k: f64,
    /// X-ray wavelength λ in Å
    pub wavelength: f64,
    /// Peak FWHM B in radians
    pub fwhm: f64,
}

impl Default for ScherrerParams {
    /// Cu Kα radiation with a 0.015 rad peak
    fn default() -> Self {
        Self {
            k: 0.9,
            wavelength: 1.54,
            fwhm: 0.015,
        }
    }
}

/// Mean-squared-error evaluator over a reference dataset
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScherrerFit {
    theta: Vec<f64>,
    measured: Vec<f64>,
    true_params: ScherrerParams,
}

impl ScherrerFit {
    /// Number of Bragg angles in the default dataset
    pub const DEFAULT_POINTS: usize = 20;
    /// Noise standard deviation as a fraction of the mean crystallite size
    pub const DEFAULT_NOISE: f64 = 0.05;

    /// Build from an existing dataset
    pub fn from_data(
        theta: Vec<f64>,
        measured: Vec<f64>,
        true_params: ScherrerParams,
    ) -> EvoResult<Self> {
        if theta.len() != measured.len() {
            return Err(GenomeError::DimensionMismatch {
                expected: theta.len(),
                actual: measured.len(),
            }
            .into());
        }
        if theta.is_empty() {
            return Err(EvolutionError::Configuration(
                "Scherrer dataset needs at least one point".to_string(),
            ));
        }
        Ok(Self {
            theta,
            measured,
            true_params,
        })
    }

    /// Synthesize noisy measurements at evenly spaced angles from 10° to 80°
    pub fn synthesize<R: Rng + ?Sized>(
        rng: &mut R,
        num_points: usize,
        noise_level: f64,
        true_params: ScherrerParams,
    ) -> EvoResult<Self> {
        if num_points < 2 {
            return Err(EvolutionError::Configuration(format!(
                "num_points must be >= 2, got {}",
                num_points
            )));
        }
        let step = 70.0 / (num_points - 1) as f64;
        let theta: Vec<f64> = (0..num_points)
            .map(|i| (10.0 + step * i as f64).to_radians())
            .collect();

        let clean: Vec<f64> = theta
            .iter()
            .map(|&t| {
                Scherrer::crystallite_size(
                    true_params.k,
                    true_params.wavelength,
                    true_params.fwhm,
                    t,
                )
                .unwrap_or(f64::NAN)
            })
            .collect();

        let mean = clean.iter().sum::<f64>() / clean.len() as f64;
        let noise = Normal::new(0.0, noise_level * mean).map_err(|e| {
            EvolutionError::Configuration(format!("invalid noise level {}: {}", noise_level, e))
        })?;
        let measured = clean.iter().map(|d| d + noise.sample(rng)).collect();

        Ok(Self {
            theta,
            measured,
            true_params,
        })
    }

    /// Default dataset: 20 points, 5% noise, Cu Kα parameters
    pub fn with_defaults<R: Rng + ?Sized>(rng: &mut R) -> EvoResult<Self> {
        Self::synthesize(
            rng,
            Self::DEFAULT_POINTS,
            Self::DEFAULT_NOISE,
            ScherrerParams::default(),
        )
    }

    /// Search space for `[K, λ, B]`
    pub fn bounds() -> MultiBounds {
        MultiBounds::new(vec![
            Bounds::new(0.5, 1.2),
            Bounds::new(1.0, 2.0),
            Bounds::new(0.005, 0.05),
        ])
    }

    /// Bragg angles in radians
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Noisy crystallite sizes
    pub fn measured(&self) -> &[f64] {
        &self.measured
    }

    /// Parameters the data was generated from
    pub fn true_params(&self) -> ScherrerParams {
        self.true_params
    }

    /// Predicted crystallite sizes for a parameter set; `NaN` where undefined
    pub fn predict(&self, params: &ScherrerParams) -> Vec<f64> {
        self.theta
            .iter()
            .map(|&t| {
                Scherrer::crystallite_size(params.k, params.wavelength, params.fwhm, t)
                    .unwrap_or(f64::NAN)
            })
            .collect()
    }

    /// Mean squared error of a parameter set against the measurements
    pub fn mse(&self, params: &ScherrerParams) -> f64 {
        let predicted = self.predict(params);
        predicted
            .iter()
            .zip(self.measured.iter())
            .map(|(p, m)| (p - m).powi(2))
            .sum::<f64>()
            / self.measured.len() as f64
    }
}

impl Fitness for ScherrerFit {
    fn evaluate(&self, genes: &[f64]) -> EvoResult<f64> {
        match genes {
            [k, wavelength, fwhm] => Ok(self.mse(&ScherrerParams {
                k: *k,
                wavelength: *wavelength,
                fwhm: *fwhm,
            })),
            _ => Err(GenomeError::DimensionMismatch {
                expected: 3,
                actual: genes.len(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_synthesize_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let fit = ScherrerFit::with_defaults(&mut rng).unwrap();
        assert_eq!(fit.theta().len(), 20);
        assert_eq!(fit.measured().len(), 20);
        assert!((fit.theta()[0] - 10f64.to_radians()).abs() < 1e-12);
        assert!((fit.theta()[19] - 80f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_noise_free_data_has_zero_error_at_truth() {
        let mut rng = StdRng::seed_from_u64(0);
        let params = ScherrerParams::default();
        let fit = ScherrerFit::synthesize(&mut rng, 10, 0.0, params).unwrap();
        let err = fit
            .evaluate(&[params.k, params.wavelength, params.fwhm])
            .unwrap();
        assert!(err.abs() < 1e-12);
        assert!(fit.evaluate(&[1.1, 1.9, 0.04]).unwrap() > 0.0);
    }

    #[test]
    fn test_truth_beats_far_guess() {
        let mut rng = StdRng::seed_from_u64(3);
        let fit = ScherrerFit::with_defaults(&mut rng).unwrap();
        let p = fit.true_params();
        let at_truth = fit.evaluate(&[p.k, p.wavelength, p.fwhm]).unwrap();
        let far = fit.evaluate(&[0.5, 2.0, 0.05]).unwrap();
        assert!(at_truth < far);
    }

    #[test]
    fn test_invalid_fwhm_gives_nan() {
        let mut rng = StdRng::seed_from_u64(5);
        let fit = ScherrerFit::with_defaults(&mut rng).unwrap();
        assert!(fit.evaluate(&[0.9, 1.54, 0.0]).unwrap().is_nan());
    }

    #[test]
    fn test_wrong_dimension_is_an_error() {
        let mut rng = StdRng::seed_from_u64(5);
        let fit = ScherrerFit::with_defaults(&mut rng).unwrap();
        assert!(fit.evaluate(&[0.9, 1.54]).is_err());
    }

    #[test]
    fn test_from_data_rejects_mismatch() {
        assert!(ScherrerFit::from_data(vec![0.1, 0.2], vec![1.0], ScherrerParams::default()).is_err());
        assert!(ScherrerFit::from_data(vec![], vec![], ScherrerParams::default()).is_err());
    }

    #[test]
    fn test_independent_evaluators_do_not_share_data() {
        let a = ScherrerFit::with_defaults(&mut StdRng::seed_from_u64(1)).unwrap();
        let b = ScherrerFit::with_defaults(&mut StdRng::seed_from_u64(2)).unwrap();
        assert_ne!(a.measured(), b.measured());
    }
}
