//! Surrogate model contract
//!
//! The hybrid engine scores whole populations through a predictive model
//! instead of a per-individual fitness function.

use crate::error::{EvoResult, EvolutionError};
use crate::genome::real_vector::RealVector;

/// A predictive model that scores a batch of individuals in one call
///
/// Higher predictions are better unless the engine is configured otherwise.
/// Implementations must return exactly one prediction per input.
pub trait SurrogateModel {
    /// Predict one score per individual, in input order
    fn batch_predict(&self, individuals: &[RealVector]) -> EvoResult<Vec<f64>>;
}

impl<T: SurrogateModel + ?Sized> SurrogateModel for &T {
    fn batch_predict(&self, individuals: &[RealVector]) -> EvoResult<Vec<f64>> {
        (**self).batch_predict(individuals)
    }
}

impl<T: SurrogateModel + ?Sized> SurrogateModel for Box<T> {
    fn batch_predict(&self, individuals: &[RealVector]) -> EvoResult<Vec<f64>> {
        (**self).batch_predict(individuals)
    }
}

/// Adapts a per-row closure into a batch model
///
/// Useful for stub models in tests and for cheap analytic surrogates.
pub struct FnSurrogate<F>
where
    F: Fn(&[f64]) -> f64,
{
    f: F,
}

impl<F> FnSurrogate<F>
where
    F: Fn(&[f64]) -> f64,
{
    /// Wrap a row-wise prediction function
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SurrogateModel for FnSurrogate<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn batch_predict(&self, individuals: &[RealVector]) -> EvoResult<Vec<f64>> {
        Ok(individuals.iter().map(|x| (self.f)(x.genes())).collect())
    }
}

/// Run a batch prediction and check that every row got a score
pub fn predict_checked<M: SurrogateModel + ?Sized>(
    model: &M,
    individuals: &[RealVector],
) -> EvoResult<Vec<f64>> {
    let predictions = model.batch_predict(individuals)?;
    if predictions.len() != individuals.len() {
        return Err(EvolutionError::Surrogate(format!(
            "model returned {} predictions for {} individuals",
            predictions.len(),
            individuals.len()
        )));
    }
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ShortModel;

    impl SurrogateModel for ShortModel {
        fn batch_predict(&self, individuals: &[RealVector]) -> EvoResult<Vec<f64>> {
            Ok(vec![0.0; individuals.len().saturating_sub(1)])
        }
    }

    #[test]
    fn test_fn_surrogate_predicts_per_row() {
        let model = FnSurrogate::new(|x: &[f64]| x.iter().sum());
        let batch = vec![RealVector::new(vec![1.0, 2.0]), RealVector::new(vec![0.5, 0.5])];
        assert_eq!(predict_checked(&model, &batch).unwrap(), vec![3.0, 1.0]);
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let batch = vec![RealVector::zeros(2), RealVector::zeros(2)];
        let err = predict_checked(&ShortModel, &batch).unwrap_err();
        assert!(matches!(err, EvolutionError::Surrogate(_)));
    }

    #[test]
    fn test_boxed_model() {
        let model: Box<dyn SurrogateModel> = Box::new(FnSurrogate::new(|x: &[f64]| -x[0]));
        let out = predict_checked(&model, &[RealVector::new(vec![2.0])]).unwrap();
        assert_eq!(out, vec![-2.0]);
    }
}
