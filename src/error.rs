//! Error types for evolution-optimizer
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for genome and search-space operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A bound whose minimum exceeds its maximum, or that is not finite
    #[error("Invalid bounds for dimension {dimension}: [{min}, {max}]")]
    InvalidBounds { dimension: usize, min: f64, max: f64 },

    /// A search space with no dimensions
    #[error("Search space has no dimensions")]
    EmptySearchSpace,
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Mutation operation failed
    #[error("Mutation failed: {0}")]
    MutationFailed(String),

    /// Selection operation failed
    #[error("Selection failed: {0}")]
    SelectionFailed(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Fitness evaluation failed
    #[error("Fitness evaluation failed: {0}")]
    FitnessEvaluation(String),

    /// Surrogate model prediction failed
    #[error("Surrogate prediction failed: {0}")]
    Surrogate(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;

/// Repair information when an operator needs to fix a constraint violation
#[derive(Debug, Clone, PartialEq)]
pub struct RepairInfo {
    /// Indices of the genes that were pulled back into bounds
    pub repaired_genes: Vec<usize>,
    /// Method used to repair the genome
    pub repair_method: &'static str,
}

/// Result of an operator application with optional repair information
#[derive(Debug, Clone)]
pub enum OperatorResult<G> {
    /// Operation succeeded without repairs
    Success(G),
    /// Operation succeeded but required repairs
    Repaired(G, RepairInfo),
    /// Operation failed unrecoverably
    Failed(OperatorError),
}

impl<G> OperatorResult<G> {
    /// Returns the genome if successful or repaired, None if failed
    pub fn genome(self) -> Option<G> {
        match self {
            Self::Success(g) | Self::Repaired(g, _) => Some(g),
            Self::Failed(_) => None,
        }
    }

    /// Converts into a `Result`, discarding repair information
    pub fn into_result(self) -> Result<G, OperatorError> {
        match self {
            Self::Success(g) | Self::Repaired(g, _) => Ok(g),
            Self::Failed(e) => Err(e),
        }
    }

    /// Returns true if the operation was successful (with or without repairs)
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Returns true if repairs were needed
    pub fn was_repaired(&self) -> bool {
        matches!(self, Self::Repaired(_, _))
    }

    /// Maps the genome type
    pub fn map<U, F: FnOnce(G) -> U>(self, f: F) -> OperatorResult<U> {
        match self {
            Self::Success(g) => OperatorResult::Success(f(g)),
            Self::Repaired(g, info) => OperatorResult::Repaired(f(g), info),
            Self::Failed(e) => OperatorResult::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_error_display() {
        let err = GenomeError::DimensionMismatch {
            expected: 10,
            actual: 5,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 10, got 5");

        let err = GenomeError::InvalidBounds {
            dimension: 2,
            min: 5.0,
            max: 1.0,
        };
        assert_eq!(err.to_string(), "Invalid bounds for dimension 2: [5, 1]");
    }

    #[test]
    fn test_evolution_error_from_genome_error() {
        let evo_err: EvolutionError = GenomeError::EmptySearchSpace.into();
        assert!(matches!(evo_err, EvolutionError::Genome(_)));
        assert_eq!(
            evo_err.to_string(),
            "Genome error: Search space has no dimensions"
        );
    }

    #[test]
    fn test_configuration_error_display() {
        let err = EvolutionError::Configuration("population_size must be >= 4".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: population_size must be >= 4"
        );
    }

    #[test]
    fn test_operator_result_repaired() {
        let repair_info = RepairInfo {
            repaired_genes: vec![0, 3],
            repair_method: "clip",
        };
        let result: OperatorResult<i32> = OperatorResult::Repaired(42, repair_info);
        assert!(result.is_ok());
        assert!(result.was_repaired());
        assert_eq!(result.genome(), Some(42));
    }

    #[test]
    fn test_operator_result_failed() {
        let result: OperatorResult<i32> =
            OperatorResult::Failed(OperatorError::MutationFailed("test".to_string()));
        assert!(!result.is_ok());
        assert!(!result.was_repaired());
        assert_eq!(
            result.into_result(),
            Err(OperatorError::MutationFailed("test".to_string()))
        );
    }

    #[test]
    fn test_operator_result_map() {
        let result: OperatorResult<i32> = OperatorResult::Success(42);
        let mapped = result.map(|x| x * 2);
        assert_eq!(mapped.genome(), Some(84));
    }
}
