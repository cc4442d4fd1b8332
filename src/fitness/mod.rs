//! Fitness evaluation and benchmarks
//!
//! This module provides the fitness abstraction, the surrogate-model contract
//! and the built-in objectives.

pub mod benchmarks;
pub mod scherrer;
pub mod surrogate;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::scherrer::*;
    pub use super::surrogate::*;
    pub use super::traits::*;
}
