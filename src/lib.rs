//! # evolution-optimizer
//!
//! Population-based optimizers over bounded continuous search spaces.
//!
//! The crate provides a steady-state genetic algorithm, differential
//! evolution (DE/rand/1/bin), a GA driven by a surrogate model with
//! importance-weighted mutation, and a max-min sampler that builds diverse
//! seed sets for continuous and mixed categorical spaces.
//!
//! ## Core Concepts
//!
//! - **Bounds first**: every engine works inside a [`MultiBounds`](genome::bounds::MultiBounds) box
//!   and never produces a point outside it
//! - **Invalid fitness ranks worst**: `NaN` and `+∞` lose every comparison, whichever
//!   [`Direction`](fitness::traits::Direction) is used
//! - **Caller-owned randomness**: each run draws from the `Rng` passed in, so a seeded
//!   generator reproduces a run exactly
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evolution_optimizer::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let result = DifferentialEvolution::builder()
//!     .bounds(MultiBounds::symmetric(5.0, 3))
//!     .mutation_factor(0.8)
//!     .crossover_rate(0.9)
//!     .generations(100)
//!     .build()?
//!     .run(&Sphere::new(3), &mut rng)?;
//! ```

pub mod algorithms;
pub mod diagnostics;
pub mod diversification;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::diversification::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
}
