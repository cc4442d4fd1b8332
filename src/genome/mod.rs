//! Search-space and individual representation
//!
//! Box bounds and the real-valued vector every engine evolves.

pub mod bounds;
pub mod real_vector;

pub mod prelude {
    pub use super::bounds::*;
    pub use super::real_vector::*;
}
