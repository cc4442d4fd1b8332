//! Diversity-maximizing sampling
//!
//! Greedy max-min selection of seed points, for pure continuous boxes and for
//! mixed continuous/categorical recipes.

pub mod distance;
pub mod maxmin;
pub mod recipe;

pub mod prelude {
    pub use super::distance::*;
    pub use super::maxmin::{MaxMinConfig, MaxMinDiversifier};
    pub use super::recipe::*;
}
