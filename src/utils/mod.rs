//! Utility modules

pub mod distance;
pub mod memory_source;
pub mod normalize;
pub mod validation;

pub use distance::*;
pub use memory_source::*;
pub use normalize::*;
pub use validation::*;
