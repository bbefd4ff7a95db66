//! Bill history synthesis

pub mod synthesizer;

pub use synthesizer::*;
