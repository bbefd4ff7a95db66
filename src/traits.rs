//! Traits for dataset loading and injectable randomness

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::*;

/// Source of the reference billing dataset
///
/// This trait lets the lookup core be fed from any backend (a bundled JSON
/// file, an in-memory fixture, a database export) by implementing a single
/// load method. The store calls it once at startup and never writes back.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every record, in the order the source holds them
    async fn load_records(&self) -> LookupResult<Vec<BillingRecord>>;
}

/// Random number source used to vary synthesized history
pub trait RandomSource {
    /// Draw a value in `[min, max)`; returns `min` when the range is empty
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

/// Adapter exposing any `rand` generator as a [`RandomSource`]
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible source for a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }
}
