//! Bill lookup service that coordinates validation, resolution and history

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::history::{HistoryConfig, HistorySynthesizer, HistoryWindow};
use crate::lookup::{IdentityResolver, RecordStore, ResolverConfig};
use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Configuration for the whole lookup service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub resolver: ResolverConfig,
    pub history: HistoryConfig,
}

/// Main entry point for bill lookups
///
/// Owns the record store, loaded once, and hands it explicitly to the
/// resolver and the history synthesizer on every call.
#[derive(Debug, Clone)]
pub struct BillingService {
    store: RecordStore,
    resolver: IdentityResolver,
    synthesizer: HistorySynthesizer,
}

impl BillingService {
    /// Create a service over the given store with default configuration
    pub fn new(store: RecordStore) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    /// Create a service with custom configuration
    pub fn with_config(store: RecordStore, config: ServiceConfig) -> Self {
        Self {
            store,
            resolver: IdentityResolver::with_config(config.resolver),
            synthesizer: HistorySynthesizer::with_config(config.history),
        }
    }

    /// Load the dataset from a source and build a service over it
    pub async fn load<S: RecordSource + ?Sized>(
        source: &S,
        config: ServiceConfig,
    ) -> LookupResult<Self> {
        let store = RecordStore::load(source).await?;
        Ok(Self::with_config(store, config))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    // Lookups
    /// Validate the input, then resolve it, exposing which tier matched
    pub fn resolve(&self, raw: &str, class: IdentifierClass) -> LookupResult<MatchResult> {
        validation::validate(raw, class)?;
        Ok(self
            .resolver
            .resolve(&ResolutionQuery::new(raw, class), &self.store))
    }

    /// Look up a bill by either kind of identifier
    pub fn lookup(&self, raw: &str, class: IdentifierClass) -> LookupResult<BillingRecord> {
        let result = self.resolve(raw, class)?;
        if let MatchResult::Fuzzy { record, distance } = &result {
            tracing::info!(
                "Resolved {} {:?} to {} at edit distance {}",
                class.label(),
                raw,
                record.consumer_identifier,
                distance
            );
        }
        result.into_result()
    }

    /// Look up a bill by consumer identifier
    pub fn lookup_by_consumer_identifier(&self, raw: &str) -> LookupResult<BillingRecord> {
        self.lookup(raw, IdentifierClass::ConsumerIdentifier)
    }

    /// Look up a bill by reference number
    pub fn lookup_by_reference_number(&self, raw: &str) -> LookupResult<BillingRecord> {
        self.lookup(raw, IdentifierClass::ReferenceNumber)
    }

    // History
    /// Synthesize bill history up to the current month
    pub fn fetch_history(
        &self,
        raw: &str,
        class: IdentifierClass,
        month_count: u32,
    ) -> LookupResult<Vec<BillingRecord>> {
        let mut rng = RngSource::from_entropy();
        self.fetch_history_with(raw, class, month_count, Local::now().date_naive(), &mut rng)
    }

    /// Synthesize bill history up to the month of `as_of` with the given randomness
    pub fn fetch_history_with(
        &self,
        raw: &str,
        class: IdentifierClass,
        month_count: u32,
        as_of: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> LookupResult<Vec<BillingRecord>> {
        validation::validate(raw, class)?;
        if month_count == 0 {
            return Err(LookupError::InvalidArgument(
                "Month count must be positive".to_string(),
            ));
        }

        let resolved = self.lookup(raw, class)?;
        let rows = self.store.by_identifier(&resolved.consumer_identifier);
        let window = HistoryWindow::from_rows(&resolved.consumer_identifier, rows, month_count)?;

        self.synthesizer.synthesize_window(&window, as_of, rng)
    }

    // Validation and browsing
    /// Check an identifier's format without touching the dataset
    pub fn validate_identifier(&self, raw: &str, class: IdentifierClass) -> ValidationReport {
        validation::validate_identifier(raw, class)
    }

    /// Copies of every stored bill
    pub fn all_bills(&self) -> Vec<BillingRecord> {
        self.store.all().to_vec()
    }

    /// Bills whose identifier, month or status contains the query
    pub fn search_bills(&self, query: &str) -> Vec<BillingRecord> {
        self.store.search(query)
    }
}
