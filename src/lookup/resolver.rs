//! Tiered identity resolution: exact, containment, then fuzzy

use serde::{Deserialize, Serialize};

use crate::lookup::RecordStore;
use crate::types::*;
use crate::utils::distance::edit_distance;
use crate::utils::normalize::{normalize, reference_pattern};

/// Tag prefixed to the derived reference pattern of a stored record
pub const DEFAULT_REFERENCE_TAG: &str = "REF";

/// Thresholds for identity resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Largest edit distance the fuzzy tier accepts
    pub max_distance: usize,
    /// Largest length difference the fuzzy tier accepts
    pub max_length_delta: usize,
    /// Literal tag of derived reference patterns
    pub reference_tag: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_distance: 2,
            max_length_delta: 1,
            reference_tag: DEFAULT_REFERENCE_TAG.to_string(),
        }
    }
}

/// Resolves a query to at most one stored record
///
/// Tiers run in order and the first hit wins:
/// 1. exact equality of normalized forms
/// 2. containment, where one well-formed identifier contains the other
/// 3. edit distance within the configured thresholds
///
/// Ties within a tier go to the earliest record in store order.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    config: ResolverConfig,
}

impl IdentityResolver {
    /// Create a resolver with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with custom thresholds
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a query against the store
    pub fn resolve(&self, query: &ResolutionQuery, store: &RecordStore) -> MatchResult {
        let class = query.identifier_class;
        let needle = self.query_key(query);

        if needle.is_empty() {
            return MatchResult::NotFound {
                query: query.raw_input.clone(),
            };
        }

        let candidates: Vec<(&BillingRecord, String)> = store
            .all()
            .iter()
            .map(|record| (record, self.record_key(record, class)))
            .collect();

        if let Some(record) = exact_tier(&needle, &candidates) {
            tracing::debug!("Exact match for {} {}", class.label(), needle);
            return MatchResult::Exact(record.clone());
        }

        if let Some(record) = containment_tier(&needle, &candidates, class) {
            tracing::debug!(
                "Containment match for {} {} -> {}",
                class.label(),
                needle,
                record.consumer_identifier
            );
            return MatchResult::Exact(record.clone());
        }

        if let Some((record, distance)) = self.fuzzy_tier(&needle, &candidates) {
            tracing::debug!(
                "Fuzzy match for {} {} -> {} (distance {})",
                class.label(),
                needle,
                record.consumer_identifier,
                distance
            );
            return MatchResult::Fuzzy {
                record: record.clone(),
                distance,
            };
        }

        tracing::debug!("No match for {} {}", class.label(), needle);
        MatchResult::NotFound {
            query: query.raw_input.clone(),
        }
    }

    /// Comparable form of the query; reference numbers compare upper-cased
    fn query_key(&self, query: &ResolutionQuery) -> String {
        let normalized = normalize(&query.raw_input, query.identifier_class);
        match query.identifier_class {
            IdentifierClass::ConsumerIdentifier => normalized,
            IdentifierClass::ReferenceNumber => normalized.to_ascii_uppercase(),
        }
    }

    /// Comparable form of a stored record for the query's class
    fn record_key(&self, record: &BillingRecord, class: IdentifierClass) -> String {
        match class {
            IdentifierClass::ConsumerIdentifier => normalize(&record.consumer_identifier, class),
            IdentifierClass::ReferenceNumber => {
                reference_pattern(&record.consumer_identifier, &self.config.reference_tag)
            }
        }
    }

    fn fuzzy_tier<'a>(
        &self,
        needle: &str,
        candidates: &[(&'a BillingRecord, String)],
    ) -> Option<(&'a BillingRecord, usize)> {
        let needle_len = needle.chars().count();
        candidates.iter().find_map(|(record, key)| {
            // Length gate first so the table is only built for plausible candidates
            if needle_len.abs_diff(key.chars().count()) > self.config.max_length_delta {
                return None;
            }
            let distance = edit_distance(needle, key);
            (distance <= self.config.max_distance).then_some((*record, distance))
        })
    }
}

fn exact_tier<'a>(
    needle: &str,
    candidates: &[(&'a BillingRecord, String)],
) -> Option<&'a BillingRecord> {
    candidates
        .iter()
        .find(|(_, key)| key == needle)
        .map(|(record, _)| *record)
}

/// Both sides must be well-formed for their class, which keeps short
/// fragments like "123" from matching inside unrelated identifiers.
fn containment_tier<'a>(
    needle: &str,
    candidates: &[(&'a BillingRecord, String)],
    class: IdentifierClass,
) -> Option<&'a BillingRecord> {
    if !class.has_valid_length(needle) {
        return None;
    }
    candidates
        .iter()
        .find(|(_, key)| {
            !key.is_empty()
                && class.has_valid_length(key)
                && (key.contains(needle) || needle.contains(key.as_str()))
        })
        .map(|(record, _)| *record)
}
