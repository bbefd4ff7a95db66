//! In-memory and JSON record sources

use async_trait::async_trait;
use std::path::Path;

use crate::traits::*;
use crate::types::*;

/// In-memory record source for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<BillingRecord>,
}

impl MemorySource {
    /// Create a new memory source holding the given records
    pub fn new(records: Vec<BillingRecord>) -> Self {
        Self { records }
    }

    /// Append a record (useful for building fixtures)
    pub fn push(&mut self, record: BillingRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn load_records(&self) -> LookupResult<Vec<BillingRecord>> {
        Ok(self.records.clone())
    }
}

/// Record source backed by a JSON array of billing records
#[derive(Debug, Clone)]
pub struct JsonSource {
    payload: String,
}

impl JsonSource {
    /// Wrap a JSON document already held in memory
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Read a JSON dataset from disk
    pub fn from_path(path: impl AsRef<Path>) -> LookupResult<Self> {
        let path = path.as_ref();
        let payload = std::fs::read_to_string(path).map_err(|e| {
            LookupError::Dataset(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::new(payload))
    }
}

#[async_trait]
impl RecordSource for JsonSource {
    async fn load_records(&self) -> LookupResult<Vec<BillingRecord>> {
        serde_json::from_str(&self.payload)
            .map_err(|e| LookupError::Dataset(format!("Malformed billing dataset: {}", e)))
    }
}
