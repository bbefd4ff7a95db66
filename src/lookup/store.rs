//! Read-only store of reference billing records

use crate::traits::RecordSource;
use crate::types::*;
use crate::utils::normalize::normalize;

/// Immutable collection of billing records, loaded once at startup
///
/// Iteration order is load order and never changes. There are no writers
/// after construction, so a store can be shared across threads behind an
/// `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<BillingRecord>,
}

impl RecordStore {
    /// Create a store from records in load order
    pub fn new(records: Vec<BillingRecord>) -> Self {
        Self { records }
    }

    /// Build a store from a record source
    pub async fn load<S: RecordSource + ?Sized>(source: &S) -> LookupResult<Self> {
        let records = source.load_records().await?;
        tracing::info!("Loaded {} billing records", records.len());
        Ok(Self::new(records))
    }

    /// Every record, in load order
    pub fn all(&self) -> &[BillingRecord] {
        &self.records
    }

    /// Copies of every row sharing the given identifier, in load order
    ///
    /// Both sides are normalized before comparison. The first element is
    /// the canonical template for history synthesis.
    pub fn by_identifier(&self, consumer_identifier: &str) -> Vec<BillingRecord> {
        let wanted = normalize(consumer_identifier, IdentifierClass::ConsumerIdentifier);
        if wanted.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|record| {
                normalize(
                    &record.consumer_identifier,
                    IdentifierClass::ConsumerIdentifier,
                ) == wanted
            })
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over identifier, billing month and status
    ///
    /// An empty query returns every record.
    pub fn search(&self, query: &str) -> Vec<BillingRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.clone();
        }
        self.records
            .iter()
            .filter(|record| {
                record.consumer_identifier.to_lowercase().contains(&needle)
                    || record.billing_month.to_string().contains(&needle)
                    || record.status.as_str().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn record(id: &str, year: i32, month: u32, status: BillStatus) -> BillingRecord {
        BillingRecord::new(
            id.to_string(),
            NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            BigDecimal::from(800),
            BigDecimal::from(944),
            200,
            1500,
            status,
        )
    }

    fn store() -> RecordStore {
        RecordStore::new(vec![
            record("1234567890", 2024, 1, BillStatus::Paid),
            record("987654321098", 2024, 2, BillStatus::Unpaid),
            record("1234567890", 2024, 3, BillStatus::Overdue),
        ])
    }

    #[test]
    fn test_all_preserves_load_order() {
        let store = store();
        let months: Vec<u32> = store
            .all()
            .iter()
            .map(|r| chrono::Datelike::month(&r.billing_month))
            .collect();
        assert_eq!(months, vec![1, 2, 3]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_by_identifier_returns_all_rows_in_order() {
        let rows = store().by_identifier("123-456-7890");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, BillStatus::Paid);
        assert_eq!(rows[1].status, BillStatus::Overdue);
    }

    #[test]
    fn test_by_identifier_unknown_or_blank() {
        assert!(store().by_identifier("5555555555").is_empty());
        assert!(store().by_identifier("  ").is_empty());
    }

    #[test]
    fn test_by_identifier_returns_copies() {
        let store = store();
        let mut rows = store.by_identifier("987654321098");
        rows[0].status = BillStatus::Paid;
        assert_eq!(store.all()[1].status, BillStatus::Unpaid);
    }

    #[test]
    fn test_search() {
        let store = store();
        assert_eq!(store.search("").len(), 3);
        assert_eq!(store.search("9876").len(), 1);
        assert_eq!(store.search("2024-03").len(), 1);
        assert_eq!(store.search("UNPAID").len(), 1);
        assert_eq!(store.search("paid").len(), 2);
        assert!(store.search("nothing").is_empty());
    }
}
