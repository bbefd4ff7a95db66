//! Core types and data structures for bill lookup

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Payment status of a single billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Bill has been settled
    Paid,
    /// Bill is open and not yet past its due date
    Unpaid,
    /// Bill is open and past its due date
    Overdue,
}

impl BillStatus {
    /// Lowercase name used in datasets and search
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "paid",
            BillStatus::Unpaid => "unpaid",
            BillStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kinds of identifier a customer can look a bill up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierClass {
    /// Numeric consumer identifier, 10 to 12 digits
    ConsumerIdentifier,
    /// Alphanumeric bill reference number, 8 to 16 characters
    ReferenceNumber,
}

impl IdentifierClass {
    /// Human-readable field name
    pub fn label(&self) -> &'static str {
        match self {
            IdentifierClass::ConsumerIdentifier => "Consumer ID",
            IdentifierClass::ReferenceNumber => "Reference Number",
        }
    }

    /// Whether a character survives normalization for this class
    pub fn accepts(&self, c: char) -> bool {
        match self {
            IdentifierClass::ConsumerIdentifier => c.is_ascii_digit(),
            IdentifierClass::ReferenceNumber => c.is_ascii_alphanumeric(),
        }
    }

    /// Inclusive length bounds of a well-formed identifier
    pub fn length_bounds(&self) -> (usize, usize) {
        match self {
            IdentifierClass::ConsumerIdentifier => (10, 12),
            IdentifierClass::ReferenceNumber => (8, 16),
        }
    }

    /// Check the length of an already-normalized identifier
    pub fn has_valid_length(&self, normalized: &str) -> bool {
        let (min, max) = self.length_bounds();
        (min..=max).contains(&normalized.chars().count())
    }
}

/// One billing period for one consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecord {
    /// Digits-only consumer identifier; the identity key of the record
    #[serde(alias = "consumerId")]
    pub consumer_identifier: String,
    /// First day of the billed month
    pub billing_month: NaiveDate,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Energy charge before taxes and surcharges
    #[serde(alias = "billAmount")]
    pub base_amount: BigDecimal,
    /// Amount payable
    pub total_amount: BigDecimal,
    /// Units consumed in the period; 0 when the source did not report it
    #[serde(default)]
    pub units_consumed: u64,
    /// Meter reading at the end of the period; 0 when not reported
    #[serde(default)]
    pub meter_reading: u64,
    /// Payment status
    pub status: BillStatus,
}

impl BillingRecord {
    /// Create a new record, due on the 25th of the billed month
    pub fn new(
        consumer_identifier: String,
        billing_month: NaiveDate,
        base_amount: BigDecimal,
        total_amount: BigDecimal,
        units_consumed: u64,
        meter_reading: u64,
        status: BillStatus,
    ) -> Self {
        let due_date = NaiveDate::from_ymd_opt(billing_month.year(), billing_month.month(), 25)
            .unwrap_or(billing_month);
        Self {
            consumer_identifier,
            billing_month,
            due_date,
            base_amount,
            total_amount,
            units_consumed,
            meter_reading,
            status,
        }
    }

    /// Stable identifier derived from the consumer and the billed month
    pub fn record_id(&self) -> Uuid {
        let key = format!(
            "{}:{}",
            self.consumer_identifier,
            self.billing_month.format("%Y-%m")
        );
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
    }

    /// Whether the bill still has to be paid
    pub fn is_outstanding(&self) -> bool {
        self.status != BillStatus::Paid
    }
}

/// A single lookup request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionQuery {
    /// Input exactly as the user typed it
    pub raw_input: String,
    /// Which kind of identifier the input claims to be
    pub identifier_class: IdentifierClass,
}

impl ResolutionQuery {
    /// Create a new query
    pub fn new(raw_input: impl Into<String>, identifier_class: IdentifierClass) -> Self {
        Self {
            raw_input: raw_input.into(),
            identifier_class,
        }
    }

    /// Query by consumer identifier
    pub fn consumer(raw_input: impl Into<String>) -> Self {
        Self::new(raw_input, IdentifierClass::ConsumerIdentifier)
    }

    /// Query by reference number
    pub fn reference(raw_input: impl Into<String>) -> Self {
        Self::new(raw_input, IdentifierClass::ReferenceNumber)
    }
}

/// Outcome of resolving a query against the record store
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// Exact or containment hit
    Exact(BillingRecord),
    /// Accepted within the edit distance threshold
    Fuzzy {
        record: BillingRecord,
        distance: usize,
    },
    /// No tier matched; carries the query as typed
    NotFound { query: String },
}

impl MatchResult {
    /// The matched record, if any
    pub fn record(&self) -> Option<&BillingRecord> {
        match self {
            MatchResult::Exact(record) | MatchResult::Fuzzy { record, .. } => Some(record),
            MatchResult::NotFound { .. } => None,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MatchResult::Exact(_))
    }

    pub fn is_fuzzy(&self) -> bool {
        matches!(self, MatchResult::Fuzzy { .. })
    }

    /// Collapse into the record-or-error view callers work with
    pub fn into_result(self) -> LookupResult<BillingRecord> {
        match self {
            MatchResult::Exact(record) | MatchResult::Fuzzy { record, .. } => Ok(record),
            MatchResult::NotFound { query } => Err(LookupError::NotFound(query)),
        }
    }
}

/// Result of checking an identifier's format, shaped for form feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub message: String,
}

/// Errors that can occur while looking up bills
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("{0} is required")]
    MissingField(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Bill not found for: {0}")]
    NotFound(String),
    #[error("No bill history found for consumer ID {0}")]
    NoHistoryAvailable(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Dataset error: {0}")]
    Dataset(String),
}

/// Result type for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;
