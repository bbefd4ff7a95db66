//! # Billcheck Core
//!
//! Bill lookup for utility consumers: locate a billing record from a
//! consumer identifier or bill reference number typed by a person, and
//! synthesize a bounded history of monthly bills for the matched consumer.
//!
//! ## Features
//!
//! - **Validation**: syntax rules for consumer identifiers (10-12 digits) and reference numbers (8-16 alphanumerics)
//! - **Normalization**: spaces, dashes and underscores never affect a match
//! - **Tiered resolution**: exact, then containment, then edit distance within a small threshold
//! - **History synthesis**: reproducible monthly bills from a seed record with an injected random source
//! - **Source abstraction**: load the reference dataset from memory, JSON, or any `RecordSource`
//!
//! ## Quick Start
//!
//! ```rust
//! use billcheck_core::{BillStatus, BillingRecord, BillingService, RecordStore};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! let store = RecordStore::new(vec![BillingRecord::new(
//!     "987654321098".to_string(),
//!     NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
//!     BigDecimal::from(1450),
//!     BigDecimal::from(1711),
//!     320,
//!     8800,
//!     BillStatus::Unpaid,
//! )]);
//! let service = BillingService::new(store);
//!
//! let bill = service.lookup_by_consumer_identifier("9876 5432 1098").unwrap();
//! assert_eq!(bill.consumer_identifier, "987654321098");
//! ```

pub mod history;
pub mod lookup;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use history::*;
pub use lookup::*;
pub use traits::*;
pub use types::*;

pub use utils::{normalize, validate, validate_identifier};
