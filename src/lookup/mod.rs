//! Lookup module containing the record store, identity resolution and the service facade

pub mod resolver;
pub mod service;
pub mod store;

pub use resolver::*;
pub use service::*;
pub use store::*;
