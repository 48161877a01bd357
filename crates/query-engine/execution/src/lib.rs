//! Query execution against a record store.

pub mod error;
pub mod evaluate;
pub mod memory;
pub mod metrics;
pub mod query;
pub mod store;
