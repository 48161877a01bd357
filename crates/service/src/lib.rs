//! Operations on environmental records, answering with response envelopes.

pub mod envelope;
pub mod error;
pub mod mutation;
pub mod query;
pub mod records;
pub mod service;
pub mod state;
pub mod stats;
pub mod validation;
