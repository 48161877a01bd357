//! Translate the parameters of an incoming request into a document store query.

pub mod error;
pub mod helpers;
pub mod params;
pub mod query;
