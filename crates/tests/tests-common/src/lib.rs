//! Fixtures shared by the test suites of every crate.

pub mod fixtures;
pub mod static_files;
