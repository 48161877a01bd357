//! A document store query: its AST, builders, rendering to JSON documents, and
//! parsing of clauses written by callers.

pub mod ast;
pub mod convert;
pub mod helpers;
pub mod parse;
