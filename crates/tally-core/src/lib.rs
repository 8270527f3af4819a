//! Core types and trait definitions for the Tally transaction store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod report;
pub mod store;
pub mod transaction;

/// Month code used by every month-filtered operation when the caller omits
/// one.
pub const DEFAULT_MONTH: &str = "03";
