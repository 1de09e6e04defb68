//! `granular-core` — shared building blocks for the access-control crates.
//!
//! This crate contains **pure** primitives (no logging, no I/O).

pub mod error;
pub mod segment;

pub use error::{DomainError, DomainResult};
pub use segment::{SEPARATOR, join, validate_segment};
