//! sonder-core
//!
//! Pure domain types and storage key conventions for the assessment engine.
//! No I/O and no AWS SDK dependency. This is the shared vocabulary of the
//! Sonder crates.

pub mod error;
pub mod models;
pub mod s3_keys;
