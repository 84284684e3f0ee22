//! sonder-storage
//!
//! Object storage with conditional writes. S3 in production, an in-memory
//! store for tests and local runs. All cross-request coordination in the
//! engine goes through the compare-and-swap primitives defined here.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
