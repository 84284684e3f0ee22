//! sonder-audit
//!
//! Append-only compliance trail for remote links and assessment outcomes.
//! Every record is emitted through `tracing` and written once to storage.

pub mod error;
pub mod events;
pub mod trail;
