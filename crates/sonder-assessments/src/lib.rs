//! sonder-assessments
//!
//! Response collection, the assessment state machine and remote links,
//! behind a single [`service::AssessmentService`].

pub mod clock;
pub mod collector;
pub mod config;
pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod remote;
pub mod repo;
pub mod service;
pub mod token;
