//! sonder-instruments
//!
//! Clinical scale definitions and the scoring engine. Pure data and pure
//! functions, no storage dependency. Any instrument plugs in by providing a
//! [`ScaleDefinition`](scale::ScaleDefinition).

pub mod catalog;
pub mod error;
pub mod instruments;
pub mod scale;
pub mod scoring;

use std::collections::BTreeMap;

use sonder_core::models::scoring::ScoringResult;

use error::ScoringError;
use scale::ScaleDefinition;

/// Trait implemented by each bundled clinical instrument.
pub trait Instrument: Send + Sync {
    /// The immutable definition of this instrument.
    fn definition(&self) -> &ScaleDefinition;

    /// Unique identifier (e.g. "phq9", "gad7").
    fn id(&self) -> &str {
        &self.definition().id
    }

    /// Score a response set against this instrument.
    fn score(&self, responses: &BTreeMap<String, u32>) -> Result<ScoringResult, ScoringError> {
        scoring::score(self.definition(), responses)
    }
}

/// Return all bundled instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::gad7::Gad7),
        Box::new(instruments::pss10::Pss10),
        Box::new(instruments::epds::Epds),
    ]
}
