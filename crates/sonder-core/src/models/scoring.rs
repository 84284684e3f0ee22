use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A resolved interpretation band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interpretation {
    pub label: String,
    pub description: String,
    pub min_score: u32,
    pub max_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleScore {
    pub score: u32,
    /// Present only when the subscale declares its own bands.
    pub interpretation: Option<Interpretation>,
}

/// Response-pattern concerns surfaced alongside a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ValidityConcern {
    /// Every scored answer has the same raw value on a scale that mixes
    /// forward- and reverse-keyed items.
    StraightLining { value: u32 },
    /// Optional items were left blank.
    OptionalItemsSkipped { count: u32 },
}

impl ValidityConcern {
    /// Whether the concern calls the score itself into question.
    pub fn invalidates(&self) -> bool {
        matches!(self, ValidityConcern::StraightLining { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseValidity {
    pub valid: bool,
    pub concerns: Vec<ValidityConcern>,
}

impl ResponseValidity {
    pub fn from_concerns(concerns: Vec<ValidityConcern>) -> Self {
        let valid = !concerns.iter().any(ValidityConcern::invalidates);
        Self { valid, concerns }
    }
}

/// Output of the scoring engine for a complete response set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringResult {
    pub scale_id: String,
    pub scale_version: String,
    pub total_score: u32,
    pub subscale_scores: BTreeMap<String, SubscaleScore>,
    pub interpretation: Interpretation,
    /// Raised when any critical item has a non-zero resolved value,
    /// regardless of the total score band.
    pub critical_flag: bool,
    pub critical_items: Vec<String>,
    pub validity: ResponseValidity,
    pub answered_items: u32,
}
