use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    /// Returned for unknown and inactive scales alike.
    #[error("scale not found: {0}")]
    ScaleNotFound(String),

    #[error("duplicate scale id in catalog: {0}")]
    DuplicateScale(String),

    #[error("invalid scale definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error("failed to parse scale definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A scale definition that cannot be trusted to produce a clinical reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("{scale_id}: scale has no items")]
    NoItems { scale_id: String },

    #[error("{scale_id}: duplicate item id '{item_id}'")]
    DuplicateItem { scale_id: String, item_id: String },

    #[error("{scale_id}: item '{item_id}' has position {found}, expected {expected}")]
    ItemPosition {
        scale_id: String,
        item_id: String,
        expected: u32,
        found: u32,
    },

    #[error("{scale_id}: item '{item_id}' declares no response options")]
    NoOptions { scale_id: String, item_id: String },

    #[error("{scale_id}: item '{item_id}' declares option value {value} twice")]
    DuplicateOption {
        scale_id: String,
        item_id: String,
        value: u32,
    },

    #[error("{scale_id}: item '{item_id}' references unknown subscale '{subscale_id}'")]
    UnknownSubscale {
        scale_id: String,
        item_id: String,
        subscale_id: String,
    },

    #[error("{scale_id}: duplicate subscale id '{subscale_id}'")]
    DuplicateSubscale { scale_id: String, subscale_id: String },

    #[error("{scale_id}: critical item '{item_id}' is not an item of the scale")]
    UnknownCriticalItem { scale_id: String, item_id: String },

    #[error(
        "{scale_id}: declared score range [{declared_min}, {declared_max}] does not match \
         the range derived from items [{derived_min}, {derived_max}]"
    )]
    RangeMismatch {
        scale_id: String,
        declared_min: u32,
        declared_max: u32,
        derived_min: u32,
        derived_max: u32,
    },

    #[error("{scale_id}/{owner}: no interpretation bands declared")]
    NoBands { scale_id: String, owner: String },

    #[error("{scale_id}/{owner}: band '{label}' is inverted ({min} > {max})")]
    InvertedBand {
        scale_id: String,
        owner: String,
        label: String,
        min: u32,
        max: u32,
    },

    #[error("{scale_id}/{owner}: scores {from}..={to} are not covered by any band")]
    BandGap {
        scale_id: String,
        owner: String,
        from: u32,
        to: u32,
    },

    #[error("{scale_id}/{owner}: bands overlap on scores {from}..={to}")]
    BandOverlap {
        scale_id: String,
        owner: String,
        from: u32,
        to: u32,
    },

    #[error("{scale_id}/{owner}: band '{label}' extends outside the score range [{min}, {max}]")]
    BandOutOfRange {
        scale_id: String,
        owner: String,
        label: String,
        min: u32,
        max: u32,
    },
}

/// Failures of the scoring algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("{scale_id}: missing responses for required items: {}", item_ids.join(", "))]
    MissingRequiredItems {
        scale_id: String,
        item_ids: Vec<String>,
    },

    #[error("{scale_id}: response for unknown item '{item_id}'")]
    UnknownItem { scale_id: String, item_id: String },

    #[error("{scale_id}: value {value} is not an option of item '{item_id}'")]
    InvalidValue {
        scale_id: String,
        item_id: String,
        value: u32,
    },

    #[error("{scale_id}: score {score} ({owner}) matches no interpretation band")]
    NoInterpretationBand {
        scale_id: String,
        owner: String,
        score: u32,
    },

    #[error("{scale_id}: score {score} ({owner}) matches more than one interpretation band")]
    AmbiguousInterpretationBand {
        scale_id: String,
        owner: String,
        score: u32,
    },
}

impl ScoringError {
    /// True when the failure points at a corrupt scale definition rather
    /// than at the response set.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            ScoringError::NoInterpretationBand { .. }
                | ScoringError::AmbiguousInterpretationBand { .. }
        )
    }

    pub fn scale_id(&self) -> &str {
        match self {
            ScoringError::MissingRequiredItems { scale_id, .. }
            | ScoringError::UnknownItem { scale_id, .. }
            | ScoringError::InvalidValue { scale_id, .. }
            | ScoringError::NoInterpretationBand { scale_id, .. }
            | ScoringError::AmbiguousInterpretationBand { scale_id, .. } => scale_id,
        }
    }
}
