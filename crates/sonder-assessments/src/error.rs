use thiserror::Error;
use uuid::Uuid;

use sonder_core::models::assessment::{AssessmentMode, AssessmentStatus};
use sonder_instruments::error::ScoringError;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("assessment not found: {0}")]
    NotFound(Uuid),

    #[error("scale not found: {0}")]
    ScaleNotFound(String),

    #[error("patient not found: {0}")]
    PatientNotFound(String),

    #[error("tenant could not be resolved for caller {subject}")]
    TenantUnresolved { subject: String },

    #[error("item '{item_id}' is not part of scale {scale_id}")]
    InvalidItem { scale_id: String, item_id: String },

    #[error("value {value} is not a declared option of item '{item_id}'")]
    InvalidValue { item_id: String, value: u32 },

    #[error("step {step} is beyond the {item_count} items of the scale")]
    InvalidStep { step: u32, item_count: u32 },

    #[error("assessment is {} and does not accept this operation", status.as_str())]
    NotActive { status: AssessmentStatus },

    #[error("required items unanswered: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },

    #[error("assessment already completed")]
    AlreadyCompleted,

    #[error("operation requires a {expected:?} assessment")]
    ModeMismatch { expected: AssessmentMode },

    #[error("a remote link was already issued for this assessment")]
    LinkAlreadyIssued,

    #[error("link ttl of {ttl_days} days is outside 1..={max_days}")]
    InvalidTtl { ttl_days: i64, max_days: i64 },

    #[error("remote link not found")]
    LinkNotFound,

    #[error("remote link expired")]
    LinkExpired,

    #[error("remote link already used")]
    LinkAlreadyUsed,

    #[error("remote session not found")]
    SessionNotFound,

    #[error("scale definition {scale_id} is corrupt: {source}")]
    ScaleDefinition {
        scale_id: String,
        #[source]
        source: ScoringError,
    },

    #[error("invalid transition from {} to {}", from.as_str(), to.as_str())]
    InvalidTransition {
        from: AssessmentStatus,
        to: AssessmentStatus,
    },

    #[error("gave up on assessment {assessment_id} after repeated write conflicts")]
    WriteContention { assessment_id: Uuid },

    #[error("invalid engine configuration: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] sonder_storage::error::StorageError),

    #[error("audit error: {0}")]
    Audit(#[from] sonder_audit::error::AuditError),
}

impl AssessmentError {
    /// Reason code recorded when a link redemption is refused.
    pub fn rejection_reason(&self) -> Option<&'static str> {
        match self {
            AssessmentError::LinkNotFound => Some("not_found"),
            AssessmentError::LinkExpired => Some("expired"),
            AssessmentError::LinkAlreadyUsed => Some("already_used"),
            _ => None,
        }
    }
}
