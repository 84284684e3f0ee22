use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::tenant::TenantRef;

/// A single-use, time-limited capability to open exactly one assessment.
///
/// Persisted under its token id (SHA-256 of the raw token). The raw token
/// only ever exists in the issuance response.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RemoteAssessmentLink {
    pub token_id: String,
    pub assessment_id: Uuid,
    pub tenant: TenantRef,
    pub issued_by: String,
    pub issued_at: jiff::Timestamp,
    pub expires_at: jiff::Timestamp,
    pub redeemed: bool,
    pub redeemed_at: Option<jiff::Timestamp>,
    /// Hash of the session key handed out on redemption.
    pub session_id: Option<String>,
}

impl RemoteAssessmentLink {
    /// Deadlines are evaluated at access time; there is no timer.
    pub fn is_expired_at(&self, now: jiff::Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// Post-redemption session a remote patient uses to submit answers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RemoteSession {
    pub session_id: String,
    pub token_id: String,
    pub assessment_id: Uuid,
    pub tenant: TenantRef,
    pub created_at: jiff::Timestamp,
    pub expires_at: jiff::Timestamp,
}
