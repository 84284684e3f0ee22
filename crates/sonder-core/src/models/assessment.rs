use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::scoring::ScoringResult;
use super::tenant::TenantRef;

/// How the assessment is administered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AssessmentMode {
    /// Clinician enters answers during a session.
    InPerson,
    /// Patient answers through a tokenized link.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AssessmentStatus {
    Created,
    InProgress,
    Completed,
    Expired,
    Abandoned,
}

impl AssessmentStatus {
    /// Terminal states are retained for history; nothing leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AssessmentStatus::Completed | AssessmentStatus::Expired | AssessmentStatus::Abandoned
        )
    }

    /// Only these states take new answers.
    pub fn accepts_responses(&self) -> bool {
        matches!(self, AssessmentStatus::Created | AssessmentStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::Created => "created",
            AssessmentStatus::InProgress => "in_progress",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Expired => "expired",
            AssessmentStatus::Abandoned => "abandoned",
        }
    }
}

/// Why an assessment was closed without being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClosureReason {
    LinkExpired,
    Inactivity,
    Administrator,
}

/// A single recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemResponse {
    pub value: u32,
    pub answered_at: jiff::Timestamp,
}

/// One administration of a scale to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: Uuid,
    pub scale_id: String,
    pub scale_version: String,
    pub patient_id: String,
    pub administrator_id: String,
    pub tenant: TenantRef,
    pub mode: AssessmentMode,
    pub status: AssessmentStatus,
    /// Answers keyed by item id.
    #[serde(default)]
    pub responses: BTreeMap<String, ItemResponse>,
    /// Client-side cursor. Not interpreted by the engine.
    #[serde(default)]
    pub current_step: u32,
    pub scoring_results: Option<ScoringResult>,
    /// Token id (never the raw token) of the issued remote link.
    pub remote_link_id: Option<String>,
    pub remote_deadline: Option<jiff::Timestamp>,
    pub created_at: jiff::Timestamp,
    pub started_at: Option<jiff::Timestamp>,
    pub completed_at: Option<jiff::Timestamp>,
    pub last_activity_at: jiff::Timestamp,
    pub closed_at: Option<jiff::Timestamp>,
    pub closure_reason: Option<ClosureReason>,
}

impl Assessment {
    /// Raw answer values keyed by item id, as consumed by the scoring engine.
    pub fn raw_values(&self) -> BTreeMap<String, u32> {
        self.responses
            .iter()
            .map(|(item_id, response)| (item_id.clone(), response.value))
            .collect()
    }
}
