use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use sonder_core::models::tenant::TenantRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AssessmentCreated,
    LinkIssued,
    LinkRedeemed,
    LinkRedemptionRejected,
    AssessmentCompleted,
    AssessmentAbandoned,
    AssessmentExpired,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AssessmentCreated => "assessment_created",
            AuditAction::LinkIssued => "link_issued",
            AuditAction::LinkRedeemed => "link_redeemed",
            AuditAction::LinkRedemptionRejected => "link_redemption_rejected",
            AuditAction::AssessmentCompleted => "assessment_completed",
            AuditAction::AssessmentAbandoned => "assessment_abandoned",
            AuditAction::AssessmentExpired => "assessment_expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Rejected(String),
}

/// Who triggered the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Actor {
    Clinician(String),
    RemotePatient,
    System,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Clinician(sub) => write!(f, "clinician:{sub}"),
            Actor::RemotePatient => f.write_str("patient:remote"),
            Actor::System => f.write_str("system"),
        }
    }
}

/// A structured, immutable audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub at: jiff::Timestamp,
    pub action: AuditAction,
    pub outcome: AuditOutcome,
    pub actor: Actor,
    pub assessment_id: Option<Uuid>,
    /// SHA-256 token id. Raw tokens never enter the trail.
    pub token_id: Option<String>,
    pub tenant: Option<TenantRef>,
    pub details: Option<serde_json::Value>,
}

impl AuditRecord {
    pub fn new(action: AuditAction, actor: Actor, at: jiff::Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            at,
            action,
            outcome: AuditOutcome::Success,
            actor,
            assessment_id: None,
            token_id: None,
            tenant: None,
            details: None,
        }
    }

    pub fn assessment(mut self, id: Uuid) -> Self {
        self.assessment_id = Some(id);
        self
    }

    pub fn token(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    pub fn tenant(mut self, tenant: &TenantRef) -> Self {
        self.tenant = Some(tenant.clone());
        self
    }

    pub fn rejected(mut self, reason: impl Into<String>) -> Self {
        self.outcome = AuditOutcome::Rejected(reason.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this record via tracing.
    pub fn emit(&self) {
        let outcome = match &self.outcome {
            AuditOutcome::Success => "success",
            AuditOutcome::Rejected(reason) => reason.as_str(),
        };
        info!(
            audit.id = %self.id,
            audit.action = self.action.as_str(),
            audit.outcome = outcome,
            audit.actor = %self.actor,
            audit.assessment_id = ?self.assessment_id,
            audit.token_id = ?self.token_id,
            audit.tenant = ?self.tenant.as_ref().map(ToString::to_string),
            "audit event"
        );
    }
}
