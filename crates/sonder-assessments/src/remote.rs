//! Remote links: single-use, time-limited capabilities scoped to one
//! assessment.
//!
//! Only token ids (SHA-256) are stored or audited. The raw link token
//! exists in the issuance response, the session key in the redemption
//! response, and nowhere else.

use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use sonder_audit::events::{Actor, AuditAction, AuditRecord};
use sonder_core::models::assessment::{Assessment, AssessmentMode, AssessmentStatus};
use sonder_core::models::remote_link::{RemoteAssessmentLink, RemoteSession};
use sonder_core::models::scoring::ScoringResult;
use sonder_core::models::tenant::TenantRef;
use sonder_instruments::scale::ScaleDefinition;
use sonder_storage::error::StorageError;

use crate::error::AssessmentError;
use crate::lifecycle;
use crate::service::AssessmentService;
use crate::token;

/// Issuance response. The only place the raw token ever appears.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedLink {
    pub assessment_id: Uuid,
    pub token: String,
    pub expires_at: Timestamp,
}

/// What a patient receives on successful redemption.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentHandle {
    pub assessment_id: Uuid,
    pub scale: ScaleDefinition,
    pub responses: BTreeMap<String, u32>,
    pub current_step: u32,
    pub expires_at: Timestamp,
    /// Credential for the remote session routes, bounded by `expires_at`.
    pub session_key: String,
}

impl AssessmentService {
    pub async fn issue_link(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        actor: &str,
        ttl_days: Option<i64>,
    ) -> Result<IssuedLink, AssessmentError> {
        let ttl_days = self.config.link_ttl_days(ttl_days)?;

        let (current, _) = self.load_current(id, tenant).await?;
        check_issuable(&current)?;

        let token = token::mint_token();
        let token_id = token::token_id(&token);
        let now = self.clock.now();
        let expires_at = now + SignedDuration::from_hours(ttl_days * 24);

        // The link goes in first: a link whose assessment never points back
        // at it cannot be redeemed.
        self.repo
            .insert_link(&RemoteAssessmentLink {
                token_id: token_id.clone(),
                assessment_id: id,
                tenant: tenant.clone(),
                issued_by: actor.to_string(),
                issued_at: now,
                expires_at,
                redeemed: false,
                redeemed_at: None,
                session_id: None,
            })
            .await?;

        self.mutate(id, tenant, |a, _| {
            check_issuable(a)?;
            a.remote_link_id = Some(token_id.clone());
            a.remote_deadline = Some(expires_at);
            Ok(())
        })
        .await?;

        info!(assessment_id = %id, token_id = %token_id, ttl_days, "remote link issued");
        self.audit
            .record(
                AuditRecord::new(
                    AuditAction::LinkIssued,
                    Actor::Clinician(actor.to_string()),
                    now,
                )
                .assessment(id)
                .token(token_id)
                .tenant(tenant)
                .with_details(json!({ "ttl_days": ttl_days, "expires_at": expires_at })),
            )
            .await?;

        Ok(IssuedLink {
            assessment_id: id,
            token,
            expires_at,
        })
    }

    /// Redeem a link token. Every attempt is audited, successful or not.
    pub async fn redeem(&self, raw_token: &str) -> Result<AssessmentHandle, AssessmentError> {
        let token_id = token::token_id(raw_token);
        let mut assessment_id = None;
        let outcome = self
            .try_redeem(raw_token, &token_id, &mut assessment_id)
            .await;

        let now = self.clock.now();
        let record = match &outcome {
            Ok(handle) => {
                info!(assessment_id = %handle.assessment_id, token_id = %token_id, "remote link redeemed");
                AuditRecord::new(AuditAction::LinkRedeemed, Actor::RemotePatient, now)
                    .assessment(handle.assessment_id)
                    .token(token_id)
            }
            Err(e) => {
                let reason = e.rejection_reason().unwrap_or("error");
                warn!(token_id = %token_id, reason, "remote link redemption rejected");
                let record =
                    AuditRecord::new(AuditAction::LinkRedemptionRejected, Actor::RemotePatient, now)
                        .token(token_id)
                        .rejected(reason);
                match assessment_id {
                    Some(id) => record.assessment(id),
                    None => record,
                }
            }
        };
        self.audit.record(record).await?;

        outcome
    }

    async fn try_redeem(
        &self,
        raw_token: &str,
        token_id: &str,
        assessment_id: &mut Option<Uuid>,
    ) -> Result<AssessmentHandle, AssessmentError> {
        if !token::is_well_formed(raw_token) {
            return Err(AssessmentError::LinkNotFound);
        }
        let Some((mut link, etag)) = self.repo.load_link(token_id).await? else {
            return Err(AssessmentError::LinkNotFound);
        };
        *assessment_id = Some(link.assessment_id);

        if link.redeemed {
            return Err(AssessmentError::LinkAlreadyUsed);
        }

        let now = self.clock.now();
        if link.is_expired_at(now) {
            // Loading applies the passed deadline to the assessment too.
            match self.load_current(link.assessment_id, &link.tenant).await {
                Ok(_) | Err(AssessmentError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
            return Err(AssessmentError::LinkExpired);
        }

        let assessment = match self.load_current(link.assessment_id, &link.tenant).await {
            Ok((assessment, _)) => assessment,
            Err(AssessmentError::NotFound(_)) => return Err(AssessmentError::LinkNotFound),
            Err(e) => return Err(e),
        };
        if assessment.remote_link_id.as_deref() != Some(token_id) {
            return Err(AssessmentError::LinkNotFound);
        }
        redemption_outcome(assessment.status)?;

        let session_key = token::mint_token();
        let session_id = token::token_id(&session_key);

        // The single atomic guard: only one conditional write on the link
        // can succeed for a given ETag.
        link.redeemed = true;
        link.redeemed_at = Some(now);
        link.session_id = Some(session_id.clone());
        match self.repo.replace_link(&link, &etag).await {
            Ok(_) => {}
            Err(StorageError::PreconditionFailed { .. }) => {
                return Err(AssessmentError::LinkAlreadyUsed);
            }
            Err(e) => return Err(e.into()),
        }

        // The assessment may have closed since it was read above. The session
        // exists only once the assessment is open.
        let (assessment, ()) = self
            .mutate(link.assessment_id, &link.tenant, start_for_redemption)
            .await?;

        self.repo
            .insert_session(&RemoteSession {
                session_id,
                token_id: token_id.to_string(),
                assessment_id: link.assessment_id,
                tenant: link.tenant.clone(),
                created_at: now,
                expires_at: link.expires_at,
            })
            .await?;

        let scale = self.bound_scale(&assessment)?;

        Ok(AssessmentHandle {
            assessment_id: assessment.id,
            scale: scale.as_ref().clone(),
            responses: assessment.raw_values(),
            current_step: assessment.current_step,
            expires_at: link.expires_at,
            session_key,
        })
    }

    /// Record an answer through a remote session.
    pub async fn submit_remote_response(
        &self,
        session_key: &str,
        item_id: &str,
        value: u32,
    ) -> Result<Assessment, AssessmentError> {
        let session = self.open_session(session_key).await?;
        self.record_response(
            session.assessment_id,
            &session.tenant,
            AssessmentMode::Remote,
            item_id,
            value,
        )
        .await
    }

    /// Complete and score through a remote session.
    pub async fn complete_remote(&self, session_key: &str) -> Result<ScoringResult, AssessmentError> {
        let session = self.open_session(session_key).await?;
        self.finish(session.assessment_id, &session.tenant, Actor::RemotePatient)
            .await
    }

    /// Resolve a session key. Past the link deadline the session is dead and
    /// the assessment is expired on the spot.
    async fn open_session(&self, session_key: &str) -> Result<RemoteSession, AssessmentError> {
        if !token::is_well_formed(session_key) {
            return Err(AssessmentError::SessionNotFound);
        }
        let session = self
            .repo
            .load_session(&token::token_id(session_key))
            .await?
            .ok_or(AssessmentError::SessionNotFound)?;

        if self.clock.now() >= session.expires_at {
            match self.load_current(session.assessment_id, &session.tenant).await {
                Ok(_) | Err(AssessmentError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
            return Err(AssessmentError::LinkExpired);
        }
        Ok(session)
    }
}

/// What redeeming a link means for an assessment in `status`.
fn redemption_outcome(status: AssessmentStatus) -> Result<(), AssessmentError> {
    match status {
        AssessmentStatus::Created => Ok(()),
        AssessmentStatus::Expired => Err(AssessmentError::LinkExpired),
        AssessmentStatus::Abandoned => Err(AssessmentError::LinkNotFound),
        AssessmentStatus::InProgress | AssessmentStatus::Completed => {
            Err(AssessmentError::LinkAlreadyUsed)
        }
    }
}

fn start_for_redemption(assessment: &mut Assessment, now: Timestamp) -> Result<(), AssessmentError> {
    redemption_outcome(assessment.status)?;
    lifecycle::start(assessment, now)
}

fn check_issuable(assessment: &Assessment) -> Result<(), AssessmentError> {
    if assessment.mode != AssessmentMode::Remote {
        return Err(AssessmentError::ModeMismatch {
            expected: AssessmentMode::Remote,
        });
    }
    if assessment.remote_link_id.is_some() {
        return Err(AssessmentError::LinkAlreadyIssued);
    }
    if assessment.status != AssessmentStatus::Created {
        return Err(AssessmentError::NotActive {
            status: assessment.status,
        });
    }
    Ok(())
}
