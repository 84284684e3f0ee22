use std::collections::BTreeMap;
use std::sync::Arc;

use jiff::Timestamp;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sonder_audit::events::{Actor, AuditAction, AuditRecord};
use sonder_audit::trail::AuditTrail;
use sonder_core::models::assessment::{
    Assessment, AssessmentMode, AssessmentStatus, ClosureReason,
};
use sonder_core::models::scoring::ScoringResult;
use sonder_core::models::tenant::TenantRef;
use sonder_instruments::catalog::ScaleCatalog;
use sonder_instruments::scale::ScaleDefinition;
use sonder_storage::error::StorageError;
use sonder_storage::objects::ObjectStore;

use crate::clock::Clock;
use crate::collector;
use crate::config::EngineConfig;
use crate::directory::PatientDirectory;
use crate::error::AssessmentError;
use crate::lifecycle;
use crate::repo::Repository;

/// Request to dispatch a scale to a patient.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAssessment {
    pub patient_id: String,
    pub scale_id: String,
    pub mode: AssessmentMode,
}

/// Entry point for every assessment operation.
///
/// Holds no per-assessment state between calls. All coordination goes
/// through conditional writes on the backing store.
pub struct AssessmentService {
    pub(crate) repo: Repository,
    pub(crate) catalog: Arc<ScaleCatalog>,
    pub(crate) patients: Arc<dyn PatientDirectory>,
    pub(crate) audit: AuditTrail,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: EngineConfig,
}

impl AssessmentService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        catalog: Arc<ScaleCatalog>,
        patients: Arc<dyn PatientDirectory>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Result<Self, AssessmentError> {
        config.validate()?;
        Ok(Self {
            repo: Repository::new(store.clone()),
            catalog,
            patients,
            audit: AuditTrail::new(store),
            clock,
            config,
        })
    }

    pub fn catalog(&self) -> &ScaleCatalog {
        &self.catalog
    }

    pub fn audit_trail(&self) -> &AuditTrail {
        &self.audit
    }

    pub async fn create_assessment(
        &self,
        tenant: &TenantRef,
        administrator_id: &str,
        request: NewAssessment,
    ) -> Result<Assessment, AssessmentError> {
        let scale = self
            .catalog
            .get_scale(&request.scale_id)
            .map_err(|_| AssessmentError::ScaleNotFound(request.scale_id.clone()))?;

        if !self
            .patients
            .patient_in_tenant(&request.patient_id, tenant)
            .await?
        {
            return Err(AssessmentError::PatientNotFound(request.patient_id));
        }

        let now = self.clock.now();
        let assessment = Assessment {
            id: Uuid::new_v4(),
            scale_id: scale.id.clone(),
            scale_version: scale.version.clone(),
            patient_id: request.patient_id,
            administrator_id: administrator_id.to_string(),
            tenant: tenant.clone(),
            mode: request.mode,
            status: AssessmentStatus::Created,
            responses: BTreeMap::new(),
            current_step: 0,
            scoring_results: None,
            remote_link_id: None,
            remote_deadline: None,
            created_at: now,
            started_at: None,
            completed_at: None,
            last_activity_at: now,
            closed_at: None,
            closure_reason: None,
        };
        self.repo.insert_assessment(&assessment).await?;

        info!(
            assessment_id = %assessment.id,
            scale_id = %assessment.scale_id,
            mode = ?assessment.mode,
            "assessment created"
        );
        self.audit
            .record(
                AuditRecord::new(
                    AuditAction::AssessmentCreated,
                    Actor::Clinician(administrator_id.to_string()),
                    now,
                )
                .assessment(assessment.id)
                .tenant(tenant)
                .with_details(json!({ "scale_id": assessment.scale_id, "mode": assessment.mode })),
            )
            .await?;

        Ok(assessment)
    }

    pub async fn get_assessment(
        &self,
        id: Uuid,
        tenant: &TenantRef,
    ) -> Result<Assessment, AssessmentError> {
        let (assessment, _) = self.load_current(id, tenant).await?;
        Ok(assessment)
    }

    /// Every assessment of `patient_id` within `tenant`, oldest first.
    pub async fn list_for_patient(
        &self,
        patient_id: &str,
        tenant: &TenantRef,
    ) -> Result<Vec<Assessment>, AssessmentError> {
        let mut assessments = Vec::new();
        for key in self.repo.assessment_keys().await? {
            let (stored, _) = self.repo.load_assessment_at(&key).await?;
            if stored.patient_id != patient_id || &stored.tenant != tenant {
                continue;
            }
            let (current, _) = self.load_current(stored.id, tenant).await?;
            assessments.push(current);
        }
        assessments.sort_by_key(|a| a.created_at);
        Ok(assessments)
    }

    /// Record a clinician-entered answer on an in-person assessment.
    pub async fn submit_response(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        item_id: &str,
        value: u32,
    ) -> Result<Assessment, AssessmentError> {
        self.record_response(id, tenant, AssessmentMode::InPerson, item_id, value)
            .await
    }

    pub async fn set_step(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        step: u32,
    ) -> Result<Assessment, AssessmentError> {
        let (assessment, ()) = self
            .mutate(id, tenant, |a, now| {
                let scale = self.bound_scale(a)?;
                collector::set_step(a, &scale, step, now)
            })
            .await?;
        Ok(assessment)
    }

    pub async fn complete(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        actor: &str,
    ) -> Result<ScoringResult, AssessmentError> {
        self.finish(id, tenant, Actor::Clinician(actor.to_string()))
            .await
    }

    /// Administrator closes the assessment without a score.
    pub async fn abandon(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        actor: &str,
    ) -> Result<Assessment, AssessmentError> {
        let (assessment, ()) = self
            .mutate(id, tenant, |a, now| {
                lifecycle::abandon(a, ClosureReason::Administrator, now).map_err(|e| match e {
                    AssessmentError::InvalidTransition { from, .. } => {
                        AssessmentError::NotActive { status: from }
                    }
                    other => other,
                })
            })
            .await?;

        info!(assessment_id = %id, "assessment abandoned by administrator");
        self.audit_transition(&assessment, Actor::Clinician(actor.to_string()), self.clock.now())
            .await?;
        Ok(assessment)
    }

    /// Apply deadline checks to every stored assessment as of `now`.
    ///
    /// For a scheduled job; every read path enforces the same deadlines on
    /// its own. Returns how many assessments were closed.
    pub async fn sweep_stale(&self, now: Timestamp) -> Result<usize, AssessmentError> {
        let mut closed = 0;
        for key in self.repo.assessment_keys().await? {
            let (mut assessment, etag) = self.repo.load_assessment_at(&key).await?;
            if lifecycle::enforce_deadlines(&mut assessment, now, self.config.inactivity_threshold)
                .is_none()
            {
                continue;
            }
            match self.repo.replace_assessment(&assessment, &etag).await {
                Ok(_) => {
                    self.audit_transition(&assessment, Actor::System, now).await?;
                    closed += 1;
                }
                Err(StorageError::PreconditionFailed { .. }) => {
                    debug!(assessment_id = %assessment.id, "sweep lost write race, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }
        info!(closed, "stale assessment sweep finished");
        Ok(closed)
    }

    pub(crate) async fn record_response(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        mode: AssessmentMode,
        item_id: &str,
        value: u32,
    ) -> Result<Assessment, AssessmentError> {
        let (assessment, ()) = self
            .mutate(id, tenant, |a, now| {
                if a.mode != mode {
                    return Err(AssessmentError::ModeMismatch { expected: mode });
                }
                let scale = self.bound_scale(a)?;
                collector::apply_response(a, &scale, item_id, value, now)
            })
            .await?;
        debug!(assessment_id = %id, item_id, "response recorded");
        Ok(assessment)
    }

    pub(crate) async fn finish(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        actor: Actor,
    ) -> Result<ScoringResult, AssessmentError> {
        let (assessment, result) = self
            .mutate(id, tenant, |a, now| {
                let scale = self.bound_scale(a)?;
                lifecycle::complete(a, &scale, now)
            })
            .await?;

        info!(
            assessment_id = %id,
            scale_id = %assessment.scale_id,
            critical_flag = result.critical_flag,
            "assessment completed"
        );
        if result.critical_flag {
            warn!(
                assessment_id = %id,
                critical_items = ?result.critical_items,
                "critical item endorsed"
            );
        }
        self.audit_transition(&assessment, actor, self.clock.now())
            .await?;
        Ok(result)
    }

    pub(crate) fn bound_scale(
        &self,
        assessment: &Assessment,
    ) -> Result<Arc<ScaleDefinition>, AssessmentError> {
        self.catalog
            .bound_scale(&assessment.scale_id)
            .map_err(|_| AssessmentError::ScaleNotFound(assessment.scale_id.clone()))
    }

    /// Load an assessment for `tenant`, applying and persisting any deadline
    /// that has passed. A tenant mismatch reads as a missing assessment.
    pub(crate) async fn load_current(
        &self,
        id: Uuid,
        tenant: &TenantRef,
    ) -> Result<(Assessment, String), AssessmentError> {
        for _ in 0..self.config.max_write_attempts {
            let Some((mut assessment, etag)) = self.repo.load_assessment(id).await? else {
                return Err(AssessmentError::NotFound(id));
            };
            if &assessment.tenant != tenant {
                return Err(AssessmentError::NotFound(id));
            }

            let now = self.clock.now();
            if lifecycle::enforce_deadlines(&mut assessment, now, self.config.inactivity_threshold)
                .is_none()
            {
                return Ok((assessment, etag));
            }

            match self.repo.replace_assessment(&assessment, &etag).await {
                Ok(etag) => {
                    info!(
                        assessment_id = %id,
                        status = assessment.status.as_str(),
                        "deadline passed, assessment closed"
                    );
                    self.audit_transition(&assessment, Actor::System, now).await?;
                    return Ok((assessment, etag));
                }
                Err(StorageError::PreconditionFailed { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        warn!(assessment_id = %id, "write contention while enforcing deadlines");
        Err(AssessmentError::WriteContention { assessment_id: id })
    }

    /// Read-modify-write with `If-Match`, re-applying `apply` on fresh state
    /// after a lost race. A loser whose intent the winner already fulfilled
    /// sees that through `apply` itself (e.g. `AlreadyCompleted`).
    pub(crate) async fn mutate<F, R>(
        &self,
        id: Uuid,
        tenant: &TenantRef,
        mut apply: F,
    ) -> Result<(Assessment, R), AssessmentError>
    where
        F: FnMut(&mut Assessment, Timestamp) -> Result<R, AssessmentError>,
    {
        for attempt in 1..=self.config.max_write_attempts {
            let (mut assessment, etag) = self.load_current(id, tenant).await?;
            let outcome = apply(&mut assessment, self.clock.now())?;

            match self.repo.replace_assessment(&assessment, &etag).await {
                Ok(_) => return Ok((assessment, outcome)),
                Err(StorageError::PreconditionFailed { .. }) => {
                    debug!(assessment_id = %id, attempt, "lost write race, re-reading");
                }
                Err(e) => return Err(e.into()),
            }
        }
        warn!(assessment_id = %id, "giving up after repeated write conflicts");
        Err(AssessmentError::WriteContention { assessment_id: id })
    }

    /// Audit the terminal state `assessment` just reached.
    pub(crate) async fn audit_transition(
        &self,
        assessment: &Assessment,
        actor: Actor,
        at: Timestamp,
    ) -> Result<(), AssessmentError> {
        let (action, details) = match assessment.status {
            AssessmentStatus::Completed => (
                AuditAction::AssessmentCompleted,
                json!({
                    "scale_id": assessment.scale_id,
                    "critical_flag": assessment
                        .scoring_results
                        .as_ref()
                        .is_some_and(|r| r.critical_flag),
                }),
            ),
            AssessmentStatus::Expired => (
                AuditAction::AssessmentExpired,
                json!({ "reason": assessment.closure_reason }),
            ),
            AssessmentStatus::Abandoned => (
                AuditAction::AssessmentAbandoned,
                json!({ "reason": assessment.closure_reason }),
            ),
            AssessmentStatus::Created | AssessmentStatus::InProgress => return Ok(()),
        };

        let mut record = AuditRecord::new(action, actor, at)
            .assessment(assessment.id)
            .tenant(&assessment.tenant)
            .with_details(details);
        if let Some(token_id) = &assessment.remote_link_id {
            record = record.token(token_id.clone());
        }
        self.audit.record(record).await?;
        Ok(())
    }
}
