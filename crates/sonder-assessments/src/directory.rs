//! Collaborators the engine consumes but does not implement.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sonder_core::models::tenant::TenantRef;
use sonder_core::s3_keys;
use sonder_storage::error::StorageError;
use sonder_storage::objects::{BoxFuture, ObjectStore};
use sonder_storage::state;

use crate::error::AssessmentError;

/// An authenticated caller as seen after the upstream authorizer.
#[derive(Debug, Clone)]
pub struct Caller {
    pub subject: String,
    /// Tenant asserted alongside the credential, if any.
    pub claimed_tenant: Option<TenantRef>,
}

/// Maps an authenticated caller to the tenant its requests act within.
pub trait TenantResolver: Send + Sync {
    fn resolve<'a>(&'a self, caller: &'a Caller) -> BoxFuture<'a, Result<TenantRef, AssessmentError>>;
}

/// Confirms that a patient exists and belongs to a tenant.
pub trait PatientDirectory: Send + Sync {
    fn patient_in_tenant<'a>(
        &'a self,
        patient_id: &'a str,
        tenant: &'a TenantRef,
    ) -> BoxFuture<'a, Result<bool, AssessmentError>>;
}

/// Trusts the tenant claim the upstream authorizer attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimedTenantResolver;

impl TenantResolver for ClaimedTenantResolver {
    fn resolve<'a>(&'a self, caller: &'a Caller) -> BoxFuture<'a, Result<TenantRef, AssessmentError>> {
        Box::pin(async move {
            caller
                .claimed_tenant
                .clone()
                .ok_or_else(|| AssessmentError::TenantUnresolved {
                    subject: caller.subject.clone(),
                })
        })
    }
}

/// In-memory patient roster.
#[derive(Debug, Default, Clone)]
pub struct StaticPatientDirectory {
    members: HashSet<(TenantRef, String)>,
    open: bool,
}

impl StaticPatientDirectory {
    pub fn new(members: impl IntoIterator<Item = (TenantRef, String)>) -> Self {
        Self {
            members: members.into_iter().collect(),
            open: false,
        }
    }

    /// Accepts every patient in every tenant. Development only.
    pub fn open() -> Self {
        Self {
            members: HashSet::new(),
            open: true,
        }
    }

    pub fn with_patient(mut self, tenant: TenantRef, patient_id: impl Into<String>) -> Self {
        self.members.insert((tenant, patient_id.into()));
        self
    }
}

impl PatientDirectory for StaticPatientDirectory {
    fn patient_in_tenant<'a>(
        &'a self,
        patient_id: &'a str,
        tenant: &'a TenantRef,
    ) -> BoxFuture<'a, Result<bool, AssessmentError>> {
        Box::pin(async move {
            Ok(self.open
                || self
                    .members
                    .contains(&(tenant.clone(), patient_id.to_string())))
        })
    }
}

/// One patient's membership in one tenant, as kept in the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub patient_id: String,
    pub tenant: TenantRef,
}

/// Patient roster kept in the object store under `patients/`.
///
/// Populated by the practice-management sync; the engine only reads it.
pub struct StoredPatientDirectory {
    store: Arc<dyn ObjectStore>,
}

impl StoredPatientDirectory {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Add a patient to a tenant's roster. Existing entries are left alone.
    pub async fn enroll(&self, tenant: &TenantRef, patient_id: &str) -> Result<(), AssessmentError> {
        if !is_roster_id(patient_id) {
            return Err(AssessmentError::PatientNotFound(patient_id.to_string()));
        }
        let entry = RosterEntry {
            patient_id: patient_id.to_string(),
            tenant: tenant.clone(),
        };
        match state::create_state(self.store.as_ref(), &s3_keys::patient(tenant, patient_id), &entry)
            .await
        {
            Ok(_) | Err(StorageError::PreconditionFailed { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PatientDirectory for StoredPatientDirectory {
    fn patient_in_tenant<'a>(
        &'a self,
        patient_id: &'a str,
        tenant: &'a TenantRef,
    ) -> BoxFuture<'a, Result<bool, AssessmentError>> {
        Box::pin(async move {
            if !is_roster_id(patient_id) {
                return Ok(false);
            }
            let key = s3_keys::patient(tenant, patient_id);
            match state::load_state::<RosterEntry>(self.store.as_ref(), &key).await {
                Ok((entry, _)) => Ok(entry.patient_id == patient_id && &entry.tenant == tenant),
                Err(StorageError::NotFound { .. }) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// Patient ids become one key segment.
fn is_roster_id(patient_id: &str) -> bool {
    !patient_id.is_empty()
        && patient_id != "."
        && patient_id != ".."
        && !patient_id.contains(['/', '\\'])
}
