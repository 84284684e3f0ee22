//! Object key conventions.
//!
//! Pure string functions. These define the canonical layout of objects in
//! the Sonder bucket (or any other `ObjectStore`).

use uuid::Uuid;

use crate::models::tenant::TenantRef;

pub const ASSESSMENTS_PREFIX: &str = "assessments/";

pub fn assessment(id: Uuid) -> String {
    format!("{ASSESSMENTS_PREFIX}{id}.json")
}

pub const REMOTE_LINKS_PREFIX: &str = "remote-links/";

/// Links are keyed by token id, never by the raw token.
pub fn remote_link(token_id: &str) -> String {
    format!("{REMOTE_LINKS_PREFIX}{token_id}.json")
}

pub fn remote_session(session_id: &str) -> String {
    format!("remote-sessions/{session_id}.json")
}

pub const PATIENTS_PREFIX: &str = "patients/";

/// Roster entry for a patient within one tenant.
pub fn patient(tenant: &TenantRef, patient_id: &str) -> String {
    format!(
        "{PATIENTS_PREFIX}{}/{}/{patient_id}.json",
        tenant.kind.as_str(),
        tenant.id
    )
}

pub const AUDIT_PREFIX: &str = "audit/";

/// Audit records are grouped by UTC day and sort chronologically within it.
pub fn audit_record(at: jiff::Timestamp, id: Uuid) -> String {
    format!(
        "{AUDIT_PREFIX}{}/{:020}-{id}.json",
        at.strftime("%Y-%m-%d"),
        at.as_millisecond()
    )
}
