use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Whether a tenant is a multi-clinician clinic or a solo practitioner's
/// workspace. Resolved upstream; the engine only stores and compares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TenantKind {
    Clinic,
    Workspace,
}

impl TenantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantKind::Clinic => "clinic",
            TenantKind::Workspace => "workspace",
        }
    }
}

impl FromStr for TenantKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clinic" => Ok(TenantKind::Clinic),
            "workspace" => Ok(TenantKind::Workspace),
            other => Err(CoreError::InvalidTenantKind(other.to_string())),
        }
    }
}

/// Opaque tenant identity attached to every assessment.
///
/// Used purely as a filter predicate on lookups. Tenant authorization
/// happens before a `TenantRef` ever reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TenantRef {
    pub kind: TenantKind,
    pub id: String,
}

impl TenantRef {
    pub fn new(kind: TenantKind, id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::MissingField("tenant id".to_string()));
        }
        Ok(Self { kind, id })
    }

    pub fn clinic(id: impl Into<String>) -> Result<Self, CoreError> {
        Self::new(TenantKind::Clinic, id)
    }

    pub fn workspace(id: impl Into<String>) -> Result<Self, CoreError> {
        Self::new(TenantKind::Workspace, id)
    }
}

impl fmt::Display for TenantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}
