use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use sonder_assessments::directory::Caller;
use sonder_core::models::tenant::{TenantKind, TenantRef};

use crate::error::ApiError;
use crate::state::AppState;

/// Clinician authentication middleware.
///
/// Extracts the `Authorization: Bearer <sub>` header and the tenant claim
/// headers, resolves the tenant through the configured `TenantResolver`,
/// and inserts `ClinicianContext` into request extensions for handlers.
///
/// Credential verification happens upstream at the API gateway authorizer.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = caller_from_headers(req.headers())?;
    let tenant = state.tenants.resolve(&caller).await?;

    req.extensions_mut().insert(ClinicianContext {
        subject: caller.subject,
        tenant,
    });

    Ok(next.run(req).await)
}

fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, ApiError> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let subject = header("authorization")
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer credential".to_string()))?;

    let claimed_tenant = match (header("x-tenant-kind"), header("x-tenant-id")) {
        (Some(kind), Some(id)) => {
            let kind: TenantKind = kind
                .parse()
                .map_err(|e: sonder_core::error::CoreError| ApiError::Unauthorized(e.to_string()))?;
            Some(
                TenantRef::new(kind, id.trim())
                    .map_err(|e| ApiError::Unauthorized(e.to_string()))?,
            )
        }
        _ => None,
    };

    Ok(Caller {
        subject: subject.to_string(),
        claimed_tenant,
    })
}

/// Authenticated clinician and the tenant their request acts within.
#[derive(Clone, Debug)]
pub struct ClinicianContext {
    pub subject: String,
    pub tenant: TenantRef,
}
