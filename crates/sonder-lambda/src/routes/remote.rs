use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sonder_assessments::remote::{AssessmentHandle, IssuedLink};

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::middleware::auth::ClinicianContext;
use crate::routes::assessments::{Accepted, ResponseSubmission};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct IssueLinkRequest {
    #[serde(default)]
    pub ttl_days: Option<i64>,
}

pub async fn issue_link(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<IssueLinkRequest>,
) -> Result<(StatusCode, Json<IssuedLink>), ApiError> {
    let issued = state
        .service
        .issue_link(id, &ctx.tenant, &ctx.subject, request.ttl_days)
        .await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

/// Redeem a link token. 404 unknown, 410 expired, 409 already used.
pub async fn redeem(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<AssessmentHandle>, ApiError> {
    Ok(Json(state.service.redeem(&token).await?))
}

pub async fn submit_response(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(submission): Json<ResponseSubmission>,
) -> Result<Json<Accepted>, ApiError> {
    let assessment = state
        .service
        .submit_remote_response(&key, &submission.item_id, submission.value)
        .await?;
    Ok(Json(Accepted::from(&assessment)))
}

/// The patient gets an acknowledgement; results go to the clinician.
#[derive(Serialize)]
pub struct RemoteCompleted {
    completed: bool,
}

pub async fn complete(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RemoteCompleted>, ApiError> {
    state.service.complete_remote(&key).await?;
    Ok(Json(RemoteCompleted { completed: true }))
}
