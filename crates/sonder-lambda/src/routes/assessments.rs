use axum::Extension;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sonder_assessments::service::NewAssessment;
use sonder_core::models::assessment::{Assessment, AssessmentStatus};
use sonder_core::models::scoring::ScoringResult;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::middleware::auth::ClinicianContext;
use crate::state::AppState;

#[derive(Serialize)]
pub struct Created {
    assessment_id: Uuid,
    status: AssessmentStatus,
}

pub async fn create_assessment(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Json(request): Json<NewAssessment>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let assessment = state
        .service
        .create_assessment(&ctx.tenant, &ctx.subject, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Created {
            assessment_id: assessment.id,
            status: assessment.status,
        }),
    ))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(state.service.get_assessment(id, &ctx.tenant).await?))
}

pub async fn list_for_patient(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Path(patient_id): Path<String>,
) -> Result<Json<Vec<Assessment>>, ApiError> {
    Ok(Json(
        state
            .service
            .list_for_patient(&patient_id, &ctx.tenant)
            .await?,
    ))
}

#[derive(Deserialize)]
pub struct ResponseSubmission {
    pub item_id: String,
    pub value: u32,
}

#[derive(Serialize)]
pub struct Accepted {
    accepted: bool,
    status: AssessmentStatus,
    answered_items: usize,
}

impl From<&Assessment> for Accepted {
    fn from(assessment: &Assessment) -> Self {
        Self {
            accepted: true,
            status: assessment.status,
            answered_items: assessment.responses.len(),
        }
    }
}

pub async fn submit_response(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Path(id): Path<Uuid>,
    Json(submission): Json<ResponseSubmission>,
) -> Result<Json<Accepted>, ApiError> {
    let assessment = state
        .service
        .submit_response(id, &ctx.tenant, &submission.item_id, submission.value)
        .await?;
    Ok(Json(Accepted::from(&assessment)))
}

#[derive(Deserialize)]
pub struct StepUpdate {
    pub current_step: u32,
}

pub async fn set_step(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Path(id): Path<Uuid>,
    Json(update): Json<StepUpdate>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(
        state
            .service
            .set_step(id, &ctx.tenant, update.current_step)
            .await?,
    ))
}

#[derive(Serialize)]
pub struct Completed {
    pub scoring_results: ScoringResult,
}

pub async fn complete_assessment(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Completed>, ApiError> {
    let scoring_results = state
        .service
        .complete(id, &ctx.tenant, &ctx.subject)
        .await?;
    Ok(Json(Completed { scoring_results }))
}

pub async fn abandon_assessment(
    State(state): State<AppState>,
    Extension(ctx): Extension<ClinicianContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Assessment>, ApiError> {
    Ok(Json(
        state.service.abandon(id, &ctx.tenant, &ctx.subject).await?,
    ))
}
