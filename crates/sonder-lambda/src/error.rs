use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sonder_assessments::error::AssessmentError;
use sonder_core::models::assessment::AssessmentStatus;

/// Unified API error type for all route handlers.
///
/// `reason` is a stable code UIs switch on; `error` is for humans.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest { reason: &'static str, message: String },
    Unauthorized(String),
    Conflict { reason: &'static str, message: String },
    Gone { reason: &'static str, message: String },
    /// Corrupt scale definition. Names the scale, never the detail.
    Definition { scale_id: String, detail: String },
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, reason) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Some("not_found".to_string())),
            ApiError::BadRequest { reason, message } => {
                (StatusCode::BAD_REQUEST, message, Some(reason.to_string()))
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Conflict { reason, message } => {
                (StatusCode::CONFLICT, message, Some(reason.to_string()))
            }
            ApiError::Gone { reason, message } => {
                (StatusCode::GONE, message, Some(reason.to_string()))
            }
            ApiError::Definition { scale_id, detail } => {
                tracing::error!(scale_id = %scale_id, "scale definition error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("scale definition error in {scale_id}"),
                    Some(format!("scale_definition:{scale_id}")),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string(), None)
            }
        };

        (status, Json(ErrorBody { error: message, reason })).into_response()
    }
}

impl From<AssessmentError> for ApiError {
    fn from(e: AssessmentError) -> Self {
        let message = e.to_string();
        match e {
            AssessmentError::NotFound(_)
            | AssessmentError::ScaleNotFound(_)
            | AssessmentError::PatientNotFound(_)
            | AssessmentError::LinkNotFound
            | AssessmentError::SessionNotFound => ApiError::NotFound(message),

            AssessmentError::TenantUnresolved { .. } => ApiError::Unauthorized(message),

            AssessmentError::InvalidItem { .. } => ApiError::BadRequest {
                reason: "invalid_item",
                message,
            },
            AssessmentError::InvalidValue { .. } => ApiError::BadRequest {
                reason: "invalid_value",
                message,
            },
            AssessmentError::InvalidStep { .. } => ApiError::BadRequest {
                reason: "invalid_step",
                message,
            },
            AssessmentError::InvalidTtl { .. } => ApiError::BadRequest {
                reason: "invalid_ttl",
                message,
            },

            AssessmentError::NotActive {
                status: AssessmentStatus::Expired,
            } => ApiError::Gone {
                reason: "expired",
                message,
            },
            AssessmentError::NotActive { .. } => ApiError::Conflict {
                reason: "assessment_not_active",
                message,
            },
            AssessmentError::Incomplete { .. } => ApiError::Conflict {
                reason: "incomplete",
                message,
            },
            AssessmentError::AlreadyCompleted => ApiError::Conflict {
                reason: "already_completed",
                message,
            },
            AssessmentError::ModeMismatch { .. } => ApiError::Conflict {
                reason: "mode_mismatch",
                message,
            },
            AssessmentError::LinkAlreadyIssued => ApiError::Conflict {
                reason: "link_already_issued",
                message,
            },
            AssessmentError::LinkAlreadyUsed => ApiError::Conflict {
                reason: "already_used",
                message,
            },
            AssessmentError::InvalidTransition { .. } => ApiError::Conflict {
                reason: "invalid_transition",
                message,
            },
            AssessmentError::LinkExpired => ApiError::Gone {
                reason: "expired",
                message,
            },

            AssessmentError::ScaleDefinition { scale_id, source } => ApiError::Definition {
                scale_id,
                detail: source.to_string(),
            },

            AssessmentError::WriteContention { .. }
            | AssessmentError::Config(_)
            | AssessmentError::Storage(_)
            | AssessmentError::Audit(_) => ApiError::Internal(message),
        }
    }
}
