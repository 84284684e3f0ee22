use axum::extract::State;

use sonder_instruments::catalog::ScaleSummary;
use sonder_instruments::scale::ScaleDefinition;

use crate::error::ApiError;
use crate::extract::{Json, Path};
use crate::state::AppState;

pub async fn list_scales(State(state): State<AppState>) -> Json<Vec<ScaleSummary>> {
    Json(state.service.catalog().list_active())
}

/// Full definition of an active scale. Unknown and retired ids both 404.
pub async fn get_scale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScaleDefinition>, ApiError> {
    let scale = state
        .service
        .catalog()
        .get_scale(&id)
        .map_err(|_| ApiError::NotFound(format!("scale not found: {id}")))?;
    Ok(Json(scale.as_ref().clone()))
}
