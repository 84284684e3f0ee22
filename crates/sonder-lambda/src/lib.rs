//! HTTP surface of the assessment engine.
//!
//! The router is built here so tests can drive it without the Lambda
//! runtime; `main.rs` only wires configuration and storage.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clinician routes: bearer credential plus tenant claim.
    let protected = Router::new()
        .route("/assessments", post(routes::assessments::create_assessment))
        .route("/assessments/{id}", get(routes::assessments::get_assessment))
        .route(
            "/assessments/{id}/responses",
            post(routes::assessments::submit_response),
        )
        .route("/assessments/{id}/step", put(routes::assessments::set_step))
        .route(
            "/assessments/{id}/complete",
            post(routes::assessments::complete_assessment),
        )
        .route(
            "/assessments/{id}/abandon",
            post(routes::assessments::abandon_assessment),
        )
        .route(
            "/assessments/{id}/remote-link",
            post(routes::remote::issue_link),
        )
        .route(
            "/patients/{patient_id}/assessments",
            get(routes::assessments::list_for_patient),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Public routes. Remote routes carry their own capability token.
    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/scales", get(routes::scales::list_scales))
        .route("/scales/{id}", get(routes::scales::get_scale))
        .route("/remote/{token}", get(routes::remote::redeem))
        .route(
            "/remote/sessions/{key}/responses",
            post(routes::remote::submit_response),
        )
        .route(
            "/remote/sessions/{key}/complete",
            post(routes::remote::complete),
        );

    Router::new()
        .merge(protected)
        .merge(public)
        .route_layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
