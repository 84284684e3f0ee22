use std::sync::Arc;

use sonder_assessments::directory::TenantResolver;
use sonder_assessments::service::AssessmentService;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AssessmentService>,
    pub tenants: Arc<dyn TenantResolver>,
}
