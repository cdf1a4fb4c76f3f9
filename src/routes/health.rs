use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::AppState;
use crate::models::responses::{HealthResponse, ServiceHealth, StatusResponse};

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Liveness probe")),
    tag = "Health"
)]
pub async fn root() -> &'static str {
    "ConsultAI API is running"
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, body = HealthResponse, description = "Service health check")),
    tag = "Health"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();
    services.insert(
        "generation".to_string(),
        ServiceHealth {
            status: state.generation.state().to_string(),
            error: state.generation.init_error(),
        },
    );

    // A failed or not-yet-initialized generation backend still leaves the
    // service healthy: chat degrades to canned replies.
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().naive_utc(),
        services,
    })
}

#[utoipa::path(
    get,
    path = "/status",
    responses((status = 200, body = StatusResponse, description = "Detailed service status")),
    tag = "Health"
)]
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        generation_backend: state.settings.generation_backend.clone(),
        timestamp: Utc::now().naive_utc(),
    })
}
