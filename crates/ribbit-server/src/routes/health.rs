//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub email_configured: bool,
    pub store: String,
    pub version: String,
}

/// Health check endpoint.
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let email_configured = state.scheduler().credentials().await.any();

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        email_configured,
        store: state.store().backend_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
