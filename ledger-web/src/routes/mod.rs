//! HTTP route handlers.

pub mod accounts;
pub mod transfers;

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::HealthResponse;
use crate::state::AppState;

/// Health check endpoint.
pub async fn health(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_string() })
}
