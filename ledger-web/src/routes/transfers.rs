//! Transfer route handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::api::{ApiTransfer, CreateResultResponse, CreateTransferRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Create a transfer.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTransferRequest>,
) -> Result<Json<CreateResultResponse>, AppError> {
    let transfer = req.try_into().map_err(AppError::BadRequest)?;
    let mut store = state.store.lock().await;
    let result = ledger_core::create_transfer(&mut *store, transfer);
    Ok(Json(result.into()))
}

/// Get a single transfer by ID.
pub async fn get_transfer(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<ApiTransfer>, AppError> {
    let transfer_id = parse_id(&id)?;
    let store = state.store.lock().await;
    let transfer = ledger_core::lookup_transfer(&*store, transfer_id).ok_or_else(|| AppError::NotFound(format!("transfer {} not found", id)))?;
    Ok(Json(ApiTransfer::from(&transfer)))
}

/// Parse a hex ID string to u128.
fn parse_id(id: &str) -> Result<u128, AppError> {
    u128::from_str_radix(id, 16).map_err(|_| AppError::BadRequest(format!("invalid id: {}", id)))
}
