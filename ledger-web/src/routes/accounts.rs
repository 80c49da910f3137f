//! Account route handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use ledger_core::{AccountFilter, AccountFilterFlags};

use crate::api::{ApiAccount, ApiAccountBalance, ApiTransfer, BalancesResponse, CreateAccountRequest, CreateResultResponse, TransfersResponse};
use crate::error::AppError;
use crate::state::AppState;

fn default_limit() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

/// Create an account.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<CreateResultResponse>, AppError> {
    let account = req.try_into().map_err(AppError::BadRequest)?;
    let mut store = state.store.lock().await;
    let result = ledger_core::create_account(&mut *store, account);
    Ok(Json(result.into()))
}

/// Get a single account by ID.
pub async fn get_account(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<ApiAccount>, AppError> {
    let account_id = parse_id(&id)?;
    let store = state.store.lock().await;
    let account = ledger_core::lookup_account(&*store, account_id).ok_or_else(|| AppError::NotFound(format!("account {} not found", id)))?;
    Ok(Json(ApiAccount::from(&account)))
}

/// Query parameters for account transfers.
#[derive(Debug, Deserialize)]
pub struct AccountTransfersParams {
    /// Include transfers where the account is the debit side.
    #[serde(default = "default_true")]
    pub debits: bool,
    /// Include transfers where the account is the credit side.
    #[serde(default = "default_true")]
    pub credits: bool,
    /// Return in reverse chronological order.
    #[serde(default)]
    pub reversed: bool,
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Get transfers for an account.
pub async fn get_account_transfers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<AccountTransfersParams>,
) -> Result<Json<TransfersResponse>, AppError> {
    let account_id = parse_id(&id)?;

    let mut flags = AccountFilterFlags::empty();
    if params.debits {
        flags |= AccountFilterFlags::DEBITS;
    }
    if params.credits {
        flags |= AccountFilterFlags::CREDITS;
    }
    if params.reversed {
        flags |= AccountFilterFlags::REVERSED;
    }

    let filter = AccountFilter {
        account_id,
        limit: params.limit,
        flags,
        ..Default::default()
    };

    let store = state.store.lock().await;
    let transfers = ledger_core::get_account_transfers(&*store, &filter);
    let api_transfers: Vec<ApiTransfer> = transfers.iter().map(ApiTransfer::from).collect();

    Ok(Json(TransfersResponse { transfers: api_transfers }))
}

/// Query parameters for account balances.
#[derive(Debug, Deserialize)]
pub struct AccountBalancesParams {
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Return in reverse chronological order.
    #[serde(default)]
    pub reversed: bool,
}

/// Get balance history for an account.
pub async fn get_account_balances(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<AccountBalancesParams>,
) -> Result<Json<BalancesResponse>, AppError> {
    let account_id = parse_id(&id)?;

    let mut flags = AccountFilterFlags::empty();
    if params.reversed {
        flags |= AccountFilterFlags::REVERSED;
    }

    let filter = AccountFilter {
        account_id,
        limit: params.limit,
        flags,
        ..Default::default()
    };

    let store = state.store.lock().await;
    let balances = ledger_core::get_account_balances(&*store, &filter);
    let api_balances: Vec<ApiAccountBalance> = balances.iter().map(ApiAccountBalance::from).collect();

    Ok(Json(BalancesResponse { balances: api_balances }))
}

/// Parse a hex ID string to u128.
fn parse_id(id: &str) -> Result<u128, AppError> {
    u128::from_str_radix(id, 16).map_err(|_| AppError::BadRequest(format!("invalid id: {}", id)))
}
