//! Library surface for `ledger-web`'s binary: route handlers, app
//! state, and the router itself, split out so integration tests can
//! build the same `Router` the binary serves without going through
//! `main`.

pub mod api;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use state::AppState;

/// Build the application router for the given shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/accounts", post(routes::accounts::create_account))
        .route("/accounts/{id}", get(routes::accounts::get_account))
        .route("/accounts/{id}/transfers", get(routes::accounts::get_account_transfers))
        .route("/accounts/{id}/balances", get(routes::accounts::get_account_balances))
        .route("/transfers", post(routes::transfers::create_transfer))
        .route("/transfers/{id}", get(routes::transfers::get_transfer))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}
