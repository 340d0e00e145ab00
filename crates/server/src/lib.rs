//! Stocklist server library.
//!
//! The application is exposed as a library so integration tests can drive
//! the full router in-process; the `stocklist-server` binary in `main.rs`
//! is a thin bootstrap around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_sessions_sqlx_store::SqliteStore;

use crate::state::AppState;

/// Build the application router over the given state.
///
/// Creates the session store (running its own table migration), wires the
/// session layer, and mounts all routes plus the health endpoints. Callers
/// add process-level layers (tracing, Sentry, static files) on top.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session store migration fails.
pub async fn app(state: AppState) -> Result<Router, sqlx::Error> {
    let store = SqliteStore::new(state.pool().clone());
    store.migrate().await?;

    let session_layer = middleware::create_session_layer(store, state.config());

    Ok(Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .with_state(state))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
