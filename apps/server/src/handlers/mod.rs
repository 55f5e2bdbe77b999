//! HTTP request handlers.
//!
//! Handlers stay thin: extract the principal, parse the request, call the
//! repository, map the result. Anything resembling business logic belongs
//! in brioche-core or brioche-db.

pub mod dashboard;
pub mod payments;
pub mod products;
pub mod transactions;

use axum::{extract::State, http::StatusCode};

use brioche_db::migrations::migration_status;

use crate::AppState;

/// Liveness probe: database reachable and schema fully migrated. No auth.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if !state.db.health_check().await {
        return (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED");
    }

    match migration_status(state.db.pool()).await {
        Ok((total, applied)) if applied >= total => (StatusCode::OK, "OK"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "DEGRADED"),
    }
}
