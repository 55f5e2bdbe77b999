//! Transaction endpoints: checkout, listing, detail, status override.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use brioche_core::checkout::CheckoutCommand;
use brioche_core::validation::validate_uuid;
use brioche_core::{Transaction, TransactionStatus, TransactionWithItems};
use brioche_db::{Page, TransactionFilter};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::AppState;

/// `POST /api/transactions` - runs the checkout atomically.
///
/// Returns 201 with the created transaction and its item snapshots, or
/// 409 when any line can't be covered by stock.
pub async fn create(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(command): Json<CheckoutCommand>,
) -> Result<(StatusCode, Json<TransactionWithItems>), ApiError> {
    let result = state
        .db
        .checkout()
        .create_transaction(&principal.store_id, &principal.user_id, &command)
        .await?;

    info!(
        transaction_number = %result.transaction.transaction_number,
        total_cents = result.transaction.total_cents,
        "Checkout completed"
    );

    Ok((StatusCode::CREATED, Json(result)))
}

/// `GET /api/transactions` - paginated listing, newest first.
pub async fn list(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Page<Transaction>>, ApiError> {
    let page = state.db.checkout().list(&principal.store_id, &filter).await?;
    Ok(Json(page))
}

/// `GET /api/transactions/:id` - detail with item snapshots.
pub async fn get(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
) -> Result<Json<TransactionWithItems>, ApiError> {
    validate_uuid(&id)?;

    let result = state
        .db
        .checkout()
        .get_by_id(&principal.store_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Transaction not found: {}", id)))?;

    Ok(Json(result))
}

/// Body for the status override.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: TransactionStatus,
}

/// `PUT /api/transactions/:id/status` - role-gated status override.
///
/// Admins and managers only; cashiers get 403.
pub async fn update_status(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Transaction>, ApiError> {
    validate_uuid(&id)?;

    if !principal.role.can_override_status() {
        return Err(ApiError::Forbidden(format!(
            "Role {} may not override transaction status",
            principal.role.as_str()
        )));
    }

    let transaction = state
        .db
        .checkout()
        .update_status(&principal.store_id, &id, body.status)
        .await?;

    Ok(Json(transaction))
}
