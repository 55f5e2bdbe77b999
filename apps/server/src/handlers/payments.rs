//! Payment gateway endpoints: session creation and the webhook.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{error, info, warn};

use brioche_core::validation::validate_uuid;
use brioche_gateway::{PaymentNotification, SessionRequest, SessionResponse};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::AppState;

/// Body for session creation.
#[derive(Debug, Deserialize)]
pub struct SessionBody {
    pub transaction_id: String,
}

/// `POST /api/payments/session` - creates a hosted-checkout session for a
/// pending digital transaction. Provider failures surface as 502.
pub async fn create_session(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(body): Json<SessionBody>,
) -> Result<Json<SessionResponse>, ApiError> {
    validate_uuid(&body.transaction_id)?;

    let txn = state
        .db
        .checkout()
        .get_by_id(&principal.store_id, &body.transaction_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Transaction not found: {}", body.transaction_id))
        })?
        .transaction;

    let request = SessionRequest {
        // The provider echoes order_id back in the webhook; using the
        // transaction id makes the correlation a primary-key lookup.
        order_id: txn.id.clone(),
        gross_amount_cents: txn.total_cents,
        customer_name: txn.customer_name.clone(),
        customer_phone: txn.customer_phone.clone(),
    };

    let session = state.gateway.create_session(&request).await?;

    info!(transaction_id = %txn.id, "Payment session issued");
    Ok(Json(session))
}

/// `POST /api/payments/notification` - the provider webhook. Unauthenticated
/// by design (the provider can't send our principal headers).
///
/// Always acknowledges with 200: a non-2xx makes the provider retry, and
/// nothing here is fixed by retrying. Problems are logged instead. The body
/// is parsed by hand rather than through the `Json` extractor so that a
/// malformed payload is also acknowledged instead of rejected with 4xx.
pub async fn notification(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let payload: PaymentNotification = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Unparseable gateway notification, acknowledging anyway");
            return StatusCode::OK;
        }
    };

    match payload.domain_status() {
        Some(status) => {
            match state
                .db
                .checkout()
                .update_status_by_order_id(&payload.order_id, status)
                .await
            {
                Ok(true) => {
                    info!(order_id = %payload.order_id, status = ?status, "Gateway notification applied");
                }
                Ok(false) => {
                    warn!(order_id = %payload.order_id, "Gateway notification for unknown order");
                }
                Err(e) => {
                    error!(order_id = %payload.order_id, error = %e, "Failed to apply gateway notification");
                }
            }
        }
        None => {
            warn!(
                order_id = %payload.order_id,
                provider_status = %payload.transaction_status,
                "Unmapped gateway status, ignoring"
            );
        }
    }

    StatusCode::OK
}
