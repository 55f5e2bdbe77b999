//! Error handling for the HTTP layer.
//!
//! Every library-layer error funnels into [`ApiError`], which picks the
//! status code and a JSON body. Internal details are logged, never sent.
//!
//! ## Status Mapping
//! ```text
//! ValidationError            → 400
//! missing/invalid principal  → 401
//! role not permitted         → 403
//! not found (store-scoped)   → 404
//! insufficient stock         → 409
//! payment provider failure   → 502
//! everything else            → 500 (generic body, error! log)
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use brioche_core::ValidationError;
use brioche_db::{CatalogError, CheckoutError, DbError};
use brioche_gateway::GatewayError;

/// HTTP-layer error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Payment provider error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(String),
}

/// JSON error body: `{"error": {"code": ..., "message": ...}}`.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "INSUFFICIENT_STOCK"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // The generic 500 hides the detail from the client but not from us.
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Conversions from library errors
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::ProductNotFound(id) => {
                ApiError::NotFound(format!("Product not found: {}", id))
            }
            CheckoutError::InsufficientStock { .. } => ApiError::Conflict(err.to_string()),
            CheckoutError::NotFound(id) => {
                ApiError::NotFound(format!("Transaction not found: {}", id))
            }
            CheckoutError::Validation(v) => ApiError::BadRequest(v.to_string()),
            CheckoutError::Db(db) => ApiError::from(db),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => {
                ApiError::NotFound(format!("Product not found: {}", id))
            }
            CatalogError::Validation(v) => ApiError::BadRequest(v.to_string()),
            CatalogError::Db(db) => ApiError::from(db),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} not found: {}", entity, id))
            }
            // Duplicate SKU etc. is a client problem; everything else is ours.
            DbError::UniqueViolation { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let (status, _) = ApiError::BadRequest("x".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, code) = ApiError::Conflict("x".into()).status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "INSUFFICIENT_STOCK");

        let (status, _) = ApiError::Upstream("x".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_insufficient_stock_maps_to_conflict() {
        let err = CheckoutError::InsufficientStock {
            sku: "A".into(),
            available: 1,
            requested: 2,
        };
        assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
    }

    #[test]
    fn test_db_internal_detail_not_leaked() {
        let api: ApiError = DbError::Internal("secret detail".into()).into();
        match api {
            ApiError::Internal(detail) => assert!(detail.contains("secret detail")),
            other => panic!("expected Internal, got {:?}", other),
        }
    }
}
