//! Principal extraction.
//!
//! Authentication happens upstream (reverse proxy / auth service); this
//! server trusts the `x-principal-*` headers it injects:
//!
//! - `x-principal-user-id`
//! - `x-principal-store-id`
//! - `x-principal-role` (`admin` | `manager` | `cashier`)
//!
//! All three must be present on protected routes. The webhook and health
//! endpoints don't use this extractor at all.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use brioche_core::{Principal, Role};

/// Extractor wrapping the authenticated [`Principal`].
#[derive(Debug, Clone)]
pub struct Auth(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, "x-principal-user-id")?;
        let store_id = header_value(parts, "x-principal-store-id")?;
        let role_str = header_value(parts, "x-principal-role")?;

        let role = Role::parse(&role_str).ok_or_else(|| {
            ApiError::Unauthorized(format!("Unknown principal role: {}", role_str))
        })?;

        Ok(Auth(Principal {
            user_id,
            store_id,
            role,
        }))
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<String, ApiError> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing header: {}", name)))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized(format!("Invalid header: {}", name)))?
        .trim();

    if value.is_empty() {
        return Err(ApiError::Unauthorized(format!("Missing header: {}", name)));
    }

    Ok(value.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_extracts_valid_principal() {
        let mut parts = parts_with(&[
            ("x-principal-user-id", "user-1"),
            ("x-principal-store-id", "store-1"),
            ("x-principal-role", "manager"),
        ]);

        let Auth(principal) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(principal.user_id, "user-1");
        assert_eq!(principal.store_id, "store-1");
        assert_eq!(principal.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let mut parts = parts_with(&[
            ("x-principal-user-id", "user-1"),
            ("x-principal-role", "admin"),
        ]);

        let err = Auth::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let mut parts = parts_with(&[
            ("x-principal-user-id", "user-1"),
            ("x-principal-store-id", "store-1"),
            ("x-principal-role", "owner"),
        ]);

        let err = Auth::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
