//! # Gateway Error Types
//!
//! Failures from the payment provider. The session-creation caller maps
//! these to 502; the webhook path logs and swallows them.

use thiserror::Error;

/// Payment provider failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure: DNS, TLS, timeout, connection refused.
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Gateway returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The provider answered 2xx but the body didn't parse.
    #[error("Gateway response invalid: {0}")]
    InvalidResponse(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
