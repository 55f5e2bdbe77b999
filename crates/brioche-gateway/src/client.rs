//! # Hosted Checkout Client
//!
//! Outbound session creation against the payment provider's hosted checkout
//! API: one authenticated JSON POST returning a token and redirect URL.
//!
//! The provider API is Snap-style: basic auth with the server key as
//! username and an empty password, amounts as integers in the smallest
//! currency unit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{GatewayError, GatewayResult};

// =============================================================================
// Trait
// =============================================================================

/// The payment provider seam.
///
/// Injected into the server state at construction; handler tests substitute
/// a canned implementation instead of hitting the network.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted checkout session for an order.
    async fn create_session(&self, request: &SessionRequest) -> GatewayResult<SessionResponse>;
}

// =============================================================================
// Wire Types
// =============================================================================

/// Input for session creation.
///
/// `order_id` is the internal transaction id; the provider echoes it back
/// in webhook notifications, which is how the two systems correlate.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest {
    pub order_id: String,
    /// Integer cents; the provider treats this as the gross amount.
    pub gross_amount_cents: i64,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

/// A created hosted-checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub redirect_url: String,
}

/// Provider request body.
#[derive(Serialize)]
struct SnapRequestBody<'a> {
    transaction_details: TransactionDetails<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_details: Option<CustomerDetails<'a>>,
}

#[derive(Serialize)]
struct TransactionDetails<'a> {
    order_id: &'a str,
    gross_amount: i64,
}

#[derive(Serialize)]
struct CustomerDetails<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

// =============================================================================
// Client
// =============================================================================

/// Real provider client over HTTPS.
#[derive(Debug, Clone)]
pub struct HostedCheckoutClient {
    http: reqwest::Client,
    base_url: String,
    server_key: String,
}

impl HostedCheckoutClient {
    /// Creates a client for the given provider base URL and server key.
    ///
    /// The base URL carries the environment (sandbox vs production); this
    /// crate doesn't distinguish them.
    pub fn new(base_url: impl Into<String>, server_key: impl Into<String>) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(HostedCheckoutClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            server_key: server_key.into(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HostedCheckoutClient {
    async fn create_session(&self, request: &SessionRequest) -> GatewayResult<SessionResponse> {
        let url = format!("{}/snap/v1/transactions", self.base_url);

        debug!(order_id = %request.order_id, "Creating hosted checkout session");

        let body = SnapRequestBody {
            transaction_details: TransactionDetails {
                order_id: &request.order_id,
                gross_amount: request.gross_amount_cents,
            },
            customer_details: if request.customer_name.is_some()
                || request.customer_phone.is_some()
            {
                Some(CustomerDetails {
                    first_name: request.customer_name.as_deref(),
                    phone: request.customer_phone.as_deref(),
                })
            } else {
                None
            },
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.server_key, Some(""))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        info!(order_id = %request.order_id, "Hosted checkout session created");
        Ok(session)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HostedCheckoutClient::new("https://api.example.com/", "key").unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }

    #[test]
    fn test_request_body_shape() {
        let body = SnapRequestBody {
            transaction_details: TransactionDetails {
                order_id: "txn-1",
                gross_amount: 3000,
            },
            customer_details: Some(CustomerDetails {
                first_name: Some("Avery"),
                phone: None,
            }),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["transaction_details"]["order_id"], "txn-1");
        assert_eq!(json["transaction_details"]["gross_amount"], 3000);
        assert_eq!(json["customer_details"]["first_name"], "Avery");
        assert!(json["customer_details"].get("phone").is_none());
    }

    #[test]
    fn test_request_body_omits_empty_customer() {
        let body = SnapRequestBody {
            transaction_details: TransactionDetails {
                order_id: "txn-2",
                gross_amount: 100,
            },
            customer_details: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("customer_details").is_none());
    }
}
