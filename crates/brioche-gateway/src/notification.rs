//! # Webhook Notification Parsing
//!
//! Inbound payloads from the payment provider and the mapping from its
//! status vocabulary to the domain's [`TransactionStatus`].
//!
//! ## Status Mapping
//! ```text
//! settlement, capture        → completed
//! pending                    → pending
//! deny, cancel, expire       → cancelled
//! refund, partial_refund     → refunded
//! anything else              → unmapped (caller logs and acknowledges)
//! ```

use serde::Deserialize;

use brioche_core::TransactionStatus;

/// A parsed provider notification.
///
/// Only the fields this system consumes; the provider sends more, and serde
/// ignores the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentNotification {
    /// Echoed back from session creation; equals the transaction id.
    pub order_id: String,
    pub transaction_status: String,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<String>,
}

impl PaymentNotification {
    /// Maps the provider's status string to a domain status.
    ///
    /// Returns `None` for unknown statuses; the webhook handler logs those
    /// and still acknowledges, so provider retries don't pile up.
    pub fn domain_status(&self) -> Option<TransactionStatus> {
        match self.transaction_status.as_str() {
            "settlement" | "capture" => Some(TransactionStatus::Completed),
            "pending" => Some(TransactionStatus::Pending),
            "deny" | "cancel" | "expire" => Some(TransactionStatus::Cancelled),
            "refund" | "partial_refund" => Some(TransactionStatus::Refunded),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(status: &str) -> PaymentNotification {
        PaymentNotification {
            order_id: "txn-1".to_string(),
            transaction_status: status.to_string(),
            payment_type: None,
            fraud_status: None,
            gross_amount: None,
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            notification("settlement").domain_status(),
            Some(TransactionStatus::Completed)
        );
        assert_eq!(
            notification("capture").domain_status(),
            Some(TransactionStatus::Completed)
        );
        assert_eq!(
            notification("pending").domain_status(),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(
            notification("deny").domain_status(),
            Some(TransactionStatus::Cancelled)
        );
        assert_eq!(
            notification("expire").domain_status(),
            Some(TransactionStatus::Cancelled)
        );
        assert_eq!(
            notification("refund").domain_status(),
            Some(TransactionStatus::Refunded)
        );
        assert_eq!(
            notification("partial_refund").domain_status(),
            Some(TransactionStatus::Refunded)
        );
    }

    #[test]
    fn test_unknown_status_unmapped() {
        assert_eq!(notification("authorize").domain_status(), None);
        assert_eq!(notification("").domain_status(), None);
    }

    #[test]
    fn test_parses_provider_payload_with_extra_fields() {
        let json = r#"{
            "order_id": "2f5a1c9e-8a27-4a3a-9d10-000000000001",
            "transaction_status": "settlement",
            "payment_type": "bank_transfer",
            "fraud_status": "accept",
            "gross_amount": "30.00",
            "signature_key": "abcdef",
            "status_code": "200"
        }"#;

        let parsed: PaymentNotification = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.domain_status(), Some(TransactionStatus::Completed));
        assert_eq!(parsed.payment_type.as_deref(), Some("bank_transfer"));
    }
}
