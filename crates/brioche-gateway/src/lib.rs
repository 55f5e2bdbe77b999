//! # brioche-gateway: Payment Gateway Adapter
//!
//! The seam between the checkout flow and the hosted-checkout payment
//! provider.
//!
//! ## Two Directions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Payment Gateway Adapter                            │
//! │                                                                         │
//! │  OUTBOUND (session creation)                                            │
//! │  apps/server ──► PaymentGateway::create_session ──► provider API        │
//! │       │                                                                 │
//! │       └── failure = GatewayError = 502 to the client                    │
//! │                                                                         │
//! │  INBOUND (webhook notification)                                         │
//! │  provider ──► POST /api/payments/notification ──► PaymentNotification   │
//! │       │                                                                 │
//! │       └── gateway status string → domain TransactionStatus              │
//! │           (handler always acknowledges 200, failures are logged)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The trait is injected at construction; there are no global singletons,
//! and tests substitute a canned implementation.

pub mod client;
pub mod error;
pub mod notification;

pub use client::{HostedCheckoutClient, PaymentGateway, SessionRequest, SessionResponse};
pub use error::GatewayError;
pub use notification::PaymentNotification;
