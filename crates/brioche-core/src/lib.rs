//! # brioche-core: Pure Business Logic for Brioche POS
//!
//! This crate is the heart of Brioche POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! HTTP clients
//!      │
//!      ▼
//! apps/server (axum) ── validated, typed commands
//!      │
//!      ▼
//! ★ brioche-core (THIS CRATE) ★
//!   types • money • checkout pricing • stock status • reporting math
//!   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS
//!      │
//!      ▼
//! brioche-db (SQLite queries, the checkout & reporting engines' persistence)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Store, Product, Transaction, TransactionItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`stock`] - Stock-status derivation (the catalog invariant)
//! - [`checkout`] - Cart pricing and settlement math
//! - [`reporting`] - Percent change, profit margin, local-day windows
//! - [`validation`] - Business rule validation
//! - [`error`] - Input validation error taxonomy
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output - always
//! 2. **No I/O**: database, network and file system access are forbidden here
//! 3. **Integer money**: all monetary values are cents (i64), never floats
//! 4. **Explicit errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod reporting;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use stock::derive_stock_status;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single checkout cart.
///
/// Prevents runaway carts and keeps transactions at a size a small
/// retail counter actually produces.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// Guards against typo-sized orders (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
