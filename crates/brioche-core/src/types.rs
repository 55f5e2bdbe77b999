//! # Domain Types
//!
//! Core domain types used throughout Brioche POS.
//!
//! ## Type Hierarchy
//! ```text
//! Store ─1:*─ Product          (catalog, owns stock + stock_status)
//! Store ─1:*─ Transaction      (immutable once created, except status)
//! Transaction ─1:*─ TransactionItem (snapshots; weak reference to Product)
//! Store ─1:*─ User             (role-carrying membership; auth is external)
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (sku, transaction_number) - human-readable
//!
//! ## Tenant Isolation
//! Every row except the auth-owned user identity carries a `store_id`. A
//! cross-store reference is never valid; repository queries are always
//! store-scoped so a foreign id behaves exactly like a missing one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Stock Status
// =============================================================================

/// Derived classification of a product's stock level.
///
/// This is a cached projection of `(stock, min_stock_alert)` - never an
/// independent source of truth. See [`crate::stock::derive_stock_status`];
/// every mutation of `stock` must re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Stock comfortably above the alert threshold.
    InStock,
    /// Positive stock at or below the alert threshold.
    LowStock,
    /// Zero (or, defensively, negative) stock.
    OutOfStock,
}

// =============================================================================
// Transaction Status
// =============================================================================

/// The status of a checkout transaction.
///
/// There is deliberately no enforced transition table: the role-gated status
/// override may move any status to any other. Callers self-police.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Awaiting payment confirmation (digital payments via the gateway).
    Pending,
    /// Paid and finalized. The only status the Reporting Engine counts.
    Completed,
    /// Abandoned or rejected.
    Cancelled,
    /// Refunded after completion.
    Refunded,
}

impl TransactionStatus {
    /// Parses the lowercase wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "completed" => Some(TransactionStatus::Completed),
            "cancelled" => Some(TransactionStatus::Cancelled),
            "refunded" => Some(TransactionStatus::Refunded),
            _ => None,
        }
    }

    /// Lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Refunded => "refunded",
        }
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a transaction is paid.
///
/// `Cash` settles at the counter (status `completed` immediately);
/// `Card` and `Transfer` go through the hosted-checkout gateway and start
/// as `pending` until the webhook confirms them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Cash,
    Card,
    Transfer,
}

impl PaymentType {
    /// Whether this payment settles through the external gateway.
    #[inline]
    pub const fn is_digital(&self) -> bool {
        !matches!(self, PaymentType::Cash)
    }

    /// Lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "cash",
            PaymentType::Card => "card",
            PaymentType::Transfer => "transfer",
        }
    }
}

// =============================================================================
// Role / Principal
// =============================================================================

/// Role of a store member.
///
/// Authentication and session issuance are external; roles arrive with the
/// authenticated principal and gate the mutating endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
}

impl Role {
    /// Parses the lowercase wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "cashier" => Some(Role::Cashier),
            _ => None,
        }
    }

    /// Lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
        }
    }

    /// Only admins and managers may overwrite a transaction status.
    #[inline]
    pub const fn can_override_status(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Only admins and managers may edit the catalog.
    #[inline]
    pub const fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

/// An authenticated caller, as supplied by the external auth layer.
///
/// The core and db layers consume this; they never construct it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub store_id: String,
    pub role: Role,
}

// =============================================================================
// Store
// =============================================================================

/// A tenant - one physical/business location with its own catalog, users
/// and transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// ISO currency code, display only. No conversion happens anywhere.
    pub currency: String,

    /// IANA timezone label, display only.
    pub timezone: String,

    /// UTC offset in minutes, used by the Reporting Engine for
    /// local-midnight day boundaries.
    pub utc_offset_minutes: i32,

    /// Unique join code; None when joining is closed.
    pub invite_code: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A store member. Credentials live with the external auth provider; this
/// row only ties an identity to a store and a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Category
// =============================================================================

/// A product grouping within a store.
///
/// Feeds the dashboard's distinct-active-category count; products reference
/// it through their nullable `category_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Owned exclusively by the catalog; the Checkout Engine mutates it only
/// through the atomic stock-adjustment statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this product belongs to.
    pub store_id: String,

    /// Owning category, if any. Feeds the dashboard's distinct-category count.
    pub category_id: Option<String>,

    /// Display name shown to the cashier and snapshotted onto receipts.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Cost in cents, for profit calculations. Nullable: products without a
    /// recorded cost contribute zero cost to profit reports.
    pub cost_price_cents: Option<i64>,

    /// Selling price in cents. The only price checkout ever trusts.
    pub selling_price_cents: i64,

    /// Sales unit ("pcs", "loaf", "kg", ...), snapshotted onto line items.
    pub unit: String,

    /// Current stock level. Conceptually >= 0; the conditional decrement in
    /// the Checkout Engine is what actually keeps it there.
    pub stock: i64,

    /// Threshold at or below which the product counts as low stock.
    pub min_stock_alert: i64,

    /// Cached projection of (stock, min_stock_alert). Re-derived on every
    /// stock mutation, never trusted on its own.
    pub stock_status: StockStatus,

    /// Soft-delete flag. Historical transaction items keep referencing
    /// inactive products.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }

    /// Returns the cost price as Money, zero when unrecorded.
    #[inline]
    pub fn cost_price_or_zero(&self) -> Money {
        Money::from_cents(self.cost_price_cents.unwrap_or(0))
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A checkout transaction.
///
/// Immutable once created except for `status` and `updated_at`. Created
/// exactly once per checkout; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub store_id: String,
    /// Cashier who rang the sale.
    pub user_id: String,
    /// Human-readable business identifier, unique storage-wide.
    pub transaction_number: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub payment_type: PaymentType,
    /// Cash tendered, when recorded.
    pub amount_received_cents: Option<i64>,
    pub change_due_cents: i64,
    pub status: TransactionStatus,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Transaction Item
// =============================================================================

/// A line item in a transaction.
///
/// Uses the snapshot pattern: product name, sku, unit and price are frozen
/// at sale time. The transaction is an immutable historical record,
/// independent of later catalog edits or soft deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    /// Weak reference for reporting joins; the product may be soft-deleted
    /// later without invalidating this row.
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// SKU at time of sale (frozen).
    pub sku_snapshot: String,
    /// Sales unit at time of sale (frozen).
    pub unit_snapshot: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// unit_price x quantity, in cents.
    pub subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl TransactionItem {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// A transaction together with its line items, as returned by checkout
/// and detail lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionWithItems {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<TransactionItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_status_roundtrip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Cancelled,
            TransactionStatus::Refunded,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransactionStatus::parse("voided"), None);
    }

    #[test]
    fn test_payment_type_digital() {
        assert!(!PaymentType::Cash.is_digital());
        assert!(PaymentType::Card.is_digital());
        assert!(PaymentType::Transfer.is_digital());
    }

    #[test]
    fn test_role_gates() {
        assert!(Role::Admin.can_override_status());
        assert!(Role::Manager.can_override_status());
        assert!(!Role::Cashier.can_override_status());
        assert_eq!(Role::parse("cashier"), Some(Role::Cashier));
        assert_eq!(Role::parse("owner"), None);
    }
}
