//! # Checkout Pricing
//!
//! Pure cart pricing and settlement math for the Checkout Engine.
//!
//! ## Division of Labor
//! ```text
//! CheckoutCommand (validated input)
//!      │
//!      ▼
//! brioche-db CheckoutRepository        ── resolves product ids, opens the
//!      │                                  database transaction
//!      ▼
//! price_cart() / settle()  ← THIS MODULE  pure arithmetic on resolved
//!      │                                  products, no I/O
//!      ▼
//! insert transaction + items, atomic stock decrement, commit
//! ```
//!
//! Prices always come from the resolved product rows - a client-supplied
//! price never enters this module.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{PaymentType, Product, TransactionStatus};
use crate::validation::{validate_discount, validate_quantity};
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Input
// =============================================================================

/// One requested cart line: which product, how many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
}

/// A fully-typed checkout request.
///
/// The API boundary parses and validates loose request bodies into this
/// struct before the engine ever sees them; the engine re-validates anyway
/// (defense in depth, and the repository is a public API of its own).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutCommand {
    pub lines: Vec<CartLine>,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Cash tendered by the customer, if recorded.
    #[serde(default)]
    pub amount_received_cents: Option<i64>,
    /// Whole-transaction discount. Defaults to zero.
    #[serde(default)]
    pub discount_cents: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutCommand {
    /// Fail-fast validation, before any I/O happens.
    ///
    /// ## Rules
    /// - cart must not be empty, and must not exceed [`MAX_CART_LINES`]
    /// - every quantity must be positive and within the per-line cap
    /// - discount must not be negative
    ///
    /// A total driven negative by a large discount is representable and NOT
    /// rejected here - a documented gap in the system this reimplements.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            });
        }

        if self.lines.len() > MAX_CART_LINES {
            return Err(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_CART_LINES as i64,
            });
        }

        for line in &self.lines {
            validate_quantity(line.quantity)?;
        }

        validate_discount(self.discount_cents)?;
        Ok(())
    }

    /// Initial status for the persisted transaction.
    ///
    /// Cash settles at the counter; digital payments stay pending until the
    /// gateway webhook confirms them.
    #[inline]
    pub fn initial_status(&self) -> TransactionStatus {
        if self.payment_type.is_digital() {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Completed
        }
    }
}

// =============================================================================
// Priced Cart
// =============================================================================

/// A cart line priced against the product's current selling price, carrying
/// the snapshot fields that will be frozen onto the transaction item.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: String,
    pub name_snapshot: String,
    pub sku_snapshot: String,
    pub unit_snapshot: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_subtotal: Money,
}

impl PricedLine {
    /// Prices one line from the resolved product row.
    pub fn price(product: &Product, quantity: i64) -> Self {
        let unit_price = product.selling_price();
        PricedLine {
            product_id: product.id.clone(),
            name_snapshot: product.name.clone(),
            sku_snapshot: product.sku.clone(),
            unit_snapshot: product.unit.clone(),
            unit_price,
            quantity,
            line_subtotal: unit_price.multiply_quantity(quantity),
        }
    }
}

/// All lines priced, with the cart subtotal.
#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub subtotal: Money,
}

/// Prices a resolved cart. Order of lines is preserved.
pub fn price_cart(resolved: &[(Product, i64)]) -> PricedCart {
    let lines: Vec<PricedLine> = resolved
        .iter()
        .map(|(product, qty)| PricedLine::price(product, *qty))
        .collect();
    let subtotal = lines.iter().map(|l| l.line_subtotal).sum();
    PricedCart { lines, subtotal }
}

// =============================================================================
// Settlement
// =============================================================================

/// The monetary outcome of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    /// `amount_received - total` when an amount was recorded; negative when
    /// the tender fell short. Zero when no amount was received
    /// (card/transfer).
    pub change_due: Money,
}

/// Computes totals: `total = subtotal - discount`,
/// `change_due = amount_received - total` when an amount was received.
pub fn settle(subtotal: Money, discount: Money, amount_received: Option<Money>) -> CheckoutTotals {
    let total = subtotal - discount;
    let change_due = match amount_received {
        Some(received) => received - total,
        None => Money::zero(),
    };
    CheckoutTotals {
        subtotal,
        discount,
        total,
        change_due,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StockStatus;
    use chrono::Utc;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            store_id: "store-1".to_string(),
            category_id: None,
            name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            barcode: None,
            cost_price_cents: Some(price_cents / 2),
            selling_price_cents: price_cents,
            unit: "pcs".to_string(),
            stock: 10,
            min_stock_alert: 2,
            stock_status: StockStatus::InStock,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn command(lines: Vec<CartLine>) -> CheckoutCommand {
        CheckoutCommand {
            lines,
            payment_type: PaymentType::Cash,
            customer_name: None,
            customer_phone: None,
            amount_received_cents: None,
            discount_cents: 0,
            notes: None,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(command(vec![]).validate().is_err());
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let cmd = command(vec![CartLine {
            product_id: "p1".to_string(),
            quantity: 0,
        }]);
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_negative_discount_rejected() {
        let mut cmd = command(vec![CartLine {
            product_id: "p1".to_string(),
            quantity: 1,
        }]);
        cmd.discount_cents = -50;
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_initial_status_by_payment_type() {
        let mut cmd = command(vec![]);
        assert_eq!(cmd.initial_status(), TransactionStatus::Completed);
        cmd.payment_type = PaymentType::Card;
        assert_eq!(cmd.initial_status(), TransactionStatus::Pending);
        cmd.payment_type = PaymentType::Transfer;
        assert_eq!(cmd.initial_status(), TransactionStatus::Pending);
    }

    #[test]
    fn test_price_cart_sums_lines() {
        let resolved = vec![
            (test_product("1", 1000), 3), // 30.00
            (test_product("2", 250), 2),  // 5.00
        ];
        let priced = price_cart(&resolved);

        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].line_subtotal.cents(), 3000);
        assert_eq!(priced.lines[1].line_subtotal.cents(), 500);
        assert_eq!(priced.subtotal.cents(), 3500);
    }

    #[test]
    fn test_price_cart_snapshots_product_fields() {
        let product = test_product("7", 499);
        let priced = price_cart(&[(product.clone(), 1)]);
        let line = &priced.lines[0];

        assert_eq!(line.name_snapshot, product.name);
        assert_eq!(line.sku_snapshot, product.sku);
        assert_eq!(line.unit_snapshot, product.unit);
        assert_eq!(line.unit_price.cents(), 499);
    }

    #[test]
    fn test_settle_cash_with_change() {
        let totals = settle(
            Money::from_cents(3000),
            Money::from_cents(0),
            Some(Money::from_cents(5000)),
        );
        assert_eq!(totals.total.cents(), 3000);
        assert_eq!(totals.change_due.cents(), 2000);
    }

    #[test]
    fn test_settle_under_tender_records_shortfall() {
        // A shortfall is recorded as-is, not clamped to zero; the receipt
        // shows exactly what is still owed.
        let totals = settle(
            Money::from_cents(3000),
            Money::from_cents(0),
            Some(Money::from_cents(2000)),
        );
        assert_eq!(totals.change_due.cents(), -1000);
    }

    #[test]
    fn test_settle_without_amount_received() {
        let totals = settle(Money::from_cents(3000), Money::from_cents(500), None);
        assert_eq!(totals.total.cents(), 2500);
        assert_eq!(totals.change_due.cents(), 0);
    }

    #[test]
    fn test_settle_negative_total_representable() {
        // Discount exceeding subtotal: the documented design gap. The total
        // must be representable, not rejected.
        let totals = settle(Money::from_cents(1000), Money::from_cents(1500), None);
        assert_eq!(totals.total.cents(), -500);
    }
}
