//! # Stock-Status Derivation
//!
//! The single catalog invariant with teeth: `stock_status` is a cached
//! projection of `(stock, min_stock_alert)` and must be re-derived by every
//! code path that touches `stock` - product create, direct stock edit, and
//! the checkout decrement.
//!
//! The SQL `CASE` expression inside the Checkout Engine's conditional
//! decrement mirrors this function exactly; the db-layer tests assert the
//! two never drift apart.

use crate::types::StockStatus;

/// Derives the stock-status classification from the authoritative stock
/// value. Pure function, no side effects.
///
/// - `stock <= 0` → `OutOfStock`
/// - `0 < stock <= min_stock_alert` → `LowStock`
/// - otherwise → `InStock`
///
/// ## Example
/// ```rust
/// use brioche_core::stock::derive_stock_status;
/// use brioche_core::types::StockStatus;
///
/// assert_eq!(derive_stock_status(10, 2), StockStatus::InStock);
/// assert_eq!(derive_stock_status(2, 2), StockStatus::LowStock);
/// assert_eq!(derive_stock_status(0, 2), StockStatus::OutOfStock);
/// ```
#[inline]
pub const fn derive_stock_status(stock: i64, min_stock_alert: i64) -> StockStatus {
    if stock <= 0 {
        StockStatus::OutOfStock
    } else if stock <= min_stock_alert {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}
