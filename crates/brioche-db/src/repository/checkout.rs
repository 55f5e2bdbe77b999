//! # Checkout Repository
//!
//! The Checkout Engine: turns a validated [`CheckoutCommand`] into a
//! persisted transaction with item snapshots and atomically decremented
//! stock, all inside ONE database transaction.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      create_transaction                                 │
//! │                                                                         │
//! │  1. command.validate()          ← fail fast, no I/O                     │
//! │  2. BEGIN                                                               │
//! │  3. resolve each line           ← active product, scoped to store       │
//! │       │   miss → ProductNotFound, rollback                              │
//! │  4. price_cart() / settle()     ← brioche-core, server-side prices      │
//! │  5. INSERT transaction          ← cash = completed, digital = pending   │
//! │  6. INSERT item snapshots                                               │
//! │  7. per line:                                                           │
//! │     UPDATE products                                                     │
//! │        SET stock = stock - qty,                                         │
//! │            stock_status = CASE ... END   ← mirrors derive_stock_status  │
//! │      WHERE id = ? AND stock >= qty                                      │
//! │       │   0 rows → InsufficientStock, rollback                          │
//! │  8. COMMIT                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A transaction-number collision (unique index) is retried exactly once
//! with a freshly generated number; a second collision surfaces as a
//! persistence error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{Page, Pagination};
use brioche_core::checkout::{price_cart, settle, CheckoutCommand};
use brioche_core::{
    Money, PaymentType, Product, Transaction, TransactionItem, TransactionStatus,
    TransactionWithItems, ValidationError,
};

// =============================================================================
// Errors
// =============================================================================

/// Business outcomes of the checkout engine.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A cart line referenced a product that is missing, inactive, or owned
    /// by another store. Deliberately indistinguishable.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A line asked for more units than are on hand. Rolls back the whole
    /// checkout.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Transaction not found (status update path).
    #[error("Transaction not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Db(DbError::from(err))
    }
}

// =============================================================================
// Listing Filter
// =============================================================================

/// Filters for the transaction listing. All optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for transaction creation and lifecycle.
#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    pool: SqlitePool,
}

impl CheckoutRepository {
    /// Creates a new CheckoutRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutRepository { pool }
    }

    /// Runs the whole checkout atomically. See the module docs for the flow.
    pub async fn create_transaction(
        &self,
        store_id: &str,
        user_id: &str,
        command: &CheckoutCommand,
    ) -> Result<TransactionWithItems, CheckoutError> {
        command.validate()?;

        match self.attempt_checkout(store_id, user_id, command).await {
            // One retry on a transaction-number collision; the retry
            // generates a fresh number.
            Err(CheckoutError::Db(e)) if e.is_unique_violation() => {
                warn!("Transaction number collision, retrying once");
                self.attempt_checkout(store_id, user_id, command).await
            }
            other => other,
        }
    }

    async fn attempt_checkout(
        &self,
        store_id: &str,
        user_id: &str,
        command: &CheckoutCommand,
    ) -> Result<TransactionWithItems, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        // Resolve every line to an active product in this store. Any miss
        // aborts the whole checkout.
        let mut resolved: Vec<(Product, i64)> = Vec::with_capacity(command.lines.len());
        for line in &command.lines {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, store_id, category_id, name, sku, barcode,
                       cost_price_cents, selling_price_cents, unit,
                       stock, min_stock_alert, stock_status, is_active,
                       created_at, updated_at
                FROM products
                WHERE id = ?1 AND store_id = ?2 AND is_active = 1
                "#,
            )
            .bind(&line.product_id)
            .bind(store_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CheckoutError::ProductNotFound(line.product_id.clone()))?;

            resolved.push((product, line.quantity));
        }

        // Server-side pricing; client-supplied prices never reach this point.
        let priced = price_cart(&resolved);
        let totals = settle(
            priced.subtotal,
            Money::from_cents(command.discount_cents),
            command.amount_received_cents.map(Money::from_cents),
        );

        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            user_id: user_id.to_string(),
            transaction_number: generate_transaction_number(),
            subtotal_cents: totals.subtotal.cents(),
            discount_cents: totals.discount.cents(),
            total_cents: totals.total.cents(),
            payment_type: command.payment_type,
            amount_received_cents: command.amount_received_cents,
            change_due_cents: totals.change_due.cents(),
            status: command.initial_status(),
            customer_name: command.customer_name.clone(),
            customer_phone: command.customer_phone.clone(),
            notes: command.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %transaction.id,
            number = %transaction.transaction_number,
            total = %totals.total,
            "Inserting transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, store_id, user_id, transaction_number,
                subtotal_cents, discount_cents, total_cents,
                payment_type, amount_received_cents, change_due_cents,
                status, customer_name, customer_phone, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.store_id)
        .bind(&transaction.user_id)
        .bind(&transaction.transaction_number)
        .bind(transaction.subtotal_cents)
        .bind(transaction.discount_cents)
        .bind(transaction.total_cents)
        .bind(transaction.payment_type)
        .bind(transaction.amount_received_cents)
        .bind(transaction.change_due_cents)
        .bind(transaction.status)
        .bind(&transaction.customer_name)
        .bind(&transaction.customer_phone)
        .bind(&transaction.notes)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *tx)
        .await?;

        // Item snapshots: the receipt stays stable even if the catalog
        // changes later.
        let mut items: Vec<TransactionItem> = Vec::with_capacity(priced.lines.len());
        for line in &priced.lines {
            let item = TransactionItem {
                id: Uuid::new_v4().to_string(),
                transaction_id: transaction.id.clone(),
                product_id: line.product_id.clone(),
                name_snapshot: line.name_snapshot.clone(),
                sku_snapshot: line.sku_snapshot.clone(),
                unit_snapshot: line.unit_snapshot.clone(),
                unit_price_cents: line.unit_price.cents(),
                quantity: line.quantity,
                subtotal_cents: line.line_subtotal.cents(),
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO transaction_items (
                    id, transaction_id, product_id,
                    name_snapshot, sku_snapshot, unit_snapshot,
                    unit_price_cents, quantity, subtotal_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(&item.id)
            .bind(&item.transaction_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(&item.sku_snapshot)
            .bind(&item.unit_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.subtotal_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        // Atomic conditional decrement. The CASE mirrors
        // derive_stock_status(stock - qty, min_stock_alert) exactly.
        for (product, qty) in &resolved {
            let result = sqlx::query(
                r#"
                UPDATE products SET
                    stock = stock - ?2,
                    stock_status = CASE
                        WHEN stock - ?2 <= 0 THEN 'out_of_stock'
                        WHEN stock - ?2 <= min_stock_alert THEN 'low_stock'
                        ELSE 'in_stock'
                    END,
                    updated_at = ?3
                WHERE id = ?1 AND stock >= ?2
                "#,
            )
            .bind(&product.id)
            .bind(qty)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Guard failed: read the stock as of this transaction for an
                // accurate error, then roll everything back.
                let available: i64 =
                    sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                        .bind(&product.id)
                        .fetch_one(&mut *tx)
                        .await?;

                tx.rollback().await?;

                return Err(CheckoutError::InsufficientStock {
                    sku: product.sku.clone(),
                    available,
                    requested: *qty,
                });
            }
        }

        tx.commit().await?;

        info!(
            id = %transaction.id,
            number = %transaction.transaction_number,
            lines = items.len(),
            status = ?transaction.status,
            "Checkout committed"
        );

        Ok(TransactionWithItems { transaction, items })
    }

    /// Gets a transaction with its items, scoped to a store.
    pub async fn get_by_id(
        &self,
        store_id: &str,
        id: &str,
    ) -> DbResult<Option<TransactionWithItems>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, store_id, user_id, transaction_number,
                   subtotal_cents, discount_cents, total_cents,
                   payment_type, amount_received_cents, change_due_cents,
                   status, customer_name, customer_phone, notes,
                   created_at, updated_at
            FROM transactions
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(transaction) = transaction else {
            return Ok(None);
        };

        let items = self.get_items(&transaction.id).await?;
        Ok(Some(TransactionWithItems { transaction, items }))
    }

    /// Gets all item snapshots for a transaction.
    pub async fn get_items(&self, transaction_id: &str) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT id, transaction_id, product_id,
                   name_snapshot, sku_snapshot, unit_snapshot,
                   unit_price_cents, quantity, subtotal_cents, created_at
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists transactions, newest first, with optional filters.
    ///
    /// The date window is inclusive on both ends when both bounds are given.
    pub async fn list(
        &self,
        store_id: &str,
        filter: &TransactionFilter,
    ) -> DbResult<Page<Transaction>> {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        // Dynamic WHERE assembled from fixed fragments; values always go
        // through binds.
        let mut conditions = vec!["store_id = ?".to_string()];
        if filter.status.is_some() {
            conditions.push("status = ?".to_string());
        }
        if filter.payment_type.is_some() {
            conditions.push("payment_type = ?".to_string());
        }
        if filter.start_date.is_some() {
            conditions.push("created_at >= ?".to_string());
        }
        if filter.end_date.is_some() {
            conditions.push("created_at <= ?".to_string());
        }
        let where_clause = conditions.join(" AND ");

        let count_sql = format!("SELECT COUNT(*) FROM transactions WHERE {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(store_id);
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
        }
        if let Some(payment_type) = filter.payment_type {
            count_query = count_query.bind(payment_type);
        }
        if let Some(start) = filter.start_date {
            count_query = count_query.bind(start);
        }
        if let Some(end) = filter.end_date {
            count_query = count_query.bind(end);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            r#"
            SELECT id, store_id, user_id, transaction_number,
                   subtotal_cents, discount_cents, total_cents,
                   payment_type, amount_received_cents, change_due_cents,
                   status, customer_name, customer_phone, notes,
                   created_at, updated_at
            FROM transactions
            WHERE {}
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
            where_clause
        );
        let mut list_query = sqlx::query_as::<_, Transaction>(&list_sql).bind(store_id);
        if let Some(status) = filter.status {
            list_query = list_query.bind(status);
        }
        if let Some(payment_type) = filter.payment_type {
            list_query = list_query.bind(payment_type);
        }
        if let Some(start) = filter.start_date {
            list_query = list_query.bind(start);
        }
        if let Some(end) = filter.end_date {
            list_query = list_query.bind(end);
        }
        let data = list_query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            data,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Overwrites a transaction's status. Any status to any status; callers
    /// are role-gated, not this layer.
    pub async fn update_status(
        &self,
        store_id: &str,
        id: &str,
        new_status: TransactionStatus,
    ) -> Result<Transaction, CheckoutError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE transactions SET status = ?3, updated_at = ?4
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(store_id)
        .bind(new_status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CheckoutError::NotFound(id.to_string()));
        }

        info!(id = %id, status = ?new_status, "Transaction status overridden");

        let updated = self
            .get_by_id(store_id, id)
            .await?
            .ok_or_else(|| CheckoutError::NotFound(id.to_string()))?;
        Ok(updated.transaction)
    }

    /// Webhook path: updates status by the external order reference, which
    /// equals the internal transaction id.
    ///
    /// Idempotent. Returns whether a row matched; an unknown id is the
    /// CALLER's warn-and-acknowledge case, never an error.
    pub async fn update_status_by_order_id(
        &self,
        order_id: &str,
        new_status: TransactionStatus,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE transactions SET status = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(new_status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let matched = result.rows_affected() > 0;
        debug!(order_id = %order_id, status = ?new_status, matched, "Gateway status update");
        Ok(matched)
    }
}

// =============================================================================
// Transaction Number Generation
// =============================================================================

/// Generates a transaction number: `TRX-` plus the uppercased base-36
/// microsecond timestamp.
///
/// Compact, roughly sortable, and unique enough that the one-retry policy
/// on the unique index covers the rest.
///
/// ## Example
/// `TRX-LX2K9A3F0Q`
fn generate_transaction_number() -> String {
    let micros = Utc::now().timestamp_micros().max(0) as u128;
    format!("TRX-{}", to_base36_upper(micros))
}

fn to_base36_upper(mut n: u128) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use brioche_core::checkout::CartLine;
    use brioche_core::{derive_stock_status, Role, StockStatus};

    struct Fixture {
        db: Database,
        store_id: String,
        user_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .create_store("Test", "USD", "UTC", 0)
            .await
            .unwrap();
        let user = db
            .stores()
            .create_user(&store.id, "Avery", Role::Cashier)
            .await
            .unwrap();
        Fixture {
            db,
            store_id: store.id,
            user_id: user.id,
        }
    }

    async fn seed_product(f: &Fixture, sku: &str, price: i64, stock: i64, alert: i64) -> String {
        f.db.products()
            .create(
                &f.store_id,
                NewProduct {
                    category_id: None,
                    name: format!("Product {}", sku),
                    sku: sku.to_string(),
                    barcode: None,
                    cost_price_cents: Some(price / 2),
                    selling_price_cents: price,
                    unit: "pcs".to_string(),
                    stock,
                    min_stock_alert: alert,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn cash_command(lines: Vec<CartLine>) -> CheckoutCommand {
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

    #[tokio::test]
    async fn test_checkout_scenario_totals_stock_and_status() {
        // Price 10.00, stock 5, alert 2, buy 3: total 30.00, stock 2, low.
        let f = fixture().await;
        let product_id = seed_product(&f, "SCN-1", 1000, 5, 2).await;

        let result = f
            .db
            .checkout()
            .create_transaction(
                &f.store_id,
                &f.user_id,
                &cash_command(vec![CartLine {
                    product_id: product_id.clone(),
                    quantity: 3,
                }]),
            )
            .await
            .unwrap();

        assert_eq!(result.transaction.total_cents, 3000);
        assert_eq!(result.transaction.status, TransactionStatus::Completed);
        assert!(result.transaction.transaction_number.starts_with("TRX-"));

        let product = f
            .db
            .products()
            .get_by_id(&f.store_id, &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock, 2);
        assert_eq!(product.stock_status, StockStatus::LowStock);
        assert_eq!(
            product.stock_status,
            derive_stock_status(product.stock, product.min_stock_alert)
        );
    }

    #[tokio::test]
    async fn test_item_subtotals_sum_to_transaction_subtotal() {
        let f = fixture().await;
        let a = seed_product(&f, "SUM-A", 1099, 10, 1).await;
        let b = seed_product(&f, "SUM-B", 250, 10, 1).await;

        let result = f
            .db
            .checkout()
            .create_transaction(
                &f.store_id,
                &f.user_id,
                &cash_command(vec![
                    CartLine {
                        product_id: a,
                        quantity: 2,
                    },
                    CartLine {
                        product_id: b,
                        quantity: 4,
                    },
                ]),
            )
            .await
            .unwrap();

        let item_sum: i64 = result.items.iter().map(|i| i.subtotal_cents).sum();
        assert_eq!(item_sum, result.transaction.subtotal_cents);
        assert_eq!(item_sum, 2 * 1099 + 4 * 250);
    }

    #[tokio::test]
    async fn test_digital_payment_starts_pending() {
        let f = fixture().await;
        let product_id = seed_product(&f, "PEND-1", 500, 5, 1).await;

        let mut command = cash_command(vec![CartLine {
            product_id,
            quantity: 1,
        }]);
        command.payment_type = PaymentType::Card;

        let result = f
            .db
            .checkout()
            .create_transaction(&f.store_id, &f.user_id, &command)
            .await
            .unwrap();

        assert_eq!(result.transaction.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_multi_line_checkout_is_all_or_nothing() {
        let f = fixture().await;
        let plenty = seed_product(&f, "AON-A", 1000, 10, 1).await;
        let scarce = seed_product(&f, "AON-B", 1000, 1, 1).await;

        let err = f
            .db
            .checkout()
            .create_transaction(
                &f.store_id,
                &f.user_id,
                &cash_command(vec![
                    CartLine {
                        product_id: plenty.clone(),
                        quantity: 2,
                    },
                    CartLine {
                        product_id: scarce,
                        quantity: 5,
                    },
                ]),
            )
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 1);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        // First line's decrement rolled back; no orphan transaction rows.
        let product = f
            .db
            .products()
            .get_by_id(&f.store_id, &plenty)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock, 10);

        let listing = f
            .db
            .checkout()
            .list(&f.store_id, &TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(listing.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_one_wins() {
        // Stock 1, two simultaneous single-unit checkouts: exactly one
        // success, one InsufficientStock.
        let f = fixture().await;
        let product_id = seed_product(&f, "RACE-1", 1000, 1, 0).await;

        let command = cash_command(vec![CartLine {
            product_id: product_id.clone(),
            quantity: 1,
        }]);

        let repo_a = f.db.checkout();
        let repo_b = f.db.checkout();
        let (first, second) = tokio::join!(
            repo_a.create_transaction(&f.store_id, &f.user_id, &command),
            repo_b.create_transaction(&f.store_id, &f.user_id, &command),
        );

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let failure = if first.is_err() { first } else { second };
        assert!(matches!(
            failure.unwrap_err(),
            CheckoutError::InsufficientStock { .. }
        ));

        let product = f
            .db
            .products()
            .get_by_id(&f.store_id, &product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.stock_status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_discount_can_drive_total_negative() {
        let f = fixture().await;
        let product_id = seed_product(&f, "NEG-1", 1000, 5, 1).await;

        let mut command = cash_command(vec![CartLine {
            product_id,
            quantity: 1,
        }]);
        command.discount_cents = 1500;

        let result = f
            .db
            .checkout()
            .create_transaction(&f.store_id, &f.user_id, &command)
            .await
            .unwrap();

        assert_eq!(result.transaction.total_cents, -500);
    }

    #[tokio::test]
    async fn test_change_due_for_cash_tender() {
        let f = fixture().await;
        let product_id = seed_product(&f, "CHG-1", 1250, 5, 1).await;

        let mut command = cash_command(vec![CartLine {
            product_id,
            quantity: 2,
        }]);
        command.amount_received_cents = Some(3000);

        let result = f
            .db
            .checkout()
            .create_transaction(&f.store_id, &f.user_id, &command)
            .await
            .unwrap();

        assert_eq!(result.transaction.total_cents, 2500);
        assert_eq!(result.transaction.change_due_cents, 500);
    }

    #[tokio::test]
    async fn test_under_tender_persists_negative_change() {
        let f = fixture().await;
        let product_id = seed_product(&f, "CHG-2", 1500, 5, 1).await;

        let mut command = cash_command(vec![CartLine {
            product_id,
            quantity: 2,
        }]);
        command.amount_received_cents = Some(2000);

        let result = f
            .db
            .checkout()
            .create_transaction(&f.store_id, &f.user_id, &command)
            .await
            .unwrap();

        assert_eq!(result.transaction.total_cents, 3000);
        assert_eq!(result.transaction.change_due_cents, -1000);
    }

    #[tokio::test]
    async fn test_product_of_other_store_invisible() {
        let f = fixture().await;
        let other = f
            .db
            .stores()
            .create_store("Other", "USD", "UTC", 0)
            .await
            .unwrap();
        let foreign_product = {
            let fx = Fixture {
                db: f.db.clone(),
                store_id: other.id.clone(),
                user_id: f.user_id.clone(),
            };
            seed_product(&fx, "FOR-1", 1000, 5, 1).await
        };

        let err = f
            .db
            .checkout()
            .create_transaction(
                &f.store_id,
                &f.user_id,
                &cash_command(vec![CartLine {
                    product_id: foreign_product,
                    quantity: 1,
                }]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_status_override_any_to_any() {
        let f = fixture().await;
        let product_id = seed_product(&f, "OVR-1", 1000, 5, 1).await;

        let result = f
            .db
            .checkout()
            .create_transaction(
                &f.store_id,
                &f.user_id,
                &cash_command(vec![CartLine {
                    product_id,
                    quantity: 1,
                }]),
            )
            .await
            .unwrap();
        let id = result.transaction.id;

        // completed → refunded → pending: all permitted.
        let t = f
            .db
            .checkout()
            .update_status(&f.store_id, &id, TransactionStatus::Refunded)
            .await
            .unwrap();
        assert_eq!(t.status, TransactionStatus::Refunded);

        let t = f
            .db
            .checkout()
            .update_status(&f.store_id, &id, TransactionStatus::Pending)
            .await
            .unwrap();
        assert_eq!(t.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_webhook_status_update_is_idempotent() {
        let f = fixture().await;
        let product_id = seed_product(&f, "WHK-1", 1000, 5, 1).await;

        let mut command = cash_command(vec![CartLine {
            product_id,
            quantity: 1,
        }]);
        command.payment_type = PaymentType::Transfer;

        let result = f
            .db
            .checkout()
            .create_transaction(&f.store_id, &f.user_id, &command)
            .await
            .unwrap();
        let id = result.transaction.id;

        let repo = f.db.checkout();
        assert!(repo
            .update_status_by_order_id(&id, TransactionStatus::Completed)
            .await
            .unwrap());
        // Second delivery of the same notification: same outcome, no error.
        assert!(repo
            .update_status_by_order_id(&id, TransactionStatus::Completed)
            .await
            .unwrap());

        let t = repo.get_by_id(&f.store_id, &id).await.unwrap().unwrap();
        assert_eq!(t.transaction.status, TransactionStatus::Completed);

        // Unknown order id: matched = false, not an error.
        assert!(!repo
            .update_status_by_order_id("no-such-id", TransactionStatus::Completed)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_and_pagination() {
        let f = fixture().await;
        let product_id = seed_product(&f, "LST-1", 1000, 100, 1).await;

        for i in 0..3 {
            let mut command = cash_command(vec![CartLine {
                product_id: product_id.clone(),
                quantity: 1,
            }]);
            if i == 0 {
                command.payment_type = PaymentType::Card;
            }
            f.db.checkout()
                .create_transaction(&f.store_id, &f.user_id, &command)
                .await
                .unwrap();
        }

        let all = f
            .db
            .checkout()
            .list(&f.store_id, &TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);

        let pending_only = f
            .db
            .checkout()
            .list(
                &f.store_id,
                &TransactionFilter {
                    status: Some(TransactionStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(pending_only.pagination.total, 1);
        assert_eq!(pending_only.data[0].payment_type, PaymentType::Card);

        let paged = f
            .db
            .checkout()
            .list(
                &f.store_id,
                &TransactionFilter {
                    limit: Some(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(paged.data.len(), 2);
        assert_eq!(paged.pagination.total_pages, 2);
    }

    #[test]
    fn test_base36_encoding() {
        assert_eq!(to_base36_upper(0), "0");
        assert_eq!(to_base36_upper(35), "Z");
        assert_eq!(to_base36_upper(36), "10");
    }

    #[test]
    fn test_transaction_number_shape() {
        let n = generate_transaction_number();
        assert!(n.starts_with("TRX-"));
        assert!(n[4..].chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
