//! # Product Repository
//!
//! Catalog operations the engines need: create, lookup, filtered listing,
//! and direct stock edits.
//!
//! ## The stock_status Invariant
//! `stock_status` is a cached projection of `(stock, min_stock_alert)`.
//! Every write path that touches `stock` re-derives it in the same statement:
//!
//! - [`ProductRepository::create`] derives it before the INSERT
//! - [`ProductRepository::update_stock`] derives it before the UPDATE
//! - the checkout decrement re-derives it in SQL (see `checkout.rs`)

use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use thiserror::Error;

use crate::error::{DbError, DbResult};
use crate::repository::{Page, Pagination};
use brioche_core::validation::{
    validate_price_cents, validate_product_name, validate_sku, validate_stock_level,
};
use brioche_core::{derive_stock_status, Category, Product, StockStatus, ValidationError};

/// Business outcomes of catalog operations.
///
/// Splits "the client did something wrong" from "the database failed" so the
/// API layer can map to 400/404 vs 500 without string matching.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Db(DbError::from(err))
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub category_id: Option<String>,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub cost_price_cents: Option<i64>,
    pub selling_price_cents: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock_alert: i64,
}

fn default_unit() -> String {
    "pcs".to_string()
}

/// Filters for the catalog listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub stock_status: Option<StockStatus>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Repository for product catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product with a derived stock status.
    pub async fn create(&self, store_id: &str, input: NewProduct) -> Result<Product, CatalogError> {
        validate_product_name(&input.name)?;
        validate_sku(&input.sku)?;
        validate_price_cents(input.selling_price_cents)?;
        if let Some(cost) = input.cost_price_cents {
            validate_price_cents(cost)?;
        }
        validate_stock_level(input.stock)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            category_id: input.category_id,
            name: input.name.trim().to_string(),
            sku: input.sku.trim().to_string(),
            barcode: input.barcode,
            cost_price_cents: input.cost_price_cents,
            selling_price_cents: input.selling_price_cents,
            unit: input.unit,
            stock: input.stock,
            min_stock_alert: input.min_stock_alert,
            stock_status: derive_stock_status(input.stock, input.min_stock_alert),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, sku = %product.sku, "Creating product");

        self.insert(&product).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => CatalogError::Validation(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: product.sku.clone(),
            }),
            other => CatalogError::Db(other),
        })?;

        Ok(product)
    }

    /// Inserts a fully-formed product row. Used by `create` and the seeder.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, store_id, category_id, name, sku, barcode,
                cost_price_cents, selling_price_cents, unit,
                stock, min_stock_alert, stock_status, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&product.id)
        .bind(&product.store_id)
        .bind(&product.category_id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.barcode)
        .bind(product.cost_price_cents)
        .bind(product.selling_price_cents)
        .bind(&product.unit)
        .bind(product.stock)
        .bind(product.min_stock_alert)
        .bind(product.stock_status)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID, scoped to a store. Includes inactive rows;
    /// callers that need active-only (checkout) filter on `is_active`.
    pub async fn get_by_id(&self, store_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, store_id, category_id, name, sku, barcode,
                   cost_price_cents, selling_price_cents, unit,
                   stock, min_stock_alert, stock_status, is_active,
                   created_at, updated_at
            FROM products
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products with optional stock-status filter, paginated,
    /// newest first.
    pub async fn list(&self, store_id: &str, filter: &ProductFilter) -> DbResult<Page<Product>> {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter.limit.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * limit;

        let (total, data) = match filter.stock_status {
            Some(status) => {
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM products
                     WHERE store_id = ?1 AND is_active = 1 AND stock_status = ?2",
                )
                .bind(store_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await?;

                let data = sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, store_id, category_id, name, sku, barcode,
                           cost_price_cents, selling_price_cents, unit,
                           stock, min_stock_alert, stock_status, is_active,
                           created_at, updated_at
                    FROM products
                    WHERE store_id = ?1 AND is_active = 1 AND stock_status = ?2
                    ORDER BY created_at DESC
                    LIMIT ?3 OFFSET ?4
                    "#,
                )
                .bind(store_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                (total, data)
            }
            None => {
                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM products WHERE store_id = ?1 AND is_active = 1",
                )
                .bind(store_id)
                .fetch_one(&self.pool)
                .await?;

                let data = sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, store_id, category_id, name, sku, barcode,
                           cost_price_cents, selling_price_cents, unit,
                           stock, min_stock_alert, stock_status, is_active,
                           created_at, updated_at
                    FROM products
                    WHERE store_id = ?1 AND is_active = 1
                    ORDER BY created_at DESC
                    LIMIT ?2 OFFSET ?3
                    "#,
                )
                .bind(store_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                (total, data)
            }
        };

        Ok(Page {
            data,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Creates a category. Products opt in through their `category_id`.
    pub async fn create_category(
        &self,
        store_id: &str,
        name: &str,
    ) -> Result<Category, CatalogError> {
        validate_product_name(name)?;

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %category.id, name = %category.name, "Creating category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, store_id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&category.id)
        .bind(&category.store_id)
        .bind(&category.name)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(category)
    }

    /// Directly sets a product's stock, re-deriving the stock status.
    ///
    /// Returns the updated product.
    pub async fn update_stock(
        &self,
        store_id: &str,
        id: &str,
        new_stock: i64,
    ) -> Result<Product, CatalogError> {
        validate_stock_level(new_stock)?;

        let now = Utc::now();

        debug!(id = %id, new_stock, "Direct stock update");

        // min_stock_alert lives on the row, so derive in SQL with the same
        // CASE the checkout decrement uses.
        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = ?3,
                stock_status = CASE
                    WHEN ?3 <= 0 THEN 'out_of_stock'
                    WHEN ?3 <= min_stock_alert THEN 'low_stock'
                    ELSE 'in_stock'
                END,
                updated_at = ?4
            WHERE id = ?1 AND store_id = ?2 AND is_active = 1
            "#,
        )
        .bind(id)
        .bind(store_id)
        .bind(new_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        self.get_by_id(store_id, id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .create_store("Test", "USD", "UTC", 0)
            .await
            .unwrap();
        (db, store.id)
    }

    fn new_product(sku: &str, stock: i64, alert: i64) -> NewProduct {
        NewProduct {
            category_id: None,
            name: format!("Product {}", sku),
            sku: sku.to_string(),
            barcode: None,
            cost_price_cents: Some(300),
            selling_price_cents: 1000,
            unit: "pcs".to_string(),
            stock,
            min_stock_alert: alert,
        }
    }

    #[tokio::test]
    async fn test_create_derives_status() {
        let (db, store_id) = test_db().await;
        let repo = db.products();

        let p = repo.create(&store_id, new_product("A-1", 10, 2)).await.unwrap();
        assert_eq!(p.stock_status, StockStatus::InStock);

        let p = repo.create(&store_id, new_product("A-2", 2, 2)).await.unwrap();
        assert_eq!(p.stock_status, StockStatus::LowStock);

        let p = repo.create(&store_id, new_product("A-3", 0, 2)).await.unwrap();
        assert_eq!(p.stock_status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let (db, store_id) = test_db().await;
        let repo = db.products();

        repo.create(&store_id, new_product("DUP-1", 5, 1)).await.unwrap();
        let err = repo
            .create(&store_id, new_product("DUP-1", 5, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_stock_rederives_status() {
        let (db, store_id) = test_db().await;
        let repo = db.products();

        let p = repo.create(&store_id, new_product("S-1", 10, 3)).await.unwrap();

        let updated = repo.update_stock(&store_id, &p.id, 3).await.unwrap();
        assert_eq!(updated.stock, 3);
        assert_eq!(updated.stock_status, StockStatus::LowStock);
        assert_eq!(
            updated.stock_status,
            derive_stock_status(updated.stock, updated.min_stock_alert)
        );

        let updated = repo.update_stock(&store_id, &p.id, 0).await.unwrap();
        assert_eq!(updated.stock_status, StockStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_update_stock_wrong_store_is_not_found() {
        let (db, store_id) = test_db().await;
        let other = db
            .stores()
            .create_store("Other", "USD", "UTC", 0)
            .await
            .unwrap();
        let repo = db.products();

        let p = repo.create(&store_id, new_product("X-1", 5, 1)).await.unwrap();
        let err = repo.update_stock(&other.id, &p.id, 2).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (db, store_id) = test_db().await;
        let repo = db.products();

        repo.create(&store_id, new_product("L-1", 10, 2)).await.unwrap();
        repo.create(&store_id, new_product("L-2", 1, 2)).await.unwrap();
        repo.create(&store_id, new_product("L-3", 0, 2)).await.unwrap();

        let all = repo.list(&store_id, &ProductFilter::default()).await.unwrap();
        assert_eq!(all.pagination.total, 3);

        let low = repo
            .list(
                &store_id,
                &ProductFilter {
                    stock_status: Some(StockStatus::LowStock),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(low.pagination.total, 1);
        assert_eq!(low.data[0].sku, "L-2");
    }
}
