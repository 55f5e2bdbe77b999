//! # Store Repository
//!
//! Tenant registry operations: store creation, lookup, invite-code joins,
//! and the users that belong to a store.
//!
//! Every other repository takes `store_id` as an explicit scope argument;
//! this one is where those ids come from.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use brioche_core::{Role, Store, User};

/// Repository for store and user operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Creates a new store.
    ///
    /// `utc_offset_minutes` drives local-midnight reporting math; the IANA
    /// `timezone` label is display-only.
    pub async fn create_store(
        &self,
        name: &str,
        currency: &str,
        timezone: &str,
        utc_offset_minutes: i32,
    ) -> DbResult<Store> {
        let now = Utc::now();
        let store = Store {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
            timezone: timezone.to_string(),
            utc_offset_minutes,
            invite_code: None,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %store.id, name = %store.name, "Creating store");

        sqlx::query(
            r#"
            INSERT INTO stores (
                id, name, currency, timezone, utc_offset_minutes,
                invite_code, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.currency)
        .bind(&store.timezone)
        .bind(store.utc_offset_minutes)
        .bind(&store.invite_code)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(store)
    }

    /// Gets a store by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, currency, timezone, utc_offset_minutes,
                   invite_code, created_at, updated_at
            FROM stores
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Gets a store by ID, failing with NotFound when absent.
    pub async fn require(&self, id: &str) -> DbResult<Store> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Store", id))
    }

    /// Gets a store by its invite code.
    pub async fn get_by_invite_code(&self, code: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            r#"
            SELECT id, name, currency, timezone, utc_offset_minutes,
                   invite_code, created_at, updated_at
            FROM stores
            WHERE invite_code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Sets (or rotates) a store's invite code.
    pub async fn set_invite_code(&self, store_id: &str, code: Option<&str>) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE stores SET invite_code = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(store_id)
        .bind(code)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", store_id));
        }

        Ok(())
    }

    /// Creates a user inside a store.
    pub async fn create_user(&self, store_id: &str, name: &str, role: Role) -> DbResult<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            name: name.to_string(),
            role,
            created_at: Utc::now(),
        };

        debug!(id = %user.id, store_id = %store_id, role = %role.as_str(), "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (id, store_id, name, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.store_id)
        .bind(&user.name)
        .bind(user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID, scoped to a store.
    pub async fn get_user(&self, store_id: &str, user_id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, store_id, name, role, created_at
            FROM users
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(user_id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
