//! # brioche-db: Database Layer for Brioche POS
//!
//! This crate provides persistence for the checkout and reporting engines.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Brioche POS Data Flow                             │
//! │                                                                         │
//! │  axum handler (POST /api/transactions)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    brioche-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ StoreRepo     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ CheckoutRepo  │    │ ...          │  │   │
//! │  │   │ Management    │    │ ReportingRepo │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (store, product, checkout,
//!   reporting)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brioche_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/brioche.db");
//! let db = Database::new(config).await?;
//!
//! let txn = db.checkout().create_transaction(&store, user_id, command).await?;
//! let stats = db.reporting().dashboard_stats(&store).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::checkout::{CheckoutError, CheckoutRepository, TransactionFilter};
pub use repository::product::{CatalogError, NewProduct, ProductFilter, ProductRepository};
pub use repository::reporting::{
    BestSeller, DashboardStats, ReportingRepository, ReportsStats, SalesChartPoint,
};
pub use repository::store::StoreRepository;
pub use repository::{Page, Pagination};
