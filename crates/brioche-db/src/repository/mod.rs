//! # Repository Module
//!
//! Repository implementations, one per aggregate:
//!
//! - [`store`] - Tenant registry (create, lookup, invite-code join)
//! - [`product`] - Catalog operations and stock mutation
//! - [`checkout`] - The Checkout Engine: atomic transaction creation,
//!   status updates, listing
//! - [`reporting`] - The Reporting Engine: dashboard and period aggregates
//!
//! ## Repository Pattern
//! Each repository wraps a clone of the shared `SqlitePool` and exposes
//! async operations returning `DbResult`. Repositories are cheap to create;
//! `Database` hands out a fresh one per call.

use serde::Serialize;

pub mod checkout;
pub mod product;
pub mod reporting;
pub mod store;

/// Pagination metadata attached to every listing response.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Builds pagination metadata; `total_pages` rounds up and is at least 1.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            (total + limit - 1) / limit
        };
        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A page of rows plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
