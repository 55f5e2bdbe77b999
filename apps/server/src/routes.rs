//! Route table for the `/api` surface.
//!
//! ```text
//! POST   /api/transactions              checkout (atomic)
//! GET    /api/transactions              paginated listing
//! GET    /api/transactions/:id          detail with item snapshots
//! PUT    /api/transactions/:id/status   role-gated status override
//! GET    /api/dashboard/stats           today vs yesterday headline numbers
//! GET    /api/dashboard/sales-chart     zero-filled daily revenue series
//! GET    /api/dashboard/reports-stats   period report with deltas
//! GET    /api/dashboard/best-selling    top products by quantity sold
//! GET    /api/products                  paginated catalog listing
//! POST   /api/products                  create product (admin/manager)
//! PUT    /api/products/:id/stock        direct stock set (admin/manager)
//! POST   /api/payments/session          hosted-checkout session
//! POST   /api/payments/notification     provider webhook (no auth, always 200)
//! ```

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::AppState;

/// Builds the `/api` router. `/health` lives outside this nest.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            post(handlers::transactions::create).get(handlers::transactions::list),
        )
        .route("/transactions/:id", get(handlers::transactions::get))
        .route(
            "/transactions/:id/status",
            put(handlers::transactions::update_status),
        )
        .route("/dashboard/stats", get(handlers::dashboard::stats))
        .route("/dashboard/sales-chart", get(handlers::dashboard::sales_chart))
        .route(
            "/dashboard/reports-stats",
            get(handlers::dashboard::reports_stats),
        )
        .route(
            "/dashboard/best-selling",
            get(handlers::dashboard::best_selling),
        )
        .route(
            "/products",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route("/products/:id/stock", put(handlers::products::update_stock))
        .route("/payments/session", post(handlers::payments::create_session))
        .route(
            "/payments/notification",
            post(handlers::payments::notification),
        )
}

// =============================================================================
// Integration Tests
// =============================================================================
