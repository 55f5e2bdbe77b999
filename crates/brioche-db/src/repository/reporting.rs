//! # Reporting Repository
//!
//! The Reporting Engine: dashboard snapshot, per-day sales chart, period
//! profit report, and best sellers.
//!
//! ## Ground Rules
//! - Every query is store-scoped and counts `status = 'completed'` only.
//! - Requested report windows `[start, end]` are inclusive on both ends;
//!   the derived comparison window is half-open, ending where the current
//!   one begins.
//! - "Today" and chart buckets follow the store's local midnight, computed
//!   from `utc_offset_minutes`.
//! - Net profit prices cost from the CURRENT product row, so historical
//!   reports shift when cost prices are edited. Known limitation, kept.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use brioche_core::reporting::{
    local_date, local_day_window, percent_change, percent_change_counts, percent_change_or_zero,
    preceding_period, profit_margin, trailing_days_window,
};
use brioche_core::{Money, Store};

// =============================================================================
// Report Shapes
// =============================================================================

/// Today-vs-yesterday snapshot plus catalog counts.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub today_revenue_cents: i64,
    pub yesterday_revenue_cents: i64,
    /// Always a number; zero yesterday reads as 0.0, never NaN/infinity.
    pub revenue_change_percent: f64,
    pub today_transactions: i64,
    pub active_products: i64,
    pub low_stock_count: i64,
    pub active_categories: i64,
}

/// One local calendar day in the sales chart.
#[derive(Debug, Clone, Serialize)]
pub struct SalesChartPoint {
    pub date: NaiveDate,
    pub revenue_cents: i64,
    pub transaction_count: i64,
}

/// Period report with nullable period-over-period deltas.
///
/// Deltas are `None` (serialized `null`) when the comparison period had no
/// completed transactions; consumers must distinguish that from `0`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportsStats {
    pub revenue_cents: i64,
    pub transaction_count: i64,
    pub average_order_value_cents: i64,
    pub net_profit_cents: i64,
    pub profit_margin_percent: Option<f64>,
    pub revenue_change_percent: Option<f64>,
    pub transaction_count_change_percent: Option<f64>,
    pub profit_change_percent: Option<f64>,
}

/// One row of the best-sellers ranking.
#[derive(Debug, Clone, Serialize)]
pub struct BestSeller {
    pub product_id: String,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue_cents: i64,
    pub profit_margin_percent: Option<f64>,
}

// =============================================================================
// Internal row types
// =============================================================================

#[derive(sqlx::FromRow)]
struct RevenueRow {
    revenue_cents: i64,
    transaction_count: i64,
}

#[derive(sqlx::FromRow)]
struct ProfitRow {
    item_revenue_cents: i64,
    cost_cents: i64,
}

#[derive(sqlx::FromRow)]
struct ChartRow {
    created_at: DateTime<Utc>,
    total_cents: i64,
}

#[derive(sqlx::FromRow)]
struct BestSellerRow {
    product_id: String,
    name: String,
    quantity_sold: i64,
    revenue_cents: i64,
    cost_cents: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for reporting aggregates.
#[derive(Debug, Clone)]
pub struct ReportingRepository {
    pool: SqlitePool,
}

impl ReportingRepository {
    /// Creates a new ReportingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportingRepository { pool }
    }

    /// Completed revenue and transaction count in a half-open UTC window.
    async fn revenue_in_window(
        &self,
        store_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<RevenueRow> {
        let row = sqlx::query_as::<_, RevenueRow>(
            r#"
            SELECT COALESCE(SUM(total_cents), 0) AS revenue_cents,
                   COUNT(*) AS transaction_count
            FROM transactions
            WHERE store_id = ?1 AND status = 'completed'
              AND created_at >= ?2 AND created_at < ?3
            "#,
        )
        .bind(store_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Item revenue and live-cost total in a half-open UTC window.
    ///
    /// Cost comes from the current product row (LEFT JOIN, NULL cost = 0),
    /// so deleted products still contribute revenue with zero cost.
    async fn profit_in_window(
        &self,
        store_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<ProfitRow> {
        let row = sqlx::query_as::<_, ProfitRow>(
            r#"
            SELECT COALESCE(SUM(ti.subtotal_cents), 0) AS item_revenue_cents,
                   COALESCE(SUM(COALESCE(p.cost_price_cents, 0) * ti.quantity), 0) AS cost_cents
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            LEFT JOIN products p ON p.id = ti.product_id
            WHERE t.store_id = ?1 AND t.status = 'completed'
              AND t.created_at >= ?2 AND t.created_at < ?3
            "#,
        )
        .bind(store_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Today-vs-yesterday snapshot by the store's local midnight, plus
    /// catalog counts.
    pub async fn dashboard_stats(&self, store: &Store) -> DbResult<DashboardStats> {
        let now = Utc::now();
        let today = local_date(now, store.utc_offset_minutes);
        let (today_start, today_end) = local_day_window(today, store.utc_offset_minutes);
        let (yesterday_start, yesterday_end) =
            local_day_window(today - Duration::days(1), store.utc_offset_minutes);

        let today_row = self
            .revenue_in_window(&store.id, today_start, today_end)
            .await?;
        let yesterday_row = self
            .revenue_in_window(&store.id, yesterday_start, yesterday_end)
            .await?;

        let active_products: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE store_id = ?1 AND is_active = 1",
        )
        .bind(&store.id)
        .fetch_one(&self.pool)
        .await?;

        let low_stock_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products
             WHERE store_id = ?1 AND is_active = 1 AND stock_status = 'low_stock'",
        )
        .bind(&store.id)
        .fetch_one(&self.pool)
        .await?;

        let active_categories: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT category_id) FROM products
             WHERE store_id = ?1 AND is_active = 1 AND category_id IS NOT NULL",
        )
        .bind(&store.id)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            store_id = %store.id,
            today = today_row.revenue_cents,
            yesterday = yesterday_row.revenue_cents,
            "Dashboard stats computed"
        );

        Ok(DashboardStats {
            today_revenue_cents: today_row.revenue_cents,
            yesterday_revenue_cents: yesterday_row.revenue_cents,
            revenue_change_percent: percent_change_or_zero(
                Money::from_cents(today_row.revenue_cents),
                Money::from_cents(yesterday_row.revenue_cents),
            ),
            today_transactions: today_row.transaction_count,
            active_products,
            low_stock_count,
            active_categories,
        })
    }

    /// Per-day revenue and transaction count for the trailing `days` local
    /// calendar days, ascending, zero-filled: every day in the window is
    /// present even with no sales.
    pub async fn sales_chart(&self, store: &Store, days: u32) -> DbResult<Vec<SalesChartPoint>> {
        let days = days.clamp(1, 366);
        let now = Utc::now();
        let (start, end) = trailing_days_window(now, store.utc_offset_minutes, days);

        let rows = sqlx::query_as::<_, ChartRow>(
            r#"
            SELECT created_at, total_cents
            FROM transactions
            WHERE store_id = ?1 AND status = 'completed'
              AND created_at >= ?2 AND created_at < ?3
            "#,
        )
        .bind(&store.id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        // Bucket by local calendar day in Rust; SQLite has no notion of the
        // store's offset.
        let mut buckets: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
        for row in rows {
            let day = local_date(row.created_at, store.utc_offset_minutes);
            let entry = buckets.entry(day).or_insert((0, 0));
            entry.0 += row.total_cents;
            entry.1 += 1;
        }

        let first_day = local_date(start, store.utc_offset_minutes);
        let chart = (0..days as i64)
            .map(|offset| {
                let date = first_day + Duration::days(offset);
                let (revenue_cents, transaction_count) =
                    buckets.get(&date).copied().unwrap_or((0, 0));
                SalesChartPoint {
                    date,
                    revenue_cents,
                    transaction_count,
                }
            })
            .collect();

        Ok(chart)
    }

    /// Period report over inclusive `[start, end]`, with deltas against the
    /// immediately preceding window of equal length.
    pub async fn reports_stats(
        &self,
        store_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<ReportsStats> {
        // The requested window is inclusive; widen the exclusive upper bound
        // by one millisecond so `created_at = end` is counted.
        let end_exclusive = end + Duration::milliseconds(1);
        let (prev_start, prev_end) = preceding_period(start, end_exclusive);

        let current = self.revenue_in_window(store_id, start, end_exclusive).await?;
        let current_profit = self.profit_in_window(store_id, start, end_exclusive).await?;
        let previous = self.revenue_in_window(store_id, prev_start, prev_end).await?;
        let previous_profit = self.profit_in_window(store_id, prev_start, prev_end).await?;

        let revenue = Money::from_cents(current.revenue_cents);
        let net_profit =
            Money::from_cents(current_profit.item_revenue_cents - current_profit.cost_cents);
        let prev_revenue = Money::from_cents(previous.revenue_cents);
        let prev_profit =
            Money::from_cents(previous_profit.item_revenue_cents - previous_profit.cost_cents);

        // A comparison period with zero activity yields null deltas across
        // the board, not zeros.
        let (revenue_delta, count_delta, profit_delta) = if previous.transaction_count == 0 {
            (None, None, None)
        } else {
            (
                percent_change(revenue, prev_revenue),
                percent_change_counts(current.transaction_count, previous.transaction_count),
                percent_change(net_profit, prev_profit),
            )
        };

        let average_order_value_cents = if current.transaction_count == 0 {
            0
        } else {
            current.revenue_cents / current.transaction_count
        };

        Ok(ReportsStats {
            revenue_cents: current.revenue_cents,
            transaction_count: current.transaction_count,
            average_order_value_cents,
            net_profit_cents: net_profit.cents(),
            profit_margin_percent: profit_margin(net_profit, revenue),
            revenue_change_percent: revenue_delta,
            transaction_count_change_percent: count_delta,
            profit_change_percent: profit_delta,
        })
    }

    /// Top products by quantity sold over inclusive `[start, end]`.
    ///
    /// Ordered by quantity, NOT revenue; a cheap item that moves often
    /// outranks an expensive one that doesn't.
    pub async fn best_sellers(
        &self,
        store_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
    ) -> DbResult<Vec<BestSeller>> {
        let limit = limit.clamp(1, 100);
        let end_exclusive = end + Duration::milliseconds(1);

        let rows = sqlx::query_as::<_, BestSellerRow>(
            r#"
            SELECT ti.product_id AS product_id,
                   MAX(ti.name_snapshot) AS name,
                   SUM(ti.quantity) AS quantity_sold,
                   SUM(ti.subtotal_cents) AS revenue_cents,
                   SUM(COALESCE(p.cost_price_cents, 0) * ti.quantity) AS cost_cents
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            LEFT JOIN products p ON p.id = ti.product_id
            WHERE t.store_id = ?1 AND t.status = 'completed'
              AND t.created_at >= ?2 AND t.created_at < ?3
            GROUP BY ti.product_id
            ORDER BY quantity_sold DESC
            LIMIT ?4
            "#,
        )
        .bind(store_id)
        .bind(start)
        .bind(end_exclusive)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let revenue = Money::from_cents(row.revenue_cents);
                let profit = Money::from_cents(row.revenue_cents - row.cost_cents);
                BestSeller {
                    product_id: row.product_id,
                    name: row.name,
                    quantity_sold: row.quantity_sold,
                    revenue_cents: row.revenue_cents,
                    profit_margin_percent: profit_margin(profit, revenue),
                }
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
