//! Dashboard and reporting endpoints.
//!
//! Every handler here resolves the principal's store first: the store row
//! carries the UTC offset that anchors local-midnight day boundaries.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use brioche_core::reporting::trailing_days_window;
use brioche_db::{BestSeller, DashboardStats, ReportsStats, SalesChartPoint};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::AppState;

/// `GET /api/dashboard/stats` - today vs yesterday headline numbers.
pub async fn stats(
    State(state): State<AppState>,
    Auth(principal): Auth,
) -> Result<Json<DashboardStats>, ApiError> {
    let store = state.db.stores().require(&principal.store_id).await?;
    let stats = state.db.reporting().dashboard_stats(&store).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Number of trailing local days. Defaults to 7.
    pub days: Option<u32>,
}

/// `GET /api/dashboard/sales-chart` - zero-filled daily revenue series.
pub async fn sales_chart(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<SalesChartPoint>>, ApiError> {
    let days = query.days.unwrap_or(7).clamp(1, 90);

    let store = state.db.stores().require(&principal.store_id).await?;
    let chart = state.db.reporting().sales_chart(&store, days).await?;
    Ok(Json(chart))
}

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// `GET /api/dashboard/reports-stats` - period report with deltas against
/// the preceding window of equal length.
///
/// Both bounds are required; the window is inclusive on both ends.
pub async fn reports_stats(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ReportsStats>, ApiError> {
    let start = query
        .start_date
        .ok_or_else(|| ApiError::BadRequest("start_date is required".to_string()))?;
    let end = query
        .end_date
        .ok_or_else(|| ApiError::BadRequest("end_date is required".to_string()))?;

    if end < start {
        return Err(ApiError::BadRequest(
            "end_date must not precede start_date".to_string(),
        ));
    }

    let stats = state
        .db
        .reporting()
        .reports_stats(&principal.store_id, start, end)
        .await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct BestSellingQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Defaults to 5.
    pub limit: Option<i64>,
}

/// `GET /api/dashboard/best-selling` - top products by quantity sold.
///
/// Without an explicit window, covers the trailing 30 local days.
pub async fn best_selling(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(query): Query<BestSellingQuery>,
) -> Result<Json<Vec<BestSeller>>, ApiError> {
    let store = state.db.stores().require(&principal.store_id).await?;

    let (start, end) = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => {
            if end < start {
                return Err(ApiError::BadRequest(
                    "end_date must not precede start_date".to_string(),
                ));
            }
            (start, end)
        }
        _ => {
            let (start, end_exclusive) =
                trailing_days_window(Utc::now(), store.utc_offset_minutes, 30);
            // The repository takes an inclusive upper bound.
            (start, end_exclusive - Duration::milliseconds(1))
        }
    };

    let limit = query.limit.unwrap_or(5);
    let best = state
        .db
        .reporting()
        .best_sellers(&principal.store_id, start, end, limit)
        .await?;
    Ok(Json(best))
}
