//! Catalog endpoints: product listing, creation, direct stock updates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use brioche_core::validation::validate_uuid;
use brioche_core::Product;
use brioche_db::{NewProduct, Page, ProductFilter};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::AppState;

/// `GET /api/products` - paginated active products, optionally filtered by
/// stock status.
pub async fn list(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Page<Product>>, ApiError> {
    let page = state.db.products().list(&principal.store_id, &filter).await?;
    Ok(Json(page))
}

/// `POST /api/products` - creates a product. Admins and managers only.
pub async fn create(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    if !principal.role.can_manage_catalog() {
        return Err(ApiError::Forbidden(format!(
            "Role {} may not manage the catalog",
            principal.role.as_str()
        )));
    }

    let product = state.db.products().create(&principal.store_id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Body for the direct stock update.
#[derive(Debug, Deserialize)]
pub struct StockBody {
    pub stock: i64,
}

/// `PUT /api/products/:id/stock` - sets a product's stock outright
/// (deliveries, stocktake corrections). Admins and managers only.
pub async fn update_stock(
    State(state): State<AppState>,
    Auth(principal): Auth,
    Path(id): Path<String>,
    Json(body): Json<StockBody>,
) -> Result<Json<Product>, ApiError> {
    validate_uuid(&id)?;

    if !principal.role.can_manage_catalog() {
        return Err(ApiError::Forbidden(format!(
            "Role {} may not manage the catalog",
            principal.role.as_str()
        )));
    }

    let product = state
        .db
        .products()
        .update_stock(&principal.store_id, &id, body.stock)
        .await?;
    Ok(Json(product))
}
