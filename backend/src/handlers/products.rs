//! HTTP handlers for product catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use shared::{
    CreateProductInput, PaginatedResponse, Pagination, ProductListQuery, ProductSortKey,
    ProductWithBalance, SortDirection, StockStatus, UpdateProductInput,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::CatalogService;
use crate::AppState;

/// Query string of the product listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    pub search: Option<String>,
    /// Comma-separated statuses, e.g. `OK,ATTN`
    pub status: Option<String>,
    pub sort_by: Option<ProductSortKey>,
    pub sort_dir: Option<SortDirection>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub page_size: Option<u32>,
}

/// List products with balance and status
pub async fn list_products(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListProductsParams>, AppError>,
) -> AppResult<Json<PaginatedResponse<ProductWithBalance>>> {
    let statuses = match params.status.as_deref() {
        Some(raw) => StockStatus::parse_list(raw)
            .map_err(|e| AppError::invalid("status", e.to_string()))?,
        None => Vec::new(),
    };

    let limits = &state.config.pagination;
    let query = ProductListQuery {
        search: params.search,
        statuses,
        sort_by: params.sort_by.unwrap_or_default(),
        sort_dir: params.sort_dir.unwrap_or_default(),
        pagination: Pagination::clamped(
            params.page,
            params.page_size,
            limits.default_product_page_size,
            limits.max_page_size,
        ),
    };

    let service = CatalogService::new(state.db);
    let products = service.list_products(&query).await?;
    Ok(Json(products))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateProductInput>, AppError>,
) -> AppResult<(StatusCode, Json<ProductWithBalance>)> {
    let service = CatalogService::new(state.db);
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product with its balance
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductWithBalance>> {
    let service = CatalogService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateProductInput>, AppError>,
) -> AppResult<Json<ProductWithBalance>> {
    let service = CatalogService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product and its movement history
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = CatalogService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
