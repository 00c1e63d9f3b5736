//! HTTP handlers for stock movement endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use shared::{
    MovementDirection, MovementFilter, PaginatedResponse, Pagination, RecordMovementInput,
    StockMovement, ZeroOutResult,
};
use uuid::Uuid;

use super::parse_date_range;
use crate::error::{AppError, AppResult};
use crate::services::{LedgerService, ProductBalance};
use crate::AppState;

/// Query string of a product's movement history
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMovementsParams {
    #[serde(rename = "type", default, deserialize_with = "super::empty_as_none")]
    pub direction: Option<MovementDirection>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Substring of the note
    pub q: Option<String>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub page_size: Option<u32>,
}

/// List movements of a product, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    WithRejection(Query(params), _): WithRejection<Query<ListMovementsParams>, AppError>,
) -> AppResult<Json<PaginatedResponse<StockMovement>>> {
    let (date_from, date_to) = parse_date_range(params.from.as_deref(), params.to.as_deref())?;
    let filter = MovementFilter {
        direction: params.direction,
        date_from,
        date_to,
        note_contains: params.q,
    };

    let limits = &state.config.pagination;
    let pagination = Pagination::clamped(
        params.page,
        params.page_size,
        limits.default_movement_page_size,
        limits.max_page_size,
    );

    let service = LedgerService::new(state.db);
    let movements = service.list_movements(product_id, &filter, pagination).await?;
    Ok(Json(movements))
}

/// Record an IN or OUT movement
pub async fn record_movement(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    WithRejection(Json(input), _): WithRejection<Json<RecordMovementInput>, AppError>,
) -> AppResult<(StatusCode, Json<StockMovement>)> {
    let service = LedgerService::new(state.db);
    let movement = service.record_movement(product_id, input).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// Get the current balance of a product
pub async fn get_balance(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductBalance>> {
    let service = LedgerService::new(state.db);
    let balance = service.compute_balance(product_id).await?;
    Ok(Json(balance))
}

/// Bring a product's balance to zero
pub async fn zero_out(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ZeroOutResult>> {
    let service = LedgerService::new(state.db);
    let result = service.zero_out(product_id).await?;
    Ok(Json(result))
}
