//! HTTP handlers for quick-out endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use shared::{
    PaginatedResponse, Pagination, QuickOutHistoryItem, QuickOutHistoryQuery, QuickOutInput,
    QuickOutResult,
};

use super::parse_date_range;
use crate::error::{AppError, AppResult};
use crate::services::LedgerService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickOutHistoryParams {
    pub q: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub page_size: Option<u32>,
}

/// Record an OUT movement in one step
pub async fn quick_out(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<QuickOutInput>, AppError>,
) -> AppResult<Json<QuickOutResult>> {
    let service = LedgerService::new(state.db);
    let result = service.quick_out(input).await?;
    Ok(Json(result))
}

/// Recent OUT movements across all products
pub async fn quick_out_history(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<QuickOutHistoryParams>, AppError>,
) -> AppResult<Json<PaginatedResponse<QuickOutHistoryItem>>> {
    let (date_from, date_to) = parse_date_range(params.from.as_deref(), params.to.as_deref())?;

    let limits = &state.config.pagination;
    let query = QuickOutHistoryQuery {
        search: params.q,
        date_from,
        date_to,
        pagination: Pagination::clamped(
            params.page,
            params.page_size,
            limits.default_movement_page_size,
            limits.max_page_size,
        ),
    };

    let service = LedgerService::new(state.db);
    let history = service.quick_out_history(&query).await?;
    Ok(Json(history))
}
