//! Route definitions for the SimpleStock API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/products", product_routes())
        .nest("/quick-out", quick_out_routes())
}

/// Product catalog and per-product ledger routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .patch(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/balance", get(handlers::get_balance))
        .route(
            "/:product_id/movements",
            get(handlers::list_movements).post(handlers::record_movement),
        )
        .route("/:product_id/zero-out", post(handlers::zero_out))
}

/// Quick-out routes
fn quick_out_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::quick_out))
        .route("/history", get(handlers::quick_out_history))
}
