//! WebAssembly module for SimpleStock
//!
//! Provides client-side computation for:
//! - Stock status badges
//! - Search-as-you-type over loaded products
//! - Quick-out previews before hitting the API

use shared::catalog;
use shared::ledger::{self, LedgerError, StockTotals};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Status badge (`OK`, `ATTN`, `OUT`) for a balance and minimum stock
#[wasm_bindgen]
pub fn classify_stock_status(balance: f64, min_stock: i32) -> String {
    StockStatus::classify(balance as i64, min_stock).to_string()
}

/// Case- and accent-insensitive match on product name or SKU
#[wasm_bindgen]
pub fn matches_product_search(search: &str, name: &str, sku: &str) -> bool {
    catalog::matches_product_search(search, name, sku)
}

/// Balance after applying a movement, or an error if the ledger refuses it
#[wasm_bindgen]
pub fn balance_after(balance: f64, direction: &str, quantity: i32) -> Result<f64, JsValue> {
    let direction: MovementDirection = direction.parse().map_err(|e: String| JsValue::from_str(&e))?;
    preview_movement(balance as i64, direction, quantity)
        .map(|b| b as f64)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Quantity a zero-out would remove; 0 when there is nothing to remove
#[wasm_bindgen]
pub fn zero_out_quantity(balance: f64) -> Result<i32, JsValue> {
    ledger::zero_out_quantity(balance as i64)
        .map(|quantity| quantity.unwrap_or(0))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Note the server records for a quick out without one
#[wasm_bindgen]
pub fn default_quick_out_note(quantity: i32) -> String {
    ledger::default_quick_out_note(quantity)
}

fn preview_movement(
    balance: i64,
    direction: MovementDirection,
    quantity: i32,
) -> Result<i64, LedgerError> {
    StockTotals::new(balance.max(0), 0).apply(direction, quantity)
}
