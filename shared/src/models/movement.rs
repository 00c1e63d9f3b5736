//! Stock movement (ledger) models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::ProductSummary;
use crate::types::Pagination;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "movement_direction", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementDirection {
    /// Increases the balance
    In,
    /// Decreases the balance
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "IN",
            MovementDirection::Out => "OUT",
        }
    }
}

impl fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(MovementDirection::In),
            "OUT" => Ok(MovementDirection::Out),
            _ => Err(format!("unknown movement type '{}' (expected IN or OUT)", s)),
        }
    }
}

/// An immutable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub direction: MovementDirection,
    /// Always positive; the direction carries the sign
    pub quantity: i32,
    /// Effective date of the movement
    pub date: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a movement
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordMovementInput {
    #[serde(rename = "type")]
    pub direction: MovementDirection,
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i32,
    /// Defaults to the time of recording
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Filters for a product's movement history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementFilter {
    pub direction: Option<MovementDirection>,
    /// Inclusive lower bound on the effective date
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the effective date
    pub date_to: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the note
    pub note_contains: Option<String>,
}

/// Page request for the quick-out history
#[derive(Debug, Clone, Default)]
pub struct QuickOutHistoryQuery {
    /// Matched against product name, SKU and note
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub pagination: Pagination,
}

/// Input for a quick out
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuickOutInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i32,
    pub note: Option<String>,
}

/// Result of a quick out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickOutResult {
    pub success: bool,
    pub movement: StockMovement,
    pub new_balance: i64,
    pub product: ProductSummary,
}

/// Result of zeroing out a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZeroOutResult {
    pub product_id: Uuid,
    /// The compensating OUT movement, absent when the balance was already zero
    pub movement: Option<StockMovement>,
    pub balance: i64,
}

/// One line of the quick-out history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct QuickOutHistoryItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i32,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
}
