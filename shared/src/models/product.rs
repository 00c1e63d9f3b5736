//! Product catalog models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::{Pagination, SortDirection};

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Unique across products, compared exactly (case-sensitive)
    pub sku: String,
    pub description: Option<String>,
    /// Threshold below which a product needs attention
    pub min_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock status derived from balance and minimum stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    /// Balance at or above the minimum
    Ok,
    /// Some stock left, but below the minimum
    Attn,
    /// Nothing left
    Out,
}

impl StockStatus {
    /// Classify a balance against a minimum-stock threshold.
    ///
    /// A zero balance is always `Out`, even when the threshold is zero.
    pub fn classify(balance: i64, min_stock: i32) -> Self {
        if balance <= 0 {
            StockStatus::Out
        } else if balance < i64::from(min_stock) {
            StockStatus::Attn
        } else {
            StockStatus::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Ok => "OK",
            StockStatus::Attn => "ATTN",
            StockStatus::Out => "OUT",
        }
    }

    /// Parse a comma-separated status filter such as `"OK,ATTN"`.
    ///
    /// Empty segments are ignored, duplicates collapse.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, ParseStatusError> {
        let mut statuses = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let status = part.parse::<StockStatus>()?;
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        Ok(statuses)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status name in a filter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stock status '{0}' (expected OK, ATTN or OUT)")]
pub struct ParseStatusError(pub String);

impl FromStr for StockStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OK" => Ok(StockStatus::Ok),
            "ATTN" => Ok(StockStatus::Attn),
            "OUT" => Ok(StockStatus::Out),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Product together with its derived balance and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithBalance {
    #[serde(flatten)]
    pub product: Product,
    pub balance: i64,
    pub status: StockStatus,
}

impl ProductWithBalance {
    pub fn new(product: Product, balance: i64) -> Self {
        let status = StockStatus::classify(balance, product.min_stock);
        Self {
            product,
            balance,
            status,
        }
    }
}

/// Input for creating a product
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "SKU is required"))]
    pub sku: String,
    pub description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: i32,
    /// Seeds the ledger with one IN movement when positive
    #[validate(range(min = 0, message = "Initial stock cannot be negative"))]
    pub initial_stock: Option<i32>,
}

/// Partial update of a product. Absent fields are left untouched;
/// `description: null` clears the description.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "SKU cannot be empty"))]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    pub min_stock: Option<i32>,
}

impl UpdateProductInput {
    /// Apply the present fields on top of an existing product
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.trim().to_string();
        }
        if let Some(sku) = &self.sku {
            product.sku = sku.trim().to_string();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(min_stock) = self.min_stock {
            product.min_stock = min_stock;
        }
    }
}

/// Distinguishes a field sent as `null` (Some(None)) from an absent one (None)
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Sortable columns of the product listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSortKey {
    #[default]
    Name,
    Sku,
    /// Derived balance, not a stored column
    Balance,
}

/// Everything that shapes a product listing
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub search: Option<String>,
    /// Empty means every status
    pub statuses: Vec<StockStatus>,
    pub sort_by: ProductSortKey,
    pub sort_dir: SortDirection,
    pub pagination: Pagination,
}

/// Product identity echoed back by quick-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
        }
    }
}
