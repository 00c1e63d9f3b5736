//! Ledger service: append-only stock movements and derived balances

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::catalog::{matches_normalized, normalize_search_text};
use shared::ledger::{default_quick_out_note, zero_out_quantity, StockTotals};
use shared::validation::normalize_optional_text;
use shared::{
    MovementDirection, MovementFilter, PaginatedResponse, Pagination, ProductSummary,
    QuickOutHistoryItem, QuickOutHistoryQuery, QuickOutInput, QuickOutResult,
    RecordMovementInput, StockMovement, StockStatus, ZeroOutResult,
};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::catalog::lock_product;
use crate::error::{AppError, AppResult};

/// Ledger service for recording movements and deriving balances
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// Current balance of a product
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBalance {
    pub product_id: Uuid,
    pub total_in: i64,
    pub total_out: i64,
    pub balance: i64,
    pub min_stock: i32,
    pub status: StockStatus,
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a movement for a product.
    ///
    /// OUT movements are checked against the balance of all existing
    /// movements while the product row is locked; a rejected movement writes
    /// nothing.
    pub async fn record_movement(
        &self,
        product_id: Uuid,
        input: RecordMovementInput,
    ) -> AppResult<StockMovement> {
        input.validate()?;
        let note = normalize_optional_text(input.note.as_deref());

        let mut tx = self.db.begin().await?;

        lock_product(&mut tx, product_id).await?;
        let totals = totals_for(&mut tx, product_id).await?;
        if let Err(err) = totals.check(input.direction, input.quantity) {
            tracing::warn!(
                "Rejected {} of {} for product {}: {}",
                input.direction,
                input.quantity,
                product_id,
                err
            );
            return Err(err.into());
        }

        let movement = insert_movement(
            &mut tx,
            product_id,
            input.direction,
            input.quantity,
            input.date,
            note,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded {} of {} for product {}",
            movement.direction,
            movement.quantity,
            product_id
        );

        Ok(movement)
    }

    /// Compute the balance of a product from its full history
    pub async fn compute_balance(&self, product_id: Uuid) -> AppResult<ProductBalance> {
        let min_stock =
            sqlx::query_scalar::<_, i32>("SELECT min_stock FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let mut conn = self.db.acquire().await?;
        let totals = totals_for(&mut conn, product_id).await?;

        Ok(ProductBalance {
            product_id,
            total_in: totals.total_in,
            total_out: totals.total_out,
            balance: totals.balance(),
            min_stock,
            status: StockStatus::classify(totals.balance(), min_stock),
        })
    }

    /// List a product's movements, newest first
    pub async fn list_movements(
        &self,
        product_id: Uuid,
        filter: &MovementFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<StockMovement>> {
        let product_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let note_pattern = filter
            .note_contains
            .as_deref()
            .and_then(|n| normalize_optional_text(Some(n)))
            .map(|n| format!("%{}%", escape_like(&n)));

        let items = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, direction, quantity, date, note, created_at
            FROM stock_movements
            WHERE product_id = $1
              AND ($2::movement_direction IS NULL OR direction = $2)
              AND ($3::TIMESTAMPTZ IS NULL OR date >= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR date <= $4)
              AND ($5::TEXT IS NULL OR note ILIKE $5)
            ORDER BY date DESC, created_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(product_id)
        .bind(filter.direction)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(&note_pattern)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM stock_movements
            WHERE product_id = $1
              AND ($2::movement_direction IS NULL OR direction = $2)
              AND ($3::TIMESTAMPTZ IS NULL OR date >= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR date <= $4)
              AND ($5::TEXT IS NULL OR note ILIKE $5)
            "#,
        )
        .bind(product_id)
        .bind(filter.direction)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(&note_pattern)
        .fetch_one(&self.db)
        .await?;

        Ok(PaginatedResponse::new(items, total.max(0) as u64, pagination))
    }

    /// Record an OUT movement in one step and report the new balance.
    ///
    /// Also touches the product's `updated_at`.
    pub async fn quick_out(&self, input: QuickOutInput) -> AppResult<QuickOutResult> {
        input.validate()?;
        let note = normalize_optional_text(input.note.as_deref())
            .unwrap_or_else(|| default_quick_out_note(input.quantity));

        let mut tx = self.db.begin().await?;

        let product = lock_product(&mut tx, input.product_id).await?;
        let mut totals = totals_for(&mut tx, input.product_id).await?;
        let new_balance = match totals.apply(MovementDirection::Out, input.quantity) {
            Ok(balance) => balance,
            Err(err) => {
                tracing::warn!("Rejected quick out for product {}: {}", product.id, err);
                return Err(err.into());
            }
        };

        let movement = insert_movement(
            &mut tx,
            product.id,
            MovementDirection::Out,
            input.quantity,
            None,
            Some(note),
        )
        .await?;

        sqlx::query("UPDATE products SET updated_at = NOW() WHERE id = $1")
            .bind(product.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Quick out of {} for product {}, new balance {}",
            input.quantity,
            product.id,
            new_balance
        );

        Ok(QuickOutResult {
            success: true,
            movement,
            new_balance,
            product: ProductSummary::from(&product),
        })
    }

    /// Bring a product's balance to zero with one compensating OUT movement.
    ///
    /// Does nothing when the balance is already zero.
    pub async fn zero_out(&self, product_id: Uuid) -> AppResult<ZeroOutResult> {
        let mut tx = self.db.begin().await?;

        lock_product(&mut tx, product_id).await?;
        let totals = totals_for(&mut tx, product_id).await?;
        let balance = totals.balance();

        let quantity = match zero_out_quantity(balance) {
            Ok(Some(quantity)) => quantity,
            Ok(None) => {
                return Ok(ZeroOutResult {
                    product_id,
                    movement: None,
                    balance,
                });
            }
            Err(err) => {
                tracing::warn!("Cannot zero out product {}: {}", product_id, err);
                return Err(err.into());
            }
        };

        let movement = insert_movement(
            &mut tx,
            product_id,
            MovementDirection::Out,
            quantity,
            None,
            None,
        )
        .await?;

        tx.commit().await?;

        tracing::info!("Zeroed out product {} ({} removed)", product_id, quantity);

        Ok(ZeroOutResult {
            product_id,
            movement: Some(movement),
            balance: balance - i64::from(quantity),
        })
    }

    /// OUT movements across all products, newest first
    pub async fn quick_out_history(
        &self,
        query: &QuickOutHistoryQuery,
    ) -> AppResult<PaginatedResponse<QuickOutHistoryItem>> {
        let rows = sqlx::query_as::<_, QuickOutHistoryItem>(
            r#"
            SELECT m.id, m.product_id, p.name AS product_name, p.sku AS product_sku,
                   m.quantity, m.date, m.note
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            WHERE m.direction = 'OUT'
              AND ($1::TIMESTAMPTZ IS NULL OR m.date >= $1)
              AND ($2::TIMESTAMPTZ IS NULL OR m.date <= $2)
            ORDER BY m.date DESC, m.created_at DESC
            "#,
        )
        .bind(query.date_from)
        .bind(query.date_to)
        .fetch_all(&self.db)
        .await?;

        let term = query
            .search
            .as_deref()
            .map(|s| normalize_search_text(s.trim()))
            .unwrap_or_default();

        let matching: Vec<QuickOutHistoryItem> = rows
            .into_iter()
            .filter(|item| {
                matches_normalized(
                    &term,
                    &[
                        &item.product_name,
                        &item.product_sku,
                        item.note.as_deref().unwrap_or(""),
                    ],
                )
            })
            .collect();

        Ok(PaginatedResponse::from_vec(matching, query.pagination))
    }
}

/// Sum IN and OUT quantities for a product
pub(crate) async fn totals_for(conn: &mut PgConnection, product_id: Uuid) -> AppResult<StockTotals> {
    let (total_in, total_out) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COALESCE(SUM(CASE WHEN direction = 'IN' THEN quantity ELSE 0 END), 0)::BIGINT,
               COALESCE(SUM(CASE WHEN direction = 'OUT' THEN quantity ELSE 0 END), 0)::BIGINT
        FROM stock_movements
        WHERE product_id = $1
        "#,
    )
    .bind(product_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(StockTotals::new(total_in, total_out))
}

/// Append one movement row. Callers have already enforced the ledger rules.
pub(crate) async fn insert_movement(
    conn: &mut PgConnection,
    product_id: Uuid,
    direction: MovementDirection,
    quantity: i32,
    date: Option<DateTime<Utc>>,
    note: Option<String>,
) -> AppResult<StockMovement> {
    let movement = sqlx::query_as::<_, StockMovement>(
        r#"
        INSERT INTO stock_movements (product_id, direction, quantity, date, note)
        VALUES ($1, $2, $3, COALESCE($4, NOW()), $5)
        RETURNING id, product_id, direction, quantity, date, note, created_at
        "#,
    )
    .bind(product_id)
    .bind(direction)
    .bind(quantity)
    .bind(date)
    .bind(&note)
    .fetch_one(&mut *conn)
    .await?;

    Ok(movement)
}

/// Escape LIKE wildcards so user input matches literally
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% off"), "50\\% off");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("plain"), "plain");
    }
}
