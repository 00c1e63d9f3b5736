//! Catalog service: product master data and status-aware listings

use shared::catalog;
use shared::ledger::StockTotals;
use shared::validation::{normalize_optional_text, validate_required_text};
use shared::{
    CreateProductInput, MovementDirection, PaginatedResponse, Product, ProductListQuery,
    ProductWithBalance, UpdateProductInput,
};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::ledger::{insert_movement, totals_for};
use crate::error::{AppError, AppResult};

/// Note attached to the IN movement that seeds a new product
pub const INITIAL_STOCK_NOTE: &str = "Initial stock";

/// Catalog service for managing products
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Row for product + derived balance queries
#[derive(Debug, FromRow)]
struct ProductBalanceRow {
    #[sqlx(flatten)]
    product: Product,
    balance: i64,
}

impl From<ProductBalanceRow> for ProductWithBalance {
    fn from(row: ProductBalanceRow) -> Self {
        ProductWithBalance::new(row.product, row.balance)
    }
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product, optionally seeding its ledger with an IN movement.
    ///
    /// Both writes share one transaction: a failed seed leaves no product.
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<ProductWithBalance> {
        input.validate()?;
        let name = required_text("name", &input.name)?;
        let sku = required_text("sku", &input.sku)?;
        let description = normalize_optional_text(input.description.as_deref());
        let initial_stock = input.initial_stock.unwrap_or(0);

        let mut tx = self.db.begin().await?;

        if sku_in_use(&mut tx, &sku, None).await? {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, sku, description, min_stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, sku, description, min_stock, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&sku)
        .bind(&description)
        .bind(input.min_stock)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sku_conflict)?;

        let mut totals = StockTotals::default();
        if initial_stock > 0 {
            totals.apply(MovementDirection::In, initial_stock)?;
            insert_movement(
                &mut tx,
                product.id,
                MovementDirection::In,
                initial_stock,
                None,
                Some(INITIAL_STOCK_NOTE.to_string()),
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Created product {} (sku {}, initial stock {})",
            product.id,
            product.sku,
            initial_stock
        );

        Ok(ProductWithBalance::new(product, totals.balance()))
    }

    /// Get a product with its current balance and status
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<ProductWithBalance> {
        let row = sqlx::query_as::<_, ProductBalanceRow>(
            r#"
            SELECT p.id, p.name, p.sku, p.description, p.min_stock, p.created_at, p.updated_at,
                   COALESCE(SUM(CASE WHEN m.direction = 'IN' THEN m.quantity::BIGINT
                                     ELSE -m.quantity::BIGINT END), 0)::BIGINT AS balance
            FROM products p
            LEFT JOIN stock_movements m ON m.product_id = p.id
            WHERE p.id = $1
            GROUP BY p.id
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Apply a partial update to a product
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<ProductWithBalance> {
        input.validate()?;
        if let Some(name) = &input.name {
            required_text("name", name)?;
        }
        if let Some(sku) = &input.sku {
            required_text("sku", sku)?;
        }

        let mut tx = self.db.begin().await?;

        let mut product = lock_product(&mut tx, product_id).await?;

        if let Some(sku) = input.sku.as_deref().map(str::trim) {
            if sku != product.sku && sku_in_use(&mut tx, sku, Some(product_id)).await? {
                return Err(AppError::DuplicateEntry("sku".to_string()));
            }
        }

        input.apply_to(&mut product);
        product.description = normalize_optional_text(product.description.as_deref());

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, sku = $2, description = $3, min_stock = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, sku, description, min_stock, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.description)
        .bind(product.min_stock)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sku_conflict)?;

        let totals = totals_for(&mut tx, product_id).await?;
        tx.commit().await?;

        Ok(ProductWithBalance::new(updated, totals.balance()))
    }

    /// Delete a product together with its movements, all or nothing
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        lock_product(&mut tx, product_id).await?;

        let movements = sqlx::query("DELETE FROM stock_movements WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Deleted product {} and {} movements", product_id, movements);
        Ok(())
    }

    /// List products filtered by search term and status, sorted and paged
    pub async fn list_products(
        &self,
        query: &ProductListQuery,
    ) -> AppResult<PaginatedResponse<ProductWithBalance>> {
        let rows = sqlx::query_as::<_, ProductBalanceRow>(
            r#"
            SELECT p.id, p.name, p.sku, p.description, p.min_stock, p.created_at, p.updated_at,
                   COALESCE(b.balance, 0)::BIGINT AS balance
            FROM products p
            LEFT JOIN (
                SELECT product_id,
                       SUM(CASE WHEN direction = 'IN' THEN quantity::BIGINT
                                ELSE -quantity::BIGINT END) AS balance
                FROM stock_movements
                GROUP BY product_id
            ) b ON b.product_id = p.id
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let products = rows.into_iter().map(ProductWithBalance::from).collect();
        Ok(catalog::list_products(products, query))
    }
}

/// Fetch a product and hold its row lock until the transaction ends.
///
/// Every ledger write for a product goes through this lock, so balance
/// checks and inserts for the same product never interleave.
pub(crate) async fn lock_product(conn: &mut PgConnection, product_id: Uuid) -> AppResult<Product> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, sku, description, min_stock, created_at, updated_at
        FROM products
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Product".to_string()))
}

/// Whether a SKU (exact match) belongs to a product other than `except`
async fn sku_in_use(conn: &mut PgConnection, sku: &str, except: Option<Uuid>) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1 AND ($2::UUID IS NULL OR id <> $2))",
    )
    .bind(sku)
    .bind(except)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

/// A concurrent insert can still hit the unique index after the EXISTS check
fn map_sku_conflict(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::DuplicateEntry("sku".to_string())
        }
        _ => AppError::DatabaseError(err),
    }
}

fn required_text(field: &str, value: &str) -> AppResult<String> {
    validate_required_text(value).map_err(|msg| AppError::invalid(field, msg))?;
    Ok(value.trim().to_string())
}
