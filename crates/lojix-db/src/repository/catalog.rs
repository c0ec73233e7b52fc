//! # Catalog Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Lookup by id, internal code, or barcode (reconciliation match keys)
//! - CRUD operations
//! - Delta stock adjustments
//!
//! ## Reconciliation Lookups
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How Invoice Lines Find Products                        │
//! │                                                                         │
//! │  Invoice line { code: "P-042", barcode: "78912..." }                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1st: get_by_internal_code("P-042")     ← supplier's product code      │
//! │       │ miss                                                            │
//! │       ▼                                                                 │
//! │  2nd: get_by_barcode("78912...")        ← EAN/GTIN                     │
//! │       │ miss                                                            │
//! │       ▼                                                                 │
//! │  No match → reconciler creates a new product                           │
//! │                                                                         │
//! │  Both lookups hit single-column indexes: <1ms at catalog scale         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lojix_core::Product;

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// let product = repo.get_by_barcode("7891234567895").await?;
/// repo.adjust_stock(&product.id, -3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, internal_code, barcode, fiscal_code,
                   price_cents, cost_cents, stock, supplier, unit,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its internal code (the supplier-facing product code).
    pub async fn get_by_internal_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, internal_code, barcode, fiscal_code,
                   price_cents, cost_cents, stock, supplier, unit,
                   created_at, updated_at
            FROM products
            WHERE internal_code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by barcode.
    ///
    /// Callers must never pass the "SEM GTIN" placeholder here; normalize
    /// invoice barcodes first (see `lojix_core::invoice::normalize_barcode`).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, internal_code, barcode, fiscal_code,
                   price_cents, cost_cents, stock, supplier, unit,
                   created_at, updated_at
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, internal_code, barcode, fiscal_code,
                price_cents, cost_cents, stock, supplier, unit,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.internal_code)
        .bind(&product.barcode)
        .bind(&product.fiscal_code)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(product.stock)
        .bind(&product.supplier)
        .bind(&product.unit)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's descriptive fields and cost.
    ///
    /// Stock is NOT written here; stock only ever moves through
    /// [`adjust_stock`](Self::adjust_stock) so concurrent movements never
    /// overwrite each other.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                internal_code = ?3,
                barcode = ?4,
                fiscal_code = ?5,
                price_cents = ?6,
                cost_cents = ?7,
                supplier = ?8,
                unit = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.internal_code)
        .bind(&product.barcode)
        .bind(&product.fiscal_code)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(&product.supplier)
        .bind(&product.unit)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts product stock by a delta.
    ///
    /// ## Delta Pattern
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │                    Stock Update Strategy                            │
    /// │                                                                     │
    /// │  ❌ WRONG: Absolute update (loses concurrent movements)            │
    /// │     UPDATE products SET stock = 7 WHERE id = ?                     │
    /// │                                                                     │
    /// │  ✅ CORRECT: Delta update                                          │
    /// │     UPDATE products SET stock = stock - 3                          │
    /// │                                                                     │
    /// │  Order placement: sells 3    → stock - 3                           │
    /// │  Invoice import:  receives 10 → stock + 10                         │
    /// │  Both commute: the final stock is right in either order            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Stock may go negative; overselling is a business signal surfaced by
    /// the dashboard, not a constraint the database enforces.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for sales, positive for receiving)
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Lists all products sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, internal_code, barcode, fiscal_code,
                   price_cents, cost_cents, stock, supplier, unit,
                   created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists products whose stock is strictly below the threshold.
    ///
    /// The dashboard's restock alert uses threshold 5.
    pub async fn list_low_stock(&self, threshold: i64, limit: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, internal_code, barcode, fiscal_code,
                   price_cents, cost_cents, stock, supplier, unit,
                   created_at, updated_at
            FROM products
            WHERE stock < ?1
            ORDER BY stock ASC, name
            LIMIT ?2
            "#,
        )
        .bind(threshold)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
