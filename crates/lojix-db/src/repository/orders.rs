//! # Order Repository
//!
//! Database operations for customer orders and their line snapshots.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE PENDING                                                     │
//! │     └── insert_order() → Order { status: Pending }                     │
//! │                                                                         │
//! │  2. ADD LINE SNAPSHOTS                                                 │
//! │     └── add_line() → OrderLine (price frozen at order time)            │
//! │     └── update_total() → sum of successfully written lines             │
//! │                                                                         │
//! │  3a. SETTLE                                                            │
//! │      └── try_mark_paid() → Order { status: Paid }                      │
//! │                                                                         │
//! │  3b. CANCEL (manual or expiry sweep)                                   │
//! │      └── try_cancel() → Order { status: Cancelled, cancel_reason }     │
//! │      └── conditional update: only ONE caller ever wins                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lojix_core::{Order, OrderLine};

/// Optional filters for the order history view.
///
/// All fields are independent; `None` means "don't filter on this".
///
/// ## Example
/// ```rust,ignore
/// let filter = OrderHistoryFilter {
///     customer: Some("silva".to_string()),
///     min_total_cents: Some(10_000),
///     ..Default::default()
/// };
/// let orders = repo.search_history(&filter, 50).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderHistoryFilter {
    /// Case-insensitive substring match on customer name.
    pub customer: Option<String>,
    /// Orders created on or after this date.
    pub from_date: Option<NaiveDate>,
    /// Orders created on or before this date.
    pub to_date: Option<NaiveDate>,
    /// Minimum order total, inclusive.
    pub min_total_cents: Option<i64>,
    /// Maximum order total, inclusive.
    pub max_total_cents: Option<i64>,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_number, customer_name, total_cents,
                   status, cancel_reason, created_at, updated_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Inserts a new order.
    pub async fn insert_order(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, order_number = %order.order_number, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, customer_name, total_cents,
                status, cancel_reason, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.customer_name)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(&order.cancel_reason)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Adds a line snapshot to an order.
    ///
    /// ## Snapshot Pattern
    /// Unit price is copied from the product AT ORDER TIME. Later catalog
    /// price edits must never change what an existing order charged.
    pub async fn add_line(&self, line: &OrderLine) -> DbResult<()> {
        debug!(order_id = %line.order_id, product_id = %line.product_id, "Adding order line");

        sqlx::query(
            r#"
            INSERT INTO order_items (
                id, order_id, product_id,
                unit_price_cents, quantity, subtotal_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&line.id)
        .bind(&line.order_id)
        .bind(&line.product_id)
        .bind(line.unit_price_cents)
        .bind(line.quantity)
        .bind(line.subtotal_cents)
        .bind(line.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets all line snapshots for an order, in insertion order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT id, order_id, product_id,
                   unit_price_cents, quantity, subtotal_cents, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Updates an order's total while it is still pending.
    ///
    /// Called after line insertion; the total reflects only the lines that
    /// actually made it into the database.
    pub async fn update_total(&self, order_id: &str, total_cents: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                total_cents = ?2,
                updated_at = ?3
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .bind(total_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order (pending)", order_id));
        }

        Ok(())
    }

    /// Attempts to cancel a pending order.
    ///
    /// ## Commit Point
    /// The `status = 'pending'` guard makes this the single decision point
    /// for cancellation: of any number of concurrent cancellers (user
    /// double-click, expiry sweep), exactly one sees `rows_affected == 1`
    /// and proceeds to restore stock. Everyone else gets `false`.
    ///
    /// ## Returns
    /// * `Ok(true)`  - This caller won; the order is now cancelled
    /// * `Ok(false)` - Order was not pending (already cancelled/paid) or
    ///                 does not exist; caller must not touch stock
    pub async fn try_cancel(&self, order_id: &str, reason: &str) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = 'cancelled',
                cancel_reason = ?2,
                updated_at = ?3
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .bind(reason)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Attempts to mark a pending order as paid.
    ///
    /// Same conditional-update shape as [`try_cancel`](Self::try_cancel):
    /// only a pending order can settle, and only once.
    pub async fn try_mark_paid(&self, order_id: &str) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = 'paid',
                updated_at = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Lists pending orders created strictly before the cutoff.
    ///
    /// The expiry sweep uses this to find orders past their grace period.
    pub async fn list_pending_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_number, customer_name, total_cents,
                   status, cancel_reason, created_at, updated_at
            FROM orders
            WHERE status = 'pending' AND created_at < ?1
            ORDER BY created_at
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists the most recently created orders.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_number, customer_name, total_cents,
                   status, cancel_reason, created_at, updated_at
            FROM orders
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Searches order history with optional filters.
    ///
    /// Each `NULL` bind disables its clause, so one static statement covers
    /// every filter combination.
    pub async fn search_history(
        &self,
        filter: &OrderHistoryFilter,
        limit: u32,
    ) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_number, customer_name, total_cents,
                   status, cancel_reason, created_at, updated_at
            FROM orders
            WHERE (?1 IS NULL OR instr(lower(customer_name), lower(?1)) > 0)
              AND (?2 IS NULL OR date(created_at) >= ?2)
              AND (?3 IS NULL OR date(created_at) <= ?3)
              AND (?4 IS NULL OR total_cents >= ?4)
              AND (?5 IS NULL OR total_cents <= ?5)
            ORDER BY created_at DESC
            LIMIT ?6
            "#,
        )
        .bind(&filter.customer)
        .bind(filter.from_date)
        .bind(filter.to_date)
        .bind(filter.min_total_cents)
        .bind(filter.max_total_cents)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders by status (for diagnostics).
    pub async fn count_by_status(&self, status: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = ?1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new order line ID.
pub fn generate_line_id() -> String {
    Uuid::new_v4().to_string()
}
