//! # Order Lifecycle Manager
//!
//! Order placement, cancellation, settlement, and the expiry sweep.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order State Machine                                │
//! │                                                                         │
//! │                 place_order()                                           │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │                 ┌─────────┐    mark_paid()      ┌────────┐             │
//! │                 │ PENDING │ ──────────────────► │  PAID  │ (terminal)  │
//! │                 └─────────┘                     └────────┘             │
//! │                      │                                                  │
//! │                      │ cancel_order() / expire_stale()                 │
//! │                      ▼                                                  │
//! │                ┌───────────┐                                            │
//! │                │ CANCELLED │ (terminal; stock restored from snapshot)  │
//! │                └───────────┘                                            │
//! │                                                                         │
//! │  The pending→cancelled flip is a conditional UPDATE. Whoever wins it   │
//! │  owns the stock restoration; every other path sees a no-op. That is    │
//! │  what makes restoration exactly-once without a cross-store             │
//! │  transaction.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use lojix_core::{
    validation::{validate_cancel_reason, validate_customer_name, validate_quantity},
    CoreError, Order, OrderLine, OrderStatus, AUTO_EXPIRY_REASON_PREFIX, ORDER_GRACE_DAYS,
};
use lojix_db::Database;

use crate::error::OpsResult;

// =============================================================================
// Request / Outcome Types
// =============================================================================

/// One requested order line: which product, how many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Result of a successful placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: String,
    pub order_number: String,
    pub total_cents: i64,
    pub line_count: usize,
    /// Non-fatal problems: a line snapshot or stock decrement that failed
    /// after the order itself was persisted.
    pub warnings: Vec<String>,
}

/// Result of a cancellation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOutcome {
    /// True if THIS call flipped the order to cancelled (and restored
    /// stock). False means the order was already cancelled: idempotent
    /// no-op, zero stock writes.
    pub performed: bool,
    /// Snapshot lines whose stock was re-added.
    pub restored_lines: usize,
    /// Non-fatal problems: empty snapshot, or a product that no longer
    /// accepts the stock restore.
    pub warnings: Vec<String>,
}

/// One order the expiry sweep could not cancel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepFailure {
    pub order_id: String,
    pub reason: String,
}

/// Report of one expiry sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Pending orders older than the grace period.
    pub examined: usize,
    /// Orders this sweep actually cancelled.
    pub cancelled: usize,
    /// Per-order failures; the sweep continues past them.
    pub failures: Vec<SweepFailure>,
    /// Warnings bubbled up from individual cancellations.
    pub warnings: Vec<String>,
}

// =============================================================================
// Order Flow
// =============================================================================

/// Order placement and lifecycle operations.
///
/// ## Usage
/// ```rust,ignore
/// let flow = OrderFlow::new(db.clone());
///
/// let placed = flow
///     .place_order("Maria Silva", &[OrderLineRequest {
///         product_id,
///         quantity: 2,
///     }])
///     .await?;
///
/// flow.cancel_order(&placed.order_id, "cliente desistiu").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderFlow {
    db: Database,
}

impl OrderFlow {
    /// Creates a new OrderFlow.
    pub fn new(db: Database) -> Self {
        OrderFlow { db }
    }

    /// Places a new order.
    ///
    /// ## Steps
    /// 1. Validate customer name, non-empty lines, quantities
    /// 2. Stale sufficiency check: read each product's stock and reject the
    ///    WHOLE placement if any requested quantity exceeds it (the read is
    ///    not locked; a concurrent sale can still drive stock negative,
    ///    which is accepted)
    /// 3. Persist the order and its price-frozen line snapshots
    /// 4. Decrement stock per line with independent delta updates
    ///
    /// A snapshot or decrement failure after step 3 does not abort the
    /// remaining lines; it becomes a warning on the result.
    pub async fn place_order(
        &self,
        customer_name: &str,
        lines: &[OrderLineRequest],
    ) -> OpsResult<PlacedOrder> {
        debug!(customer = %customer_name, lines = lines.len(), "place_order");

        validate_customer_name(customer_name)?;
        if lines.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }
        for request in lines {
            validate_quantity(request.quantity)?;
        }

        // Stale sufficiency check + snapshot build. All-or-nothing: any
        // missing product or short stock rejects the whole placement
        // before anything is written.
        let mut snapshots: Vec<(OrderLine, i64)> = Vec::with_capacity(lines.len());
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        for request in lines {
            let product = self
                .db
                .catalog()
                .get_by_id(&request.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(request.product_id.clone()))?;

            if request.quantity > product.stock {
                return Err(CoreError::InsufficientStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                    requested: request.quantity,
                }
                .into());
            }

            let line = OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product.id.clone(),
                unit_price_cents: product.price_cents,
                quantity: request.quantity,
                subtotal_cents: product.price_cents * request.quantity,
                created_at: now,
            };
            snapshots.push((line, request.quantity));
        }

        let order = Order {
            id: order_id.clone(),
            order_number: generate_order_number(customer_name),
            customer_name: customer_name.trim().to_string(),
            total_cents: 0,
            status: OrderStatus::Pending,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };
        self.db.orders().insert_order(&order).await?;

        // Persist snapshots and move stock. Lines are independent from
        // here on: the order exists, so failures downgrade to warnings.
        let mut warnings = Vec::new();
        let mut total_cents = 0;
        let mut line_count = 0;

        for (line, quantity) in &snapshots {
            if let Err(e) = self.db.orders().add_line(line).await {
                warnings.push(format!(
                    "line for product {} not recorded: {}",
                    line.product_id, e
                ));
                continue;
            }
            total_cents += line.subtotal_cents;
            line_count += 1;

            if let Err(e) = self
                .db
                .catalog()
                .adjust_stock(&line.product_id, -quantity)
                .await
            {
                warnings.push(format!(
                    "stock not decremented for product {}: {}",
                    line.product_id, e
                ));
            }
        }

        self.db.orders().update_total(&order_id, total_cents).await?;

        if !warnings.is_empty() {
            warn!(order_id = %order_id, warnings = warnings.len(), "Order placed with warnings");
        }
        info!(
            order_id = %order_id,
            order_number = %order.order_number,
            total = total_cents,
            lines = line_count,
            "Order placed"
        );

        Ok(PlacedOrder {
            order_id,
            order_number: order.order_number,
            total_cents,
            line_count,
            warnings,
        })
    }

    /// Cancels a pending order and restores its stock.
    ///
    /// ## Idempotence
    /// Re-cancelling an already-cancelled order is a successful no-op with
    /// zero stock writes. Concurrent cancellations race on the conditional
    /// status flip; only the winner restores stock.
    ///
    /// ## Errors
    /// - reason shorter than 5 characters
    /// - order not found
    /// - order already paid
    pub async fn cancel_order(&self, order_id: &str, reason: &str) -> OpsResult<CancelOutcome> {
        debug!(order_id = %order_id, "cancel_order");

        validate_cancel_reason(reason)?;

        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;

        match order.status {
            OrderStatus::Cancelled => {
                debug!(order_id = %order_id, "Order already cancelled, no-op");
                return Ok(CancelOutcome {
                    performed: false,
                    restored_lines: 0,
                    warnings: Vec::new(),
                });
            }
            OrderStatus::Paid => {
                return Err(CoreError::InvalidOrderStatus {
                    order_id: order_id.to_string(),
                    current_status: order.status.as_str().to_string(),
                }
                .into());
            }
            OrderStatus::Pending => {}
        }

        // Commit point. If another canceller got here first between our
        // read and this write, rows_affected is 0 and we restore nothing.
        if !self.db.orders().try_cancel(order_id, reason.trim()).await? {
            debug!(order_id = %order_id, "Lost cancellation race, no-op");
            return Ok(CancelOutcome {
                performed: false,
                restored_lines: 0,
                warnings: Vec::new(),
            });
        }

        // Restoration amounts come from the snapshot ONLY. Current catalog
        // prices or stock levels have no say in what gets re-added.
        //
        // The order is already cancelled at this point, so a snapshot read
        // failure cannot be an error: a retry would no-op on the flipped
        // status and the restoration would be lost for good. Surface it as
        // a warning on the successful outcome instead.
        let mut warnings = Vec::new();
        let mut restored_lines = 0;

        let lines = match self.db.orders().get_lines(order_id).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Snapshot read failed after cancellation");
                warnings.push(format!(
                    "line snapshot could not be read; no stock restored: {}",
                    e
                ));
                Vec::new()
            }
        };

        if lines.is_empty() && warnings.is_empty() {
            warn!(order_id = %order_id, "Cancelled order has no line snapshot; nothing to restore");
            warnings.push("order has no line snapshot; no stock restored".to_string());
        }

        for line in &lines {
            match self
                .db
                .catalog()
                .adjust_stock(&line.product_id, line.quantity)
                .await
            {
                Ok(()) => restored_lines += 1,
                Err(e) => warnings.push(format!(
                    "stock not restored for product {}: {}",
                    line.product_id, e
                )),
            }
        }

        info!(order_id = %order_id, restored_lines, "Order cancelled");

        Ok(CancelOutcome {
            performed: true,
            restored_lines,
            warnings,
        })
    }

    /// Marks a pending order as paid.
    ///
    /// Terminal states reject the transition; there is no un-pay.
    pub async fn mark_paid(&self, order_id: &str) -> OpsResult<()> {
        debug!(order_id = %order_id, "mark_paid");

        if self.db.orders().try_mark_paid(order_id).await? {
            info!(order_id = %order_id, "Order marked paid");
            return Ok(());
        }

        // Distinguish "gone" from "wrong status" for the caller.
        match self.db.orders().get_by_id(order_id).await? {
            None => Err(CoreError::OrderNotFound(order_id.to_string()).into()),
            Some(order) => Err(CoreError::InvalidOrderStatus {
                order_id: order_id.to_string(),
                current_status: order.status.as_str().to_string(),
            }
            .into()),
        }
    }

    /// Cancels every pending order older than the grace period.
    ///
    /// `now` is a parameter so the sweep is testable; production callers
    /// pass `Utc::now()`.
    ///
    /// ## Failure Policy
    /// Best-effort: a failed cancellation is recorded and the sweep moves
    /// on. Nothing here returns early.
    pub async fn expire_stale(&self, now: DateTime<Utc>) -> OpsResult<SweepOutcome> {
        let cutoff = now - Duration::days(ORDER_GRACE_DAYS);
        debug!(cutoff = %cutoff, "expire_stale sweep");

        let stale = self.db.orders().list_pending_created_before(cutoff).await?;

        let reason = format!(
            "{} pending for more than {} days",
            AUTO_EXPIRY_REASON_PREFIX, ORDER_GRACE_DAYS
        );

        let mut cancelled = 0;
        let mut failures = Vec::new();
        let mut warnings = Vec::new();

        for order in &stale {
            match self.cancel_order(&order.id, &reason).await {
                Ok(outcome) => {
                    if outcome.performed {
                        cancelled += 1;
                    }
                    warnings.extend(outcome.warnings);
                }
                Err(e) => {
                    warn!(order_id = %order.id, error = %e, "Sweep could not cancel order");
                    failures.push(SweepFailure {
                        order_id: order.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            examined = stale.len(),
            cancelled,
            failed = failures.len(),
            "Expiry sweep finished"
        );

        Ok(SweepOutcome {
            examined: stale.len(),
            cancelled,
            failures,
            warnings,
        })
    }
}

/// Generates a human-facing order number: customer prefix + date + random
/// suffix, e.g. `MAR-20260829-4821`.
///
/// Best-effort unique only. The UUID order id is the real identity;
/// a rare suffix collision carries no referential weight.
fn generate_order_number(customer_name: &str) -> String {
    let prefix: String = customer_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let prefix = if prefix.is_empty() {
        "ORD".to_string()
    } else {
        prefix
    };

    let now = Utc::now();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let random = nanos % 10_000;

    format!("{}-{}-{:04}", prefix, now.format("%Y%m%d"), random)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lojix_core::Product;
    use lojix_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: "Produto Teste".to_string(),
            internal_code: None,
            barcode: None,
            fiscal_code: None,
            price_cents,
            cost_cents: Some(price_cents / 2),
            stock,
            supplier: None,
            unit: Some("UN".to_string()),
            created_at: now,
            updated_at: now,
        };
        db.catalog().insert(&product).await.unwrap();
        product
    }

    fn request(product: &Product, quantity: i64) -> OrderLineRequest {
        OrderLineRequest {
            product_id: product.id.clone(),
            quantity,
        }
    }

    async fn stock_of(db: &Database, id: &str) -> i64 {
        db.catalog().get_by_id(id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_place_order_decrements_stock_and_freezes_price() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 10).await;
        let flow = OrderFlow::new(db.clone());

        let placed = flow
            .place_order("Maria Silva", &[request(&product, 3)])
            .await
            .unwrap();

        assert_eq!(placed.total_cents, 3000);
        assert_eq!(placed.line_count, 1);
        assert!(placed.warnings.is_empty());
        assert_eq!(stock_of(&db, &product.id).await, 7);

        // Raise the catalog price; the snapshot must not move.
        let mut updated = product.clone();
        updated.price_cents = 9999;
        db.catalog().update(&updated).await.unwrap();

        let lines = db.orders().get_lines(&placed.order_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].unit_price_cents, 1000);
        assert_eq!(lines[0].subtotal_cents, 3000);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rejects_whole_placement() {
        let db = test_db().await;
        let plenty = seed_product(&db, 500, 100).await;
        let scarce = seed_product(&db, 800, 2).await;
        let flow = OrderFlow::new(db.clone());

        let result = flow
            .place_order("Joao", &[request(&plenty, 5), request(&scarce, 3)])
            .await;
        assert!(result.is_err());

        // Nothing moved, not even the sufficient line
        assert_eq!(stock_of(&db, &plenty.id).await, 100);
        assert_eq!(stock_of(&db, &scarce.id).await, 2);
    }

    #[tokio::test]
    async fn test_empty_order_and_bad_customer_rejected() {
        let db = test_db().await;
        let product = seed_product(&db, 500, 5).await;
        let flow = OrderFlow::new(db.clone());

        assert!(flow.place_order("Maria", &[]).await.is_err());
        assert!(flow
            .place_order("   ", &[request(&product, 1)])
            .await
            .is_err());
        assert!(flow
            .place_order("Maria", &[request(&product, 0)])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_cancel_restores_stock_exactly_once() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 10).await;
        let flow = OrderFlow::new(db.clone());

        let placed = flow
            .place_order("Maria", &[request(&product, 4)])
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product.id).await, 6);

        let first = flow
            .cancel_order(&placed.order_id, "cliente desistiu")
            .await
            .unwrap();
        assert!(first.performed);
        assert_eq!(first.restored_lines, 1);
        assert_eq!(stock_of(&db, &product.id).await, 10);

        // Second cancel: no-op, zero stock writes
        let second = flow
            .cancel_order(&placed.order_id, "cliente desistiu")
            .await
            .unwrap();
        assert!(!second.performed);
        assert_eq!(second.restored_lines, 0);
        assert_eq!(stock_of(&db, &product.id).await, 10);
    }

    #[tokio::test]
    async fn test_conservation_with_external_stock_movement() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 10).await;
        let flow = OrderFlow::new(db.clone());

        let placed = flow
            .place_order("Maria", &[request(&product, 4)])
            .await
            .unwrap();

        // Something else moves stock while the order is pending
        db.catalog().adjust_stock(&product.id, 7).await.unwrap();
        assert_eq!(stock_of(&db, &product.id).await, 13);

        flow.cancel_order(&placed.order_id, "mudou de ideia")
            .await
            .unwrap();

        // Delta restoration: external movement preserved, order's 4 back
        assert_eq!(stock_of(&db, &product.id).await, 17);
    }

    #[tokio::test]
    async fn test_cancel_reason_too_short_rejected() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 10).await;
        let flow = OrderFlow::new(db.clone());

        let placed = flow
            .place_order("Maria", &[request(&product, 1)])
            .await
            .unwrap();

        assert!(flow.cancel_order(&placed.order_id, "no").await.is_err());
        // Order untouched
        let order = db.orders().get_by_id(&placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(stock_of(&db, &product.id).await, 9);
    }

    #[tokio::test]
    async fn test_paid_order_cannot_be_cancelled() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 10).await;
        let flow = OrderFlow::new(db.clone());

        let placed = flow
            .place_order("Maria", &[request(&product, 2)])
            .await
            .unwrap();
        flow.mark_paid(&placed.order_id).await.unwrap();

        assert!(flow
            .cancel_order(&placed.order_id, "tarde demais")
            .await
            .is_err());
        assert_eq!(stock_of(&db, &product.id).await, 8);

        // And a paid order cannot be paid again
        assert!(flow.mark_paid(&placed.order_id).await.is_err());
    }

    #[tokio::test]
    async fn test_expiry_sweep_cancels_only_past_grace() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 30).await;
        let flow = OrderFlow::new(db.clone());

        let now = Utc::now();

        // Three pending orders, backdated by rewriting created_at
        let mut ids = Vec::new();
        for age_days in [10i64, 3, 1] {
            let placed = flow
                .place_order("Maria", &[request(&product, 2)])
                .await
                .unwrap();
            let backdated = now - Duration::days(age_days);
            sqlx::query("UPDATE orders SET created_at = ?2 WHERE id = ?1")
                .bind(&placed.order_id)
                .bind(backdated)
                .execute(db.pool())
                .await
                .unwrap();
            ids.push(placed.order_id);
        }
        assert_eq!(stock_of(&db, &product.id).await, 24);

        let outcome = flow.expire_stale(now).await.unwrap();
        assert_eq!(outcome.examined, 1);
        assert_eq!(outcome.cancelled, 1);
        assert!(outcome.failures.is_empty());

        // Only the 10-day-old order flipped, and its stock came back
        let oldest = db.orders().get_by_id(&ids[0]).await.unwrap().unwrap();
        assert_eq!(oldest.status, OrderStatus::Cancelled);
        assert!(oldest
            .cancel_reason
            .as_deref()
            .unwrap()
            .starts_with(AUTO_EXPIRY_REASON_PREFIX));

        for id in &ids[1..] {
            let order = db.orders().get_by_id(id).await.unwrap().unwrap();
            assert_eq!(order.status, OrderStatus::Pending);
        }
        assert_eq!(stock_of(&db, &product.id).await, 26);
    }

    #[tokio::test]
    async fn test_order_number_shape() {
        let number = generate_order_number("Maria Silva");
        assert!(number.starts_with("MAR-"));
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 4);

        assert!(generate_order_number("!!!").starts_with("ORD-"));
    }

    #[tokio::test]
    async fn test_history_filters() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 50).await;
        let flow = OrderFlow::new(db.clone());

        flow.place_order("Maria Silva", &[request(&product, 1)])
            .await
            .unwrap();
        flow.place_order("Joao Souza", &[request(&product, 5)])
            .await
            .unwrap();

        let by_customer = db
            .orders()
            .search_history(
                &lojix_db::OrderHistoryFilter {
                    customer: Some("silva".to_string()),
                    ..Default::default()
                },
                50,
            )
            .await
            .unwrap();
        assert_eq!(by_customer.len(), 1);
        assert_eq!(by_customer[0].customer_name, "Maria Silva");

        let by_value = db
            .orders()
            .search_history(
                &lojix_db::OrderHistoryFilter {
                    min_total_cents: Some(2000),
                    ..Default::default()
                },
                50,
            )
            .await
            .unwrap();
        assert_eq!(by_value.len(), 1);
        assert_eq!(by_value[0].customer_name, "Joao Souza");
    }

    #[tokio::test]
    async fn test_cancel_without_snapshot_still_cancels_with_warning() {
        let db = test_db().await;
        let flow = OrderFlow::new(db.clone());

        // A pending order persisted with no order_items rows
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: "ORD20260810-0001".to_string(),
            customer_name: "Carlos Mota".to_string(),
            total_cents: 1_500,
            status: OrderStatus::Pending,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };
        db.orders().insert_order(&order).await.unwrap();

        let outcome = flow.cancel_order(&order.id, "pedido duplicado").await.unwrap();
        assert!(outcome.performed);
        assert_eq!(outcome.restored_lines, 0);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("no line snapshot"));

        let stored = db.orders().get_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_snapshot_read_failure_after_cancel_is_a_warning_not_an_error() {
        let db = test_db().await;
        let product = seed_product(&db, 1000, 10).await;
        let flow = OrderFlow::new(db.clone());

        let placed = flow
            .place_order("Rita Alves", &[request(&product, 3)])
            .await
            .unwrap();

        // Make the snapshot unreadable once the status is flipped
        sqlx::query("DROP TABLE order_items")
            .execute(db.pool())
            .await
            .unwrap();

        let outcome = flow
            .cancel_order(&placed.order_id, "cliente desistiu")
            .await
            .unwrap();
        assert!(outcome.performed);
        assert_eq!(outcome.restored_lines, 0);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("no stock restored"));

        // The cancellation itself committed
        let stored = db.orders().get_by_id(&placed.order_id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Cancelled);
    }
}
