//! # Domain Types
//!
//! Core domain types used throughout the Lojix back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   LedgerEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  internal_code  │   │  order_number   │   │  direction      │       │
//! │  │  barcode        │   │  status         │   │  status         │       │
//! │  │  stock          │   │  total_cents    │   │  due_date       │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                        ┌────────┴────────┐                              │
//! │                        │    OrderLine    │  immutable snapshot          │
//! │                        │  product_id     │  captured at placement,      │
//! │                        │  unit_price     │  sole basis for stock        │
//! │                        │  quantity       │  restoration on cancel       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where applicable (order_number, internal_code) -
//!   human-readable, potentially mutable, not guaranteed unique

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::FALLBACK_COST_BPS;

// =============================================================================
// Product
// =============================================================================

/// A catalog product with quantity-on-hand and cost/price.
///
/// Owned exclusively by the catalog store. Mutated by the invoice
/// reconciler (create, or stock increment / cost overwrite on match) and
/// by the order lifecycle (decrement on placement, increment on
/// cancellation or expiry).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in catalog listings.
    pub name: String,

    /// Supplier item code (invoice `cProd`), usable as a match key.
    pub internal_code: Option<String>,

    /// Barcode (EAN). The "SEM GTIN" sentinel is never stored here;
    /// it is normalized to None before any write.
    pub barcode: Option<String>,

    /// Fiscal classification code (NCM). Informational only; no
    /// tax-law correctness is implied.
    pub fiscal_code: Option<String>,

    /// Unit sale price in cents.
    pub price_cents: i64,

    /// Unit cost in cents. When absent, analytics substitute
    /// 60% of the sale price.
    pub cost_cents: Option<i64>,

    /// Current stock level. May go negative if over-sold; this is a
    /// known, accepted risk of the non-atomic sufficiency check.
    pub stock: i64,

    /// Supplier name (last-invoice-wins).
    pub supplier: Option<String>,

    /// Unit of measure (last-invoice-wins).
    pub unit: Option<String>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the unit cost used by analytics.
    ///
    /// When no cost has been recorded (product never appeared on a
    /// purchase invoice), falls back to 60% of the sale price.
    pub fn effective_cost(&self) -> Money {
        match self.cost_cents {
            Some(cost) => Money::from_cents(cost),
            None => self.price().apply_bps(FALLBACK_COST_BPS),
        }
    }

    /// Inventory value contributed by this product (effective cost × stock).
    pub fn inventory_value(&self) -> Money {
        self.effective_cost().multiply_quantity(self.stock)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a customer order.
///
/// Transitions: `Pending → Paid`, `Pending → Cancelled`. Paid and
/// Cancelled are terminal. Orders are never physically deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment (cancellable, expirable).
    Pending,
    /// Payment received.
    Paid,
    /// Cancelled by the user or by the expiry sweep.
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl OrderStatus {
    /// Stable lowercase label, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order.
///
/// The line-item snapshot lives in separate [`OrderLine`] rows; together
/// they form the aggregate. Status transitions are the only permitted
/// mutation after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Human-facing number (customer prefix + date + random suffix).
    /// Best-effort unique only; `id` is the real identity.
    pub order_number: String,
    /// Denormalized customer display name, not a foreign key.
    pub customer_name: String,
    pub total_cents: i64,
    pub status: OrderStatus,
    /// Present once the order is cancelled. System-generated reasons
    /// carry a fixed "[auto-expiry]" prefix to distinguish them from
    /// user-supplied ones.
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order Line (snapshot)
// =============================================================================

/// A line item in an order.
///
/// Uses the snapshot pattern: product price and quantity are frozen at
/// placement time. On cancellation, stock restoration reads **only** this
/// snapshot, never the current catalog state, since prices and products
/// may have changed since placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Unit price in cents at time of placement (frozen).
    pub unit_price_cents: i64,
    /// Quantity ordered (frozen; the exact amount restored on cancel).
    pub quantity: i64,
    /// Line subtotal (unit_price × quantity) at time of placement.
    pub subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the frozen subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// Direction of a cash-flow entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum EntryDirection {
    /// Cash coming in (receivable).
    Inflow,
    /// Cash going out (payable).
    Outflow,
}

/// Settlement status of a cash-flow entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Cash has not moved yet.
    Pending,
    /// Settled.
    Paid,
}

impl Default for EntryStatus {
    fn default() -> Self {
        EntryStatus::Pending
    }
}

/// A cash-flow ledger entry.
///
/// Created by the invoice reconciler (always outflow / pending /
/// "stock-purchase") or by manual entry (out of core scope). Status
/// toggling is the only mutation relevant to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub id: String,
    /// Free-text description (e.g. "Invoice 1234 - Acme Distribuidora").
    pub description: String,
    /// Amount in cents; always positive, sign is carried by `direction`.
    pub amount_cents: i64,
    pub direction: EntryDirection,
    pub status: EntryStatus,
    /// Free-form category; the reconciler writes "stock-purchase".
    pub category: Option<String>,
    /// When the obligation arose.
    pub entry_date: NaiveDate,
    /// When cash actually moves (payment term).
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Days between the obligation arising and cash moving, floored at 0.
    ///
    /// Entries whose due date precedes their entry date (data-entry
    /// noise) contribute 0 days rather than a negative term.
    pub fn term_days(&self) -> i64 {
        (self.due_date - self.entry_date).num_days().max(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price_cents: i64, cost_cents: Option<i64>, stock: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Test".to_string(),
            internal_code: None,
            barcode: None,
            fiscal_code: None,
            price_cents,
            cost_cents,
            stock,
            supplier: None,
            unit: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_cost_prefers_recorded_cost() {
        let p = product(1000, Some(700), 3);
        assert_eq!(p.effective_cost().cents(), 700);
        assert_eq!(p.inventory_value().cents(), 2100);
    }

    #[test]
    fn test_effective_cost_falls_back_to_price_fraction() {
        let p = product(1000, None, 2);
        assert_eq!(p.effective_cost().cents(), 600);
        assert_eq!(p.inventory_value().cents(), 1200);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn test_term_days_floors_at_zero() {
        let entry = LedgerEntry {
            id: "l-1".to_string(),
            description: "test".to_string(),
            amount_cents: 100,
            direction: EntryDirection::Inflow,
            status: EntryStatus::Pending,
            category: None,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(entry.term_days(), 0);
    }
}
