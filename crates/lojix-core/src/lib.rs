//! # lojix-core: Pure Business Logic for Lojix
//!
//! This crate is the **heart** of Lojix. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Lojix Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    lojix-ops (Orchestration)                    │   │
//! │  │    Reconciler ──► Order Lifecycle ──► Cash-Cycle Analytics      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lojix-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  invoice  │  │ analytics │  │   │
//! │  │   │  Product  │  │   Money   │  │ Document  │  │ CashCycle │  │   │
//! │  │   │   Order   │  │ bps math  │  │  Parser   │  │  Report   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    lojix-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, LedgerEntry, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`invoice`] - Parsed supplier invoices and the parser seam
//! - [`analytics`] - Cash-cycle indicator arithmetic
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use lojix_core::money::Money;
//! use lojix_core::NEW_PRODUCT_MARKUP_BPS;
//!
//! // Create money from cents (never from floats!)
//! let unit_cost = Money::from_cents(1000); // $10.00
//!
//! // Suggested sale price for a newly imported product: 1.5x cost
//! let price = unit_cost.apply_bps(NEW_PRODUCT_MARKUP_BPS);
//! assert_eq!(price.cents(), 1500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lojix_core::Money` instead of
// `use lojix_core::money::Money`

pub use analytics::CashCycleReport;
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{InvoiceDocument, InvoiceLine, InvoiceParseError, InvoiceParser};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Markup applied to an invoice unit cost when creating a brand-new catalog
/// product: 15000 bps = 1.5x.
///
/// ## Business Reason
/// Newly imported products need *some* sale price so they can be sold
/// immediately; the owner adjusts it later from the catalog screen.
pub const NEW_PRODUCT_MARKUP_BPS: u32 = 15_000;

/// Assumed cost fraction of the sale price when a product has no recorded
/// cost: 6000 bps = 0.6x.
///
/// ## Business Reason
/// Products created by hand often lack a cost. Inventory valuation still
/// needs one, so we assume a 40% margin rather than valuing at zero.
pub const FALLBACK_COST_BPS: u32 = 6_000;

/// Days a pending order may sit untouched before the expiry sweep cancels it.
pub const ORDER_GRACE_DAYS: i64 = 4;

/// Placeholder some invoice issuers emit in the barcode field when a product
/// has no GTIN. Never a real barcode; must not be used as a lookup key.
pub const NO_BARCODE_SENTINEL: &str = "SEM GTIN";

/// Cancellation reason prefix recorded by the automatic expiry sweep, so
/// auto-cancellations are distinguishable from manual ones in the history.
pub const AUTO_EXPIRY_REASON_PREFIX: &str = "[auto-expiry]";

/// Minimum length (after trimming) for a manual cancellation reason.
pub const MIN_CANCEL_REASON_LEN: usize = 5;

/// Maximum quantity for a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 9_999;
