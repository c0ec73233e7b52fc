//! # lojix-ops: Workflow Layer for Lojix
//!
//! Multi-step flows that keep the three aggregates (catalog stock, orders,
//! ledger) mutually consistent WITHOUT a cross-aggregate transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       lojix-ops (THIS CRATE)                            │
//! │                                                                         │
//! │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐      │
//! │   │  reconcile   │   │    orders    │   │      analytics       │      │
//! │   │              │   │              │   │                      │      │
//! │   │ Reconciler   │   │ OrderFlow    │   │ AnalyticsService     │      │
//! │   │ invoice →    │   │ place/cancel │   │ fetch + pure compute │      │
//! │   │ stock+ledger │   │ expire/pay   │   │ (read-only)          │      │
//! │   └──────┬───────┘   └──────┬───────┘   └──────────┬───────────┘      │
//! │          │                  │                      │                   │
//! │          ▼                  ▼                      ▼                   │
//! │   lojix-db repositories (catalog / orders / ledger)                    │
//! │          │                                                             │
//! │          ▼                                                             │
//! │   lojix-core pure logic (validation, money, analytics arithmetic)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//!
//! There is no transaction spanning stock, orders, and ledger. Instead:
//!
//! 1. **Write ordering**: stock moves first, the ledger entry last, so a
//!    partial failure leaves the hand-recoverable state (payable missing)
//!    rather than the unrecoverable one (phantom stock).
//! 2. **Conditional commit points**: status flips use
//!    `UPDATE ... WHERE status = 'pending'`; exactly one caller wins, and
//!    only the winner runs the compensating stock writes.
//! 3. **Delta stock updates**: every stock write is relative
//!    (`stock = stock + ?`), so interleaved flows never clobber each other.
//! 4. **Reports over exceptions**: per-item failures inside bulk flows land
//!    in outcome reports (`ReconcileOutcome`, `SweepOutcome`), not errors.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod orders;
pub mod reconcile;

// =============================================================================
// Re-exports
// =============================================================================

pub use analytics::{AnalyticsService, FinancialSummary};
pub use error::{OpsError, OpsResult};
pub use orders::{
    CancelOutcome, OrderFlow, OrderLineRequest, PlacedOrder, SweepFailure, SweepOutcome,
};
pub use reconcile::{LedgerWrite, LineFailure, ReconcileOutcome, Reconciler};
