//! # Analytics Module
//!
//! Pure cash-cycle arithmetic over ledger entries and the product catalog.
//!
//! ## Cash Conversion Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cash-Cycle Indicators                              │
//! │                                                                         │
//! │  PMP  avg days the business takes to PAY suppliers  (outflows)          │
//! │  PMR  avg days the business takes to RECEIVE money  (inflows)           │
//! │  PME  avg days capital sits in INVENTORY                                │
//! │                                                                         │
//! │  Operating Cycle  = PME + PMR                                           │
//! │  Cash Cycle       = Operating Cycle - PMP                               │
//! │  Working Capital  = pending inflows + inventory - pending outflows      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its inputs. Fetching the entries
//! and the catalog is the caller's job (see `lojix-ops`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{EntryDirection, EntryStatus, LedgerEntry, Product};

// =============================================================================
// Report Type
// =============================================================================

/// Computed cash-cycle indicators for one analysis window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCycleReport {
    /// Analysis window start (inclusive).
    pub window_start: NaiveDate,
    /// Analysis window end (inclusive).
    pub window_end: NaiveDate,
    /// Catalog inventory valued at effective cost, in cents.
    pub inventory_value_cents: i64,
    /// Average supplier payment term, in days (PMP).
    pub avg_payment_days: i64,
    /// Average customer receivable term, in days (PMR).
    pub avg_receivable_days: i64,
    /// Average inventory holding period, in days (PME).
    pub avg_inventory_days: i64,
    /// Operating cycle: inventory days + receivable days.
    pub operating_cycle_days: i64,
    /// Cash cycle: operating cycle minus payment days. May be negative
    /// when suppliers finance the whole cycle.
    pub cash_cycle_days: i64,
    /// Working-capital need in cents: pending inflows + inventory value
    /// minus pending outflows. May be negative.
    pub working_capital_cents: i64,
}

// =============================================================================
// Computation
// =============================================================================

/// Computes the full cash-cycle report for the given window.
///
/// `entries` should already be limited to the window by `due_date` (the
/// report covers the cash that moves inside `[start, end]`); entries due
/// outside the window are ignored defensively. `products` is the whole
/// catalog, valued at effective cost.
///
/// ## Term averaging
/// Each entry contributes `max(0, due_date - entry_date)` days, weighted
/// equally (not by value). An empty direction averages to zero days.
pub fn compute_cash_cycle(
    entries: &[LedgerEntry],
    products: &[Product],
    start: NaiveDate,
    end: NaiveDate,
) -> CashCycleReport {
    let in_window: Vec<&LedgerEntry> = entries
        .iter()
        .filter(|e| e.due_date >= start && e.due_date <= end)
        .collect();

    let inventory_value_cents: i64 = products.iter().map(|p| p.inventory_value().cents()).sum();

    let avg_payment_days = average_term_days(&in_window, EntryDirection::Outflow);
    let avg_receivable_days = average_term_days(&in_window, EntryDirection::Inflow);

    // PME: inventory value divided by average daily inflow over the window.
    let window_days = (end - start).num_days().max(1);
    let window_inflow_cents: i64 = in_window
        .iter()
        .filter(|e| e.direction == EntryDirection::Inflow)
        .map(|e| e.amount_cents)
        .sum();
    let avg_inventory_days = if window_inflow_cents > 0 {
        // round(inventory / (inflow / days)) without leaving integer math
        let numerator = inventory_value_cents as i128 * window_days as i128;
        let denominator = window_inflow_cents as i128;
        ((numerator + denominator / 2) / denominator) as i64
    } else {
        0
    };

    let operating_cycle_days = avg_inventory_days + avg_receivable_days;
    let cash_cycle_days = operating_cycle_days - avg_payment_days;

    let pending_inflow_cents = pending_total(&in_window, EntryDirection::Inflow);
    let pending_outflow_cents = pending_total(&in_window, EntryDirection::Outflow);
    let working_capital_cents =
        pending_inflow_cents + inventory_value_cents - pending_outflow_cents;

    CashCycleReport {
        window_start: start,
        window_end: end,
        inventory_value_cents,
        avg_payment_days,
        avg_receivable_days,
        avg_inventory_days,
        operating_cycle_days,
        cash_cycle_days,
        working_capital_cents,
    }
}

/// Mean of per-entry term days for one direction, rounded to whole days.
fn average_term_days(entries: &[&LedgerEntry], direction: EntryDirection) -> i64 {
    let mut total_days: i64 = 0;
    let mut count: i64 = 0;
    for entry in entries.iter().filter(|e| e.direction == direction) {
        total_days += entry.term_days();
        count += 1;
    }
    if count == 0 {
        0
    } else {
        (total_days + count / 2) / count
    }
}

/// Sum of pending amounts for one direction, in cents.
fn pending_total(entries: &[&LedgerEntry], direction: EntryDirection) -> i64 {
    entries
        .iter()
        .filter(|e| e.direction == direction && e.status == EntryStatus::Pending)
        .map(|e| e.amount_cents)
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
