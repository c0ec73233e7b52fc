//! # Analytics Service
//!
//! Thin async wrapper around `lojix_core::analytics`: fetch the window's
//! ledger entries and the catalog, run the pure computation, return the
//! report. No writes happen here, ever.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lojix_core::analytics::{compute_cash_cycle, CashCycleReport};
use lojix_db::Database;

use crate::error::OpsResult;

/// Simple inflow/outflow summary over a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub inflow_cents: i64,
    pub outflow_cents: i64,
    pub balance_cents: i64,
}

/// Read-only financial reporting over the ledger and catalog.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    db: Database,
}

impl AnalyticsService {
    /// Creates a new AnalyticsService.
    pub fn new(db: Database) -> Self {
        AnalyticsService { db }
    }

    /// Computes the cash-cycle report for `[start, end]`.
    ///
    /// Fetches ledger entries due in the window (the report covers the
    /// cash that moves inside it, wherever the obligation was recorded)
    /// and the whole catalog, then delegates to the pure function in
    /// `lojix-core`.
    pub async fn cash_cycle(&self, start: NaiveDate, end: NaiveDate) -> OpsResult<CashCycleReport> {
        debug!(%start, %end, "cash_cycle report");

        let entries = self.db.ledger().list_due_between(start, end).await?;
        let products = self.db.catalog().list().await?;

        Ok(compute_cash_cycle(&entries, &products, start, end))
    }

    /// Computes the inflow/outflow/balance summary for `[start, end]`.
    pub async fn summary(&self, start: NaiveDate, end: NaiveDate) -> OpsResult<FinancialSummary> {
        let (inflow_cents, outflow_cents) = self.db.ledger().window_totals(start, end).await?;

        Ok(FinancialSummary {
            inflow_cents,
            outflow_cents,
            balance_cents: inflow_cents - outflow_cents,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lojix_core::{EntryDirection, EntryStatus, LedgerEntry, Product};
    use lojix_db::DbConfig;
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_entry(
        db: &Database,
        direction: EntryDirection,
        status: EntryStatus,
        amount_cents: i64,
        entry_date: NaiveDate,
        due_date: NaiveDate,
    ) {
        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            description: "entrada de teste".to_string(),
            amount_cents,
            direction,
            status,
            category: None,
            entry_date,
            due_date,
            created_at: Utc::now(),
        };
        db.ledger().insert(&entry).await.unwrap();
    }

    #[tokio::test]
    async fn test_cash_cycle_against_reference_numbers() {
        let db = test_db().await;

        // Inventory worth 3000 cents at cost
        let now = Utc::now();
        db.catalog()
            .insert(&Product {
                id: Uuid::new_v4().to_string(),
                name: "Estoque".to_string(),
                internal_code: None,
                barcode: None,
                fiscal_code: None,
                price_cents: 100,
                cost_cents: Some(3000),
                stock: 1,
                supplier: None,
                unit: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        // 30-day window: inflow of 1000 due +10d, outflow of 400 due +5d.
        // The inflow is recorded before the window but due inside it, so
        // it belongs to the report with its full term.
        let start = date(2026, 8, 1);
        let end = date(2026, 8, 31);
        seed_entry(
            &db,
            EntryDirection::Inflow,
            EntryStatus::Paid,
            1000,
            date(2026, 7, 25),
            date(2026, 8, 4),
        )
        .await;
        seed_entry(
            &db,
            EntryDirection::Outflow,
            EntryStatus::Paid,
            400,
            date(2026, 8, 10),
            date(2026, 8, 15),
        )
        .await;

        let report = AnalyticsService::new(db)
            .cash_cycle(start, end)
            .await
            .unwrap();

        assert_eq!(report.inventory_value_cents, 3000);
        assert_eq!(report.avg_receivable_days, 10);
        assert_eq!(report.avg_payment_days, 5);
        assert_eq!(report.avg_inventory_days, 90);
        assert_eq!(report.operating_cycle_days, 100);
        assert_eq!(report.cash_cycle_days, 95);
    }

    #[tokio::test]
    async fn test_summary_totals() {
        let db = test_db().await;
        let start = date(2026, 8, 1);
        let end = date(2026, 8, 31);

        seed_entry(
            &db,
            EntryDirection::Inflow,
            EntryStatus::Paid,
            5000,
            date(2026, 8, 3),
            date(2026, 8, 3),
        )
        .await;
        seed_entry(
            &db,
            EntryDirection::Outflow,
            EntryStatus::Pending,
            2000,
            date(2026, 8, 7),
            date(2026, 8, 27),
        )
        .await;
        // Recorded in the window but due after it, must not count
        seed_entry(
            &db,
            EntryDirection::Inflow,
            EntryStatus::Paid,
            9999,
            date(2026, 8, 1),
            date(2026, 9, 1),
        )
        .await;

        let summary = AnalyticsService::new(db).summary(start, end).await.unwrap();
        assert_eq!(
            summary,
            FinancialSummary {
                inflow_cents: 5000,
                outflow_cents: 2000,
                balance_cents: 3000,
            }
        );
    }
}
