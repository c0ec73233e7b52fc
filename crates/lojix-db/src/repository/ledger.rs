//! # Ledger Repository
//!
//! Database operations for the cash-flow ledger.
//!
//! ## What Lives Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ledger_entries table                               │
//! │                                                                         │
//! │  One row per expected or settled money movement:                       │
//! │                                                                         │
//! │  direction=outflow  "NF 000123 - Fornecedor SA"   (invoice import)     │
//! │  direction=inflow   "Pedido ACM-20260829-4821"    (order settled)      │
//! │  direction=outflow  "Aluguel agosto"              (manual entry)       │
//! │                                                                         │
//! │  status=pending → money has not moved yet (receivable / payable)       │
//! │  status=paid    → settled                                               │
//! │                                                                         │
//! │  entry_date = when the obligation arose                                │
//! │  due_date   = when the money is expected to move                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lojix_core::{EntryStatus, LedgerEntry};

/// Repository for cash-flow ledger operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Gets an entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LedgerEntry>> {
        let entry = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, description, amount_cents, direction, status,
                   category, entry_date, due_date, created_at
            FROM ledger_entries
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Inserts a new ledger entry.
    pub async fn insert(&self, entry: &LedgerEntry) -> DbResult<()> {
        debug!(
            id = %entry.id,
            amount = %entry.amount_cents,
            direction = ?entry.direction,
            "Inserting ledger entry"
        );

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (
                id, description, amount_cents, direction, status,
                category, entry_date, due_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.description)
        .bind(entry.amount_cents)
        .bind(entry.direction)
        .bind(entry.status)
        .bind(&entry.category)
        .bind(entry.entry_date)
        .bind(entry.due_date)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists entries due in `[start, end]`, soonest first.
    ///
    /// This is the analytics window query (the cash-cycle report is
    /// computed over exactly these rows) and also feeds the
    /// upcoming-commitments view.
    pub async fn list_due_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT id, description, amount_cents, direction, status,
                   category, entry_date, due_date, created_at
            FROM ledger_entries
            WHERE due_date >= ?1 AND due_date <= ?2
            ORDER BY due_date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Sets an entry's settlement status.
    pub async fn set_status(&self, id: &str, status: EntryStatus) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Setting ledger entry status");

        let result = sqlx::query(
            r#"
            UPDATE ledger_entries SET status = ?2 WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LedgerEntry", id));
        }

        Ok(())
    }

    /// Returns (inflow_total, outflow_total) in cents over a due-date
    /// window, regardless of settlement status.
    ///
    /// Backs the financial summary header, over the same due-date window
    /// the cash-cycle report uses.
    pub async fn window_totals(&self, start: NaiveDate, end: NaiveDate) -> DbResult<(i64, i64)> {
        let row: (Option<i64>, Option<i64>) = sqlx::query_as(
            r#"
            SELECT
                SUM(CASE WHEN direction = 'inflow' THEN amount_cents END),
                SUM(CASE WHEN direction = 'outflow' THEN amount_cents END)
            FROM ledger_entries
            WHERE due_date >= ?1 AND due_date <= ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok((row.0.unwrap_or(0), row.1.unwrap_or(0)))
    }
}

/// Generates a new ledger entry ID.
pub fn generate_entry_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Utc;
    use lojix_core::EntryDirection;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(
        description: &str,
        amount_cents: i64,
        direction: EntryDirection,
        entry_date: NaiveDate,
        due_date: NaiveDate,
    ) -> LedgerEntry {
        LedgerEntry {
            id: generate_entry_id(),
            description: description.to_string(),
            amount_cents,
            direction,
            status: EntryStatus::Pending,
            category: None,
            entry_date,
            due_date,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_due_window_keys_on_due_date_not_entry_date() {
        let db = test_db().await;
        let repo = db.ledger();
        let due_inside = entry(
            "Venda a prazo",
            1_000,
            EntryDirection::Inflow,
            date(2026, 7, 25), // recorded before the window
            date(2026, 8, 4),  // but the cash moves inside it
        );
        let due_outside = entry(
            "Venda balcao",
            2_000,
            EntryDirection::Inflow,
            date(2026, 8, 10), // recorded inside the window
            date(2026, 9, 10), // cash moves after it
        );
        repo.insert(&due_inside).await.unwrap();
        repo.insert(&due_outside).await.unwrap();

        let in_window = repo
            .list_due_between(date(2026, 8, 1), date(2026, 8, 31))
            .await
            .unwrap();
        assert_eq!(in_window.len(), 1);
        assert_eq!(in_window[0].id, due_inside.id);
    }

    #[tokio::test]
    async fn test_due_between_is_ordered_by_due_date() {
        let db = test_db().await;
        let repo = db.ledger();
        let later = entry(
            "NF 42",
            5_000,
            EntryDirection::Outflow,
            date(2026, 8, 1),
            date(2026, 8, 25),
        );
        let sooner = entry(
            "NF 43",
            3_000,
            EntryDirection::Outflow,
            date(2026, 8, 2),
            date(2026, 8, 12),
        );
        repo.insert(&later).await.unwrap();
        repo.insert(&sooner).await.unwrap();

        let due = repo
            .list_due_between(date(2026, 8, 1), date(2026, 8, 31))
            .await
            .unwrap();
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].id, sooner.id);
        assert_eq!(due[1].id, later.id);
    }

    #[tokio::test]
    async fn test_status_toggle_persists() {
        let db = test_db().await;
        let repo = db.ledger();
        let e = entry(
            "Recebimento cartao",
            7_500,
            EntryDirection::Inflow,
            date(2026, 8, 5),
            date(2026, 9, 5),
        );
        repo.insert(&e).await.unwrap();

        repo.set_status(&e.id, EntryStatus::Paid).await.unwrap();

        let stored = repo.get_by_id(&e.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EntryStatus::Paid);

        let missing = repo.set_status("no-such-id", EntryStatus::Paid).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_window_totals_sum_per_direction() {
        let db = test_db().await;
        let repo = db.ledger();
        let window = (date(2026, 8, 1), date(2026, 8, 31));
        repo.insert(&entry("in 1", 1_000, EntryDirection::Inflow, date(2026, 8, 3), date(2026, 8, 10)))
            .await
            .unwrap();
        repo.insert(&entry("in 2", 2_500, EntryDirection::Inflow, date(2026, 8, 9), date(2026, 8, 18)))
            .await
            .unwrap();
        repo.insert(&entry("out 1", 900, EntryDirection::Outflow, date(2026, 8, 4), date(2026, 8, 14)))
            .await
            .unwrap();
        // Recorded in August but the cash moves in September
        repo.insert(&entry("out 2", 5_000, EntryDirection::Outflow, date(2026, 8, 20), date(2026, 9, 20)))
            .await
            .unwrap();

        let (inflow, outflow) = repo.window_totals(window.0, window.1).await.unwrap();
        assert_eq!(inflow, 3_500);
        assert_eq!(outflow, 900);
    }
}
