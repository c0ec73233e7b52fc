//! # Invoice Reconciler
//!
//! Applies a parsed supplier invoice to the catalog and the cash-flow ledger.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Invoice Reconciliation                              │
//! │                                                                         │
//! │  InvoiceDocument (already parsed)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  For each line, independently:                                         │
//! │    1. match by internal_code ── miss ──► match by barcode              │
//! │    2a. MATCH:  stock += qty, cost/supplier/unit ← invoice line         │
//! │    2b. MISS:   create product, stock = qty, price = cost × 1.5         │
//! │    (a failed line is recorded and the loop continues)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LAST: one ledger entry (outflow, pending, declared grand total)       │
//! │                                                                         │
//! │  Write ordering is deliberate: stock first, ledger last. If the        │
//! │  ledger write fails the stock changes stand and the outcome says so    │
//! │  — a missing payable is recoverable by hand, phantom stock is not.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use lojix_core::{
    validation::validate_quantity, EntryDirection, EntryStatus, InvoiceDocument, InvoiceLine,
    LedgerEntry, Money, Product, ValidationError, NEW_PRODUCT_MARKUP_BPS,
};
use lojix_db::Database;

use crate::error::OpsResult;

/// Ledger category written for every imported invoice.
const STOCK_PURCHASE_CATEGORY: &str = "stock-purchase";

// =============================================================================
// Outcome Types
// =============================================================================

/// One invoice line the reconciler could not apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineFailure {
    /// Zero-based position of the line in the document.
    pub line_index: usize,
    /// Product description from the failed line, for operator review.
    pub description: String,
    /// Why the line was skipped.
    pub reason: String,
}

/// Result of the final ledger write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerWrite {
    /// The payable entry was recorded.
    Recorded { entry_id: String },
    /// The entry could not be written. Stock changes from this import
    /// stand; the payable must be entered by hand.
    Failed { reason: String },
}

/// Report of one invoice import.
///
/// Returned on success even when individual lines failed; only
/// whole-document problems (empty invoice) surface as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Invoice number, echoed for logging and operator review.
    pub invoice_number: String,
    /// Products created from unmatched lines.
    pub created: usize,
    /// Products updated from matched lines.
    pub updated: usize,
    /// Lines that were skipped, with reasons.
    pub line_failures: Vec<LineFailure>,
    /// Whether the payable ledger entry was written.
    pub ledger: LedgerWrite,
}

// =============================================================================
// Reconciler
// =============================================================================

/// Applies parsed supplier invoices to the catalog and ledger.
///
/// ## Usage
/// ```rust,ignore
/// let reconciler = Reconciler::new(db.clone());
/// let outcome = reconciler.import_invoice(&document).await?;
/// println!("created {} updated {}", outcome.created, outcome.updated);
/// ```
#[derive(Debug, Clone)]
pub struct Reconciler {
    db: Database,
}

impl Reconciler {
    /// Creates a new Reconciler.
    pub fn new(db: Database) -> Self {
        Reconciler { db }
    }

    /// Imports one parsed invoice.
    ///
    /// ## Failure Policy
    /// Lines are independent: a bad line is recorded in the outcome and
    /// the remaining lines still apply. There is no rollback of lines that
    /// already wrote. The single whole-document rejection is an invoice
    /// with zero lines, which has nothing to reconcile.
    pub async fn import_invoice(&self, doc: &InvoiceDocument) -> OpsResult<ReconcileOutcome> {
        debug!(
            invoice = %doc.number,
            issuer = %doc.issuer_name,
            lines = doc.lines.len(),
            "Importing invoice"
        );

        if doc.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "lines".to_string(),
            }
            .into());
        }

        let mut created = 0;
        let mut updated = 0;
        let mut line_failures = Vec::new();

        for (index, line) in doc.lines.iter().enumerate() {
            match self.apply_line(doc, line).await {
                Ok(LineApplied::Created) => created += 1,
                Ok(LineApplied::Updated) => updated += 1,
                Err(reason) => {
                    warn!(invoice = %doc.number, line = index, %reason, "Invoice line skipped");
                    line_failures.push(LineFailure {
                        line_index: index,
                        description: line.description.clone(),
                        reason,
                    });
                }
            }
        }

        // Ledger write comes last so a crash mid-import leaves the
        // recoverable half (stock moved, payable missing).
        let ledger = match self.record_payable(doc).await {
            Ok(entry_id) => LedgerWrite::Recorded { entry_id },
            Err(e) => {
                warn!(invoice = %doc.number, error = %e, "Payable entry failed after stock changes");
                LedgerWrite::Failed {
                    reason: e.to_string(),
                }
            }
        };

        info!(
            invoice = %doc.number,
            created,
            updated,
            failed = line_failures.len(),
            "Invoice import finished"
        );

        Ok(ReconcileOutcome {
            invoice_number: doc.number.clone(),
            created,
            updated,
            line_failures,
            ledger,
        })
    }

    /// Applies a single line: update the matched product, or create one.
    ///
    /// Returns the per-line failure reason as a String so the caller can
    /// collect it without aborting the import.
    async fn apply_line(
        &self,
        doc: &InvoiceDocument,
        line: &InvoiceLine,
    ) -> Result<LineApplied, String> {
        validate_quantity(line.quantity).map_err(|e| e.to_string())?;

        match self.find_match(line).await.map_err(|e| e.to_string())? {
            Some(mut product) => {
                // Stock moves first, as a delta; then last-invoice-wins
                // overwrites for cost, supplier, and unit.
                self.db
                    .catalog()
                    .adjust_stock(&product.id, line.quantity)
                    .await
                    .map_err(|e| e.to_string())?;

                product.cost_cents = Some(line.unit_cost_cents);
                product.supplier = Some(doc.issuer_name.clone());
                if line.unit.is_some() {
                    product.unit = line.unit.clone();
                }
                self.db
                    .catalog()
                    .update(&product)
                    .await
                    .map_err(|e| e.to_string())?;

                debug!(product_id = %product.id, qty = line.quantity, "Invoice line matched");
                Ok(LineApplied::Updated)
            }
            None => {
                let product = product_from_line(doc, line);
                self.db
                    .catalog()
                    .insert(&product)
                    .await
                    .map_err(|e| e.to_string())?;

                debug!(product_id = %product.id, name = %product.name, "Invoice line created product");
                Ok(LineApplied::Created)
            }
        }
    }

    /// Finds the catalog product for a line: internal code first, barcode
    /// second. The barcode is pre-normalized, so the "SEM GTIN" sentinel
    /// never reaches the database.
    async fn find_match(&self, line: &InvoiceLine) -> OpsResult<Option<Product>> {
        if let Some(code) = line.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            if let Some(product) = self.db.catalog().get_by_internal_code(code).await? {
                return Ok(Some(product));
            }
        }

        if let Some(barcode) = line.lookup_barcode() {
            if let Some(product) = self.db.catalog().get_by_barcode(barcode).await? {
                return Ok(Some(product));
            }
        }

        Ok(None)
    }

    /// Writes the single payable entry for the whole invoice.
    async fn record_payable(&self, doc: &InvoiceDocument) -> OpsResult<String> {
        let now = Utc::now();
        let date = doc.issue_date.unwrap_or_else(|| now.date_naive());

        let entry = LedgerEntry {
            id: Uuid::new_v4().to_string(),
            description: format!("NF {} - {}", doc.number, doc.issuer_name),
            amount_cents: doc.total_cents,
            direction: EntryDirection::Outflow,
            status: EntryStatus::Pending,
            category: Some(STOCK_PURCHASE_CATEGORY.to_string()),
            entry_date: date,
            due_date: date,
            created_at: now,
        };

        self.db.ledger().insert(&entry).await?;
        Ok(entry.id)
    }
}

enum LineApplied {
    Created,
    Updated,
}

/// Builds a new catalog product from an unmatched invoice line.
///
/// The sale price is seeded at cost × 1.5 so the product is sellable
/// immediately; the owner adjusts it later.
fn product_from_line(doc: &InvoiceDocument, line: &InvoiceLine) -> Product {
    let now = Utc::now();
    let cost = Money::from_cents(line.unit_cost_cents);

    Product {
        id: Uuid::new_v4().to_string(),
        name: line.description.clone(),
        internal_code: line.code.clone(),
        barcode: line.lookup_barcode().map(String::from),
        fiscal_code: line.fiscal_code.clone(),
        price_cents: cost.apply_bps(NEW_PRODUCT_MARKUP_BPS).cents(),
        cost_cents: Some(line.unit_cost_cents),
        stock: line.quantity,
        supplier: Some(doc.issuer_name.clone()),
        unit: line.unit.clone(),
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lojix_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn invoice(lines: Vec<InvoiceLine>) -> InvoiceDocument {
        InvoiceDocument {
            issuer_name: "Fornecedor SA".to_string(),
            issuer_tax_id: Some("12345678000190".to_string()),
            number: "000123".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 8, 10),
            total_cents: 50_000,
            lines,
        }
    }

    fn line(code: &str, barcode: Option<&str>, qty: i64, unit_cost: i64) -> InvoiceLine {
        InvoiceLine {
            code: Some(code.to_string()),
            description: format!("Produto {}", code),
            fiscal_code: Some("12345678".to_string()),
            unit: Some("UN".to_string()),
            quantity: qty,
            unit_cost_cents: unit_cost,
            line_total_cents: qty * unit_cost,
            barcode: barcode.map(String::from),
        }
    }

    fn existing_product(internal_code: &str, barcode: Option<&str>, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4().to_string(),
            name: "Produto Existente".to_string(),
            internal_code: Some(internal_code.to_string()),
            barcode: barcode.map(String::from),
            fiscal_code: None,
            price_cents: 1500,
            cost_cents: Some(800),
            stock,
            supplier: None,
            unit: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_matched_line_bumps_stock_and_overwrites_cost() {
        let db = test_db().await;
        let product = existing_product("P-001", None, 4);
        db.catalog().insert(&product).await.unwrap();

        let reconciler = Reconciler::new(db.clone());
        let outcome = reconciler
            .import_invoice(&invoice(vec![line("P-001", None, 10, 650)]))
            .await
            .unwrap();

        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.created, 0);
        assert!(outcome.line_failures.is_empty());

        let updated = db.catalog().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(updated.stock, 14);
        assert_eq!(updated.cost_cents, Some(650));
        assert_eq!(updated.supplier.as_deref(), Some("Fornecedor SA"));
        // Sale price of an existing product is never touched
        assert_eq!(updated.price_cents, 1500);
    }

    #[tokio::test]
    async fn test_unmatched_line_creates_product_with_markup() {
        let db = test_db().await;
        let reconciler = Reconciler::new(db.clone());

        let outcome = reconciler
            .import_invoice(&invoice(vec![line("NEW-01", Some("7891234567895"), 6, 1000)]))
            .await
            .unwrap();

        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.updated, 0);

        let created = db
            .catalog()
            .get_by_internal_code("NEW-01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.stock, 6);
        assert_eq!(created.cost_cents, Some(1000));
        assert_eq!(created.price_cents, 1500); // cost × 1.5
        assert_eq!(created.supplier.as_deref(), Some("Fornecedor SA"));
    }

    #[tokio::test]
    async fn test_barcode_fallback_match() {
        let db = test_db().await;
        let product = existing_product("OLD-CODE", Some("7890000000017"), 2);
        db.catalog().insert(&product).await.unwrap();

        let reconciler = Reconciler::new(db.clone());
        // Line carries a different internal code but the same barcode
        let outcome = reconciler
            .import_invoice(&invoice(vec![line("OTHER", Some("7890000000017"), 3, 500)]))
            .await
            .unwrap();

        assert_eq!(outcome.updated, 1);
        let updated = db.catalog().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(updated.stock, 5);
    }

    #[tokio::test]
    async fn test_sentinel_barcode_is_never_matched_or_stored() {
        let db = test_db().await;
        // A product that (wrongly) carries the sentinel as its barcode must
        // not attract unrelated lines.
        let product = existing_product("X-01", Some("SEM GTIN"), 1);
        db.catalog().insert(&product).await.unwrap();

        let reconciler = Reconciler::new(db.clone());
        let outcome = reconciler
            .import_invoice(&invoice(vec![line("UNRELATED", Some("SEM GTIN"), 2, 300)]))
            .await
            .unwrap();

        // No match happened: a new product was created instead
        assert_eq!(outcome.created, 1);
        let created = db
            .catalog()
            .get_by_internal_code("UNRELATED")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.barcode, None);

        // Existing product untouched
        let untouched = db.catalog().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(untouched.stock, 1);
    }

    #[tokio::test]
    async fn test_exactly_one_ledger_entry_with_declared_total() {
        let db = test_db().await;
        let reconciler = Reconciler::new(db.clone());

        let doc = invoice(vec![
            line("A-1", None, 2, 100),
            line("A-2", None, 3, 200),
        ]);
        let outcome = reconciler.import_invoice(&doc).await.unwrap();

        let entry_id = match outcome.ledger {
            LedgerWrite::Recorded { entry_id } => entry_id,
            LedgerWrite::Failed { reason } => panic!("ledger write failed: {}", reason),
        };

        let entry = db.ledger().get_by_id(&entry_id).await.unwrap().unwrap();
        // Declared grand total, not the sum of lines
        assert_eq!(entry.amount_cents, 50_000);
        assert_eq!(entry.direction, EntryDirection::Outflow);
        assert_eq!(entry.status, EntryStatus::Pending);
        assert_eq!(entry.entry_date, NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());

        let all = db
            .ledger()
            .list_due_between(
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_line_does_not_stop_the_rest() {
        let db = test_db().await;
        let reconciler = Reconciler::new(db.clone());

        let doc = invoice(vec![
            line("B-1", None, 0, 100), // invalid quantity
            line("B-2", None, 5, 200),
        ]);
        let outcome = reconciler.import_invoice(&doc).await.unwrap();

        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.line_failures.len(), 1);
        assert_eq!(outcome.line_failures[0].line_index, 0);

        assert!(db
            .catalog()
            .get_by_internal_code("B-2")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_empty_invoice_is_rejected() {
        let db = test_db().await;
        let reconciler = Reconciler::new(db.clone());

        let result = reconciler.import_invoice(&invoice(vec![])).await;
        assert!(result.is_err());

        // Nothing was written, including the ledger entry
        assert_eq!(db.catalog().count().await.unwrap(), 0);
    }
}
