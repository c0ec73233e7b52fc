//! # Invoice Module
//!
//! Structured invoice documents and the parser seam for supplier-invoice
//! reconciliation.
//!
//! ## Document Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invoice Reconciliation                            │
//! │                                                                         │
//! │  Raw file (XML, etc.)                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  InvoiceParser impl (lives outside this crate)                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  InvoiceDocument ── lojix-ops Reconciler ──► catalog + ledger writes    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate only defines the parsed shape; turning a vendor file format
//! into an [`InvoiceDocument`] is the parser's problem.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::NO_BARCODE_SENTINEL;

// =============================================================================
// Document Types
// =============================================================================

/// A parsed supplier invoice, ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    /// Issuing supplier's display name.
    pub issuer_name: String,
    /// Issuer tax id, when the source document carries one.
    pub issuer_tax_id: Option<String>,
    /// Document number as printed on the invoice.
    pub number: String,
    /// Issue date, when present on the document.
    pub issue_date: Option<NaiveDate>,
    /// Invoice grand total in cents.
    pub total_cents: i64,
    /// Product lines in document order.
    pub lines: Vec<InvoiceLine>,
}

impl InvoiceDocument {
    /// Sum of line totals in cents. May differ from `total_cents` when the
    /// document includes freight or discounts outside the product lines.
    pub fn lines_total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents).sum()
    }
}

/// A single product line on a supplier invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Supplier's internal product code.
    pub code: Option<String>,
    /// Product description as printed.
    pub description: String,
    /// Fiscal classification code (NCM or equivalent).
    pub fiscal_code: Option<String>,
    /// Commercial unit (UN, KG, CX, ...).
    pub unit: Option<String>,
    /// Quantity purchased, in whole units.
    pub quantity: i64,
    /// Unit cost in cents.
    pub unit_cost_cents: i64,
    /// Line total in cents.
    pub line_total_cents: i64,
    /// Barcode (EAN/GTIN), already normalized by the parser or by
    /// [`normalize_barcode`].
    pub barcode: Option<String>,
}

impl InvoiceLine {
    /// Barcode usable as a catalog lookup key, if any.
    ///
    /// Runs [`normalize_barcode`] so callers never match products against
    /// the "SEM GTIN" placeholder some issuers emit instead of a real code.
    pub fn lookup_barcode(&self) -> Option<&str> {
        self.barcode.as_deref().and_then(normalize_barcode)
    }
}

/// Normalizes a raw barcode field from an invoice.
///
/// Returns `None` for empty strings and for the "SEM GTIN" placeholder
/// (case-insensitive) that issuers use when a product has no barcode.
///
/// ## Example
/// ```rust
/// use lojix_core::invoice::normalize_barcode;
///
/// assert_eq!(normalize_barcode("7891234567895"), Some("7891234567895"));
/// assert_eq!(normalize_barcode("SEM GTIN"), None);
/// assert_eq!(normalize_barcode("  "), None);
/// ```
pub fn normalize_barcode(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_BARCODE_SENTINEL) {
        return None;
    }
    Some(trimmed)
}

// =============================================================================
// Parser Seam
// =============================================================================

/// Errors produced while turning a raw file into an [`InvoiceDocument`].
#[derive(Debug, Error)]
pub enum InvoiceParseError {
    /// The input is not a recognizable invoice document.
    #[error("unrecognized invoice format: {0}")]
    UnrecognizedFormat(String),

    /// The document was recognized but a required field is missing or bad.
    #[error("malformed invoice field '{field}': {reason}")]
    MalformedField { field: String, reason: String },
}

/// Converts a raw invoice file into a structured [`InvoiceDocument`].
///
/// Implementations live at the application edge; the reconciler only ever
/// sees the parsed document.
pub trait InvoiceParser {
    fn parse(&self, raw: &[u8]) -> Result<InvoiceDocument, InvoiceParseError>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(barcode: Option<&str>) -> InvoiceLine {
        InvoiceLine {
            code: Some("P-001".to_string()),
            description: "Test Product".to_string(),
            fiscal_code: Some("12345678".to_string()),
            unit: Some("UN".to_string()),
            quantity: 10,
            unit_cost_cents: 500,
            line_total_cents: 5000,
            barcode: barcode.map(String::from),
        }
    }

    #[test]
    fn test_normalize_barcode() {
        assert_eq!(normalize_barcode("7891234567895"), Some("7891234567895"));
        assert_eq!(normalize_barcode(" 789 "), Some("789"));
        assert_eq!(normalize_barcode("SEM GTIN"), None);
        assert_eq!(normalize_barcode("sem gtin"), None);
        assert_eq!(normalize_barcode(""), None);
        assert_eq!(normalize_barcode("   "), None);
    }

    #[test]
    fn test_lookup_barcode_skips_sentinel() {
        assert_eq!(line(Some("SEM GTIN")).lookup_barcode(), None);
        assert_eq!(line(None).lookup_barcode(), None);
        assert_eq!(line(Some("789")).lookup_barcode(), Some("789"));
    }

    #[test]
    fn test_lines_total() {
        let doc = InvoiceDocument {
            issuer_name: "Fornecedor SA".to_string(),
            issuer_tax_id: None,
            number: "000123".to_string(),
            issue_date: None,
            total_cents: 10500,
            lines: vec![line(None), line(Some("789"))],
        };
        assert_eq!(doc.lines_total_cents(), 10000);
    }
}
