//! # Repository Module
//!
//! Database repository implementations for Lojix.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Workflow (lojix-ops)                                                  │
//! │       │                                                                 │
//! │       │  db.catalog().get_by_barcode("78912...")                        │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CatalogRepository                                                     │
//! │  ├── get_by_internal_code(&self, code)                                 │
//! │  ├── get_by_barcode(&self, barcode)                                    │
//! │  ├── insert(&self, product)                                            │
//! │  └── adjust_stock(&self, id, delta)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Product CRUD, lookups, stock deltas
//! - [`orders::OrderRepository`] - Orders, line snapshots, status transitions
//! - [`ledger::LedgerRepository`] - Cash-flow entries and window queries

pub mod catalog;
pub mod ledger;
pub mod orders;
