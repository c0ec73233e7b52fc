//! # lojix-db: Database Layer for Lojix
//!
//! This crate provides database access for the Lojix back office.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Lojix Data Flow                                │
//! │                                                                         │
//! │  Workflow (reconcile invoice, place order, run expiry sweep)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     lojix-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (catalog.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CatalogRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ OrderRepo     │    │ ...          │  │   │
//! │  │   │ Management    │    │ LedgerRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (single file, WAL mode)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (catalog, orders, ledger)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lojix_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/lojix.db");
//! let db = Database::new(config).await?;
//!
//! let products = db.catalog().list_low_stock(5, 10).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::orders::{OrderHistoryFilter, OrderRepository};
