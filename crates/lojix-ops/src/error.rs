//! # Workflow Error Types
//!
//! Combined error type for multi-step flows.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  lojix_core::CoreError        lojix_db::DbError                        │
//! │  (validation, domain rules)   (SQL, constraints, pool)                 │
//! │            │                          │                                 │
//! │            └────────────┬─────────────┘                                 │
//! │                         ▼                                               │
//! │                 OpsError (this module)                                 │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  Caller decides: surface to the user, or collect into an outcome       │
//! │  report (the flows themselves swallow per-item errors into reports     │
//! │  and only return OpsError for whole-operation failures)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use lojix_core::CoreError;
use lojix_db::DbError;

/// Errors that abort an entire workflow operation.
///
/// Per-item failures inside a flow (one bad invoice line, one order the
/// sweep could not cancel) never become an `OpsError`; they are collected
/// into the flow's outcome report instead.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Domain rule or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<lojix_core::ValidationError> for OpsError {
    fn from(err: lojix_core::ValidationError) -> Self {
        OpsError::Core(CoreError::Validation(err))
    }
}

/// Result type for workflow operations.
pub type OpsResult<T> = Result<T, OpsError>;
