//! # Store Error Types
//!
//! Error types for persistence, invoice submission, export and config.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / serde_json::Error                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError ← one vocabulary for every document store adapter           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InvoiceError ← what a save / get actually meant for the operator       │
//! │       │           (validation, persistence, not found, partial write)   │
//! │       ▼                                                                 │
//! │  Notice ← title + message shown to the operator                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tally_core::ValidationError;
use thiserror::Error;

// =============================================================================
// Store Error
// =============================================================================

/// Document store errors.
///
/// Shared by the SQLite and in-memory adapters so callers never see a
/// backend-specific error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found in its collection.
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    /// A stored record does not decode into its typed entity.
    ///
    /// ## When This Occurs
    /// - Unknown or missing fields
    /// - Wrong field types
    /// - Invoice totals that disagree with its items
    #[error("Malformed {collection} record {id}: {reason}")]
    Malformed {
        collection: String,
        id: String,
        reason: String,
    },

    /// Input rejected before anything was written.
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),

    /// A value could not be turned into a JSON document.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The store cannot be reached at all.
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// Internal database error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a collection and id.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a Malformed error.
    pub fn malformed(
        collection: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StoreError::Malformed {
            collection: collection.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed     → StoreError::Unavailable
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                collection: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::Unavailable("Pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Invoice Error
// =============================================================================

/// Outcome of saving or fetching an invoice.
///
/// ## Variants vs State
/// ```text
/// ┌──────────────┬──────────────────────┬────────────────────────────────┐
/// │ Variant      │ Persisted state      │ Draft                          │
/// ├──────────────┼──────────────────────┼────────────────────────────────┤
/// │ Validation   │ unchanged            │ kept                           │
/// │ Persistence  │ unchanged            │ kept                           │
/// │ PartialWrite │ invoice, NO sale     │ kept; reconcile() repairs      │
/// │ NotFound     │ n/a (read)           │ n/a                            │
/// └──────────────┴──────────────────────┴────────────────────────────────┘
/// ```
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Missing client name or no line items.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store rejected a read or the invoice write.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// No invoice with this id.
    #[error("Invoice not found: {id}")]
    NotFound { id: String },

    /// The invoice was written but its sale record was not.
    #[error("Invoice {invoice_id} saved without its sale record: {source}")]
    PartialWrite {
        invoice_id: String,
        source: StoreError,
    },
}

// =============================================================================
// Export Error
// =============================================================================

/// Document export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to render.
    #[error("No invoice view to export")]
    MissingView,

    /// The template could not be rendered.
    #[error("Failed to render invoice: {0}")]
    Render(String),

    /// Writing the output failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
