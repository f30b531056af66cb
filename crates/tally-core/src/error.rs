//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule failures                            │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                    │
//! │  ├── StoreError       - Document store failures                         │
//! │  └── InvoiceError     - Submit outcome (validation / persistence)       │
//! │                                                                         │
//! │  Presentation                                                           │
//! │  └── Notice           - Title + description shown to the operator       │
//! │                                                                         │
//! │  Flow: ValidationError → InvoiceError → Notice → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A draft cannot be committed as an invoice.
    ///
    /// ## When This Occurs
    /// - Client name is blank
    /// - The draft has no line items
    #[error("Invoice cannot be saved: {0}")]
    Incomplete(#[from] ValidationError),

    /// A stored invoice whose figures disagree with its own items.
    #[error("Invoice {invoice_number} is inconsistent: {reason}")]
    InconsistentInvoice {
        invoice_number: String,
        reason: String,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must have at least one entry is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. non-numeric quantity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
