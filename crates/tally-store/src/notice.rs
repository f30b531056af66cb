//! # Operator Notices
//!
//! Every invoice operation ends in exactly one notice: the single place
//! where errors stop propagating and become something to show.
//!
//! ```text
//! InvoiceError::Validation(Required)  → "Missing Information"
//! InvoiceError::Validation(Empty)     → "Empty Invoice"
//! InvoiceError::Persistence / NotFound→ "Error"
//! InvoiceError::PartialWrite          → "Invoice Saved Without Sale"
//! ExportError::*                      → "Error"
//! success                             → "Invoice Created"
//! ```

use serde::Serialize;
use tally_core::ValidationError;

use crate::error::{ExportError, InvoiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Error,
}

/// A title and message for the operator.
///
/// ## Serialization
/// ```json
/// {
///   "title": "Invoice Created",
///   "message": "Invoice INV-00042 has been created successfully.",
///   "severity": "info"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    fn new(title: &str, message: impl Into<String>, severity: Severity) -> Self {
        Notice {
            title: title.to_string(),
            message: message.into(),
            severity,
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Error)
    }

    pub fn invoice_created(invoice_number: &str) -> Self {
        Self::new(
            "Invoice Created",
            format!("Invoice {} has been created successfully.", invoice_number),
            Severity::Info,
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl From<&InvoiceError> for Notice {
    fn from(err: &InvoiceError) -> Self {
        match err {
            InvoiceError::Validation(ValidationError::Empty { field }) if field == "items" => {
                Notice::error("Empty Invoice", "Please add at least one product to the invoice.")
            }
            InvoiceError::Validation(ValidationError::Required { field })
                if field == "client name" =>
            {
                Notice::error("Missing Information", "Please enter client name.")
            }
            InvoiceError::Validation(ValidationError::OutOfRange { field, .. })
                if field == "total" =>
            {
                Notice::error("Invoice Too Large", "The invoice total is too large to save.")
            }
            InvoiceError::Validation(other) => Notice::error("Missing Information", other.to_string()),
            InvoiceError::PartialWrite { .. } => Notice::error(
                "Invoice Saved Without Sale",
                "The invoice was saved but its sale record was not. Run reconciliation to repair it.",
            ),
            InvoiceError::NotFound { .. } => {
                Notice::error("Invoice Not Found", "The invoice no longer exists.")
            }
            InvoiceError::Persistence(_) => {
                Notice::error("Error", "Failed to save the invoice. Please try again.")
            }
        }
    }
}

impl From<&ExportError> for Notice {
    fn from(err: &ExportError) -> Self {
        match err {
            ExportError::MissingView => {
                Notice::error("Error", "Could not generate PDF. Please try again.")
            }
            ExportError::Render(_) | ExportError::Io { .. } => {
                Notice::error("Error", "Failed to generate PDF. Please try again.")
            }
        }
    }
}
