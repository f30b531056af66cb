//! # Invoice Number Allocator
//!
//! ```text
//! count("invoices") ── Ok(n)  ──► INV-{n+1:05}
//!                   └─ Err    ──► INV-{last 5 digits of now in ms}
//! ```
//!
//! Count-then-format is not transactional: two sessions opened at the same
//! time get the same number, and the fallback can collide.

use std::sync::Arc;

use chrono::Utc;
use tally_core::numbering::{fallback_number, sequential_number};
use tracing::{debug, warn};

use crate::document::{Collection, DocumentStore};

/// Hands out the number for the next invoice.
#[derive(Debug, Clone)]
pub struct InvoiceNumberAllocator {
    store: Arc<dyn DocumentStore>,
}

impl InvoiceNumberAllocator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        InvoiceNumberAllocator { store }
    }

    /// Next invoice number. Never fails.
    pub async fn next_number(&self) -> String {
        match self.store.count(Collection::Invoices).await {
            Ok(count) => {
                let number = sequential_number(count);
                debug!(count, %number, "Allocated invoice number");
                number
            }
            Err(e) => {
                let number = fallback_number(Utc::now().timestamp_millis());
                warn!(error = %e, %number, "Invoice count unavailable, using time-based number");
                number
            }
        }
    }
}
