//! # Invoice Session
//!
//! One operator composing one invoice at a time.
//!
//! ## Session State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  start() ──► draft { number: INV-00007, items: [] }                     │
//! │                 │                                                       │
//! │                 │ add_product / draft_mut().items.set_quantity(..)      │
//! │                 ▼                                                       │
//! │  submit() ──┬── Ok  ──► draft.reset(INV-00008)                          │
//! │             └── Err ──► draft untouched, operator fixes and retries     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is owned by its caller and mutated through `&mut self`;
//! sharing one draft between tasks is not supported.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::export::{ExportOptions, InvoiceView};
use tally_core::{InvoiceDraft, Product, TaxMode, Totals};
use tracing::{debug, info, warn};

use crate::database::Database;
use crate::error::{ExportError, InvoiceError, StoreResult};
use crate::export::InvoiceExporter;
use crate::notice::Notice;

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInvoice {
    pub id: String,
    pub invoice_number: String,
}

impl SavedInvoice {
    pub fn notice(&self) -> Notice {
        Notice::invoice_created(&self.invoice_number)
    }
}

/// A draft bound to the store it will be saved in.
#[derive(Debug)]
pub struct InvoiceSession {
    db: Database,
    draft: InvoiceDraft,
}

impl InvoiceSession {
    /// Opens a session with a freshly allocated invoice number.
    pub async fn start(db: Database, issue_date: NaiveDate, tax_mode: TaxMode) -> Self {
        let number = db.numbers().next_number().await;
        info!(invoice_number = %number, %tax_mode, "Invoice session started");

        InvoiceSession {
            db,
            draft: InvoiceDraft::new(number, issue_date, tax_mode),
        }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut InvoiceDraft {
        &mut self.draft
    }

    pub fn totals(&self) -> Totals {
        self.draft.totals()
    }

    /// Catalog matches for the product picker.
    pub async fn search_catalog(&self, query: &str) -> StoreResult<Vec<Product>> {
        self.db.products().search(query).await
    }

    /// Adds a product, or bumps its quantity if already on the draft.
    ///
    /// `None` when the invoice totals would overflow; the draft is unchanged.
    pub fn add_product(&mut self, product: &Product) -> Option<usize> {
        let index = self.draft.items.add(product);
        match index {
            Some(index) => debug!(product_id = %product.id, index, "Product added to draft"),
            None => warn!(product_id = %product.id, "Product not added, invoice total out of range"),
        }
        index
    }

    /// Saves the draft and starts the next one.
    ///
    /// On any error the draft is left exactly as it was.
    pub async fn submit(&mut self) -> Result<SavedInvoice, InvoiceError> {
        let id = self.db.invoices().save(&self.draft).await?;
        let saved = SavedInvoice {
            id,
            invoice_number: self.draft.invoice_number.clone(),
        };

        let next = self.db.numbers().next_number().await;
        self.draft.reset(next);

        Ok(saved)
    }

    /// [`submit`](Self::submit), reported as a notice.
    pub async fn submit_with_notice(&mut self) -> (Result<SavedInvoice, InvoiceError>, Notice) {
        let result = self.submit().await;
        let notice = match &result {
            Ok(saved) => saved.notice(),
            Err(err) => Notice::from(err),
        };
        (result, notice)
    }

    /// Printable view of the current draft.
    pub fn preview(&self) -> InvoiceView {
        InvoiceView::from_draft(&self.draft)
    }

    /// Exports the current draft with the default invoice options.
    pub async fn export(&self, exporter: &dyn InvoiceExporter) -> Result<PathBuf, ExportError> {
        let options = ExportOptions::for_invoice(&self.draft.invoice_number);
        let view = self.preview();
        exporter.export(Some(&view), &options).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
