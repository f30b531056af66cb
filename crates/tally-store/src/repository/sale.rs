//! # Sale Repository
//!
//! Read side of the sales collection, plus repair of invoices whose sale
//! record was never written.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. SAVE INVOICE                                                        │
//! │     └── InvoiceRepository::save() → Invoice + Sale { date: now }        │
//! │                                                                         │
//! │  2. (ON PARTIAL WRITE) RECONCILE                                        │
//! │     └── reconcile() → Sale { date: invoice issue date }                 │
//! │                                                                         │
//! │  3. READ                                                                │
//! │     └── list() / ledger() → newest first, joined with invoice numbers   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are never updated or deleted.

use std::collections::HashSet;
use std::sync::Arc;

use tally_core::report::{self, SaleEntry};
use tally_core::{NewSale, Sale};
use tracing::{debug, info};

use crate::document::{decode_all, encode, Collection, DocumentStore};
use crate::error::StoreResult;
use crate::repository::invoice::InvoiceRepository;

/// Repository for the `sales` collection.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    store: Arc<dyn DocumentStore>,
}

impl SaleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        SaleRepository { store }
    }

    /// All sales, newest first.
    pub async fn list(&self) -> StoreResult<Vec<Sale>> {
        let docs = self.store.list_all(Collection::Sales).await?;
        let mut sales: Vec<Sale> = decode_all(Collection::Sales, docs)?;
        sales.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(sales)
    }

    /// Sales joined with the number of their invoice, newest first.
    pub async fn ledger(&self) -> StoreResult<Vec<SaleEntry>> {
        let invoices = InvoiceRepository::new(self.store.clone());
        let (sales, invoices) = tokio::try_join!(self.list(), invoices.list())?;

        Ok(report::ledger(sales, &invoices))
    }

    /// Appends a sale record.
    pub async fn record(&self, sale: NewSale) -> StoreResult<Sale> {
        let id = self
            .store
            .create_record(Collection::Sales, encode(&sale)?)
            .await?;

        debug!(%id, invoice_id = %sale.invoice_id, "Sale recorded");
        Ok(sale.with_id(id))
    }

    /// Creates the missing sale for every invoice that has none.
    ///
    /// The repaired sale copies the invoice total and is dated on the
    /// invoice's issue date. Returns the sales that were created.
    pub async fn reconcile(&self) -> StoreResult<Vec<Sale>> {
        let invoices = InvoiceRepository::new(self.store.clone());
        let (sales, invoices) = tokio::try_join!(self.list(), invoices.list())?;

        let covered: HashSet<&str> = sales.iter().map(|s| s.invoice_id.as_str()).collect();

        let mut repaired = Vec::new();
        for invoice in invoices.iter().filter(|i| !covered.contains(i.id.as_str())) {
            let sale = NewSale::for_invoice(&invoice.id, invoice.total_amount(), invoice.date);
            repaired.push(self.record(sale).await?);
        }

        if !repaired.is_empty() {
            info!(count = repaired.len(), "Reconciled invoices without sales");
        }
        Ok(repaired)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
