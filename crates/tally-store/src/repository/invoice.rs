//! # Invoice Repository
//!
//! Saving a draft and reading invoices back.
//!
//! ## Save Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  draft.to_new_invoice()          ─── Err ──► InvoiceError::Validation   │
//! │       │                                      (nothing written)          │
//! │       ▼                                                                 │
//! │  create_record("invoices")       ─── Err ──► InvoiceError::Persistence  │
//! │       │ id                                   (nothing written)          │
//! │       ▼                                                                 │
//! │  create_record("sales")          ─── Err ──► InvoiceError::PartialWrite │
//! │       │                                      (invoice without sale,     │
//! │       ▼                                       see SaleRepository::      │
//! │  Ok(id)                                       reconcile)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two writes are not atomic: the store port has no transactions, and
//! the in-memory adapter has nothing to roll back with.

use std::sync::Arc;

use tally_core::{Invoice, InvoiceDraft, NewSale, Timestamp};
use tracing::{debug, info, warn};

use crate::document::{decode, encode, Collection, Document, DocumentStore};
use crate::error::{InvoiceError, StoreError, StoreResult};

/// Repository for the `invoices` collection.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    store: Arc<dyn DocumentStore>,
}

impl InvoiceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        InvoiceRepository { store }
    }

    /// Persists a draft as an invoice plus its sale record.
    ///
    /// ## Returns
    /// * `Ok(id)` - Store-assigned id of the new invoice
    /// * `Err(InvoiceError::Validation)` - Blank client name or no items
    /// * `Err(InvoiceError::Persistence)` - Invoice write failed
    /// * `Err(InvoiceError::PartialWrite)` - Invoice written, sale not
    pub async fn save(&self, draft: &InvoiceDraft) -> Result<String, InvoiceError> {
        let invoice = draft.to_new_invoice()?;
        let total = invoice.total_amount();

        debug!(
            invoice_number = %invoice.invoice_number,
            items = invoice.items.len(),
            total = %total,
            "Saving invoice"
        );

        let id = self
            .store
            .create_record(Collection::Invoices, encode(&invoice)?)
            .await?;

        let sale = NewSale::for_invoice(&id, total, Timestamp::now());
        let written = match encode(&sale) {
            Ok(fields) => self.store.create_record(Collection::Sales, fields).await,
            Err(e) => Err(e),
        };

        if let Err(source) = written {
            warn!(
                invoice_id = %id,
                invoice_number = %invoice.invoice_number,
                error = %source,
                "Invoice saved without its sale record"
            );
            return Err(InvoiceError::PartialWrite {
                invoice_id: id,
                source,
            });
        }

        info!(
            invoice_id = %id,
            invoice_number = %invoice.invoice_number,
            total = %total,
            "Invoice created"
        );
        Ok(id)
    }

    /// All invoices, newest issue date first.
    ///
    /// Invoices sharing a date keep their storage order.
    pub async fn list(&self) -> StoreResult<Vec<Invoice>> {
        let docs = self.store.list_all(Collection::Invoices).await?;
        let mut invoices = docs
            .into_iter()
            .map(decode_invoice)
            .collect::<StoreResult<Vec<_>>>()?;

        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(invoices)
    }

    /// Gets an invoice by its id.
    pub async fn get(&self, id: &str) -> Result<Invoice, InvoiceError> {
        match self.store.get_record(Collection::Invoices, id).await? {
            Some(doc) => Ok(decode_invoice(doc)?),
            None => Err(InvoiceError::NotFound { id: id.to_string() }),
        }
    }

    /// Number of persisted invoices.
    pub async fn count(&self) -> StoreResult<u64> {
        self.store.count(Collection::Invoices).await
    }
}

/// Decodes an invoice and checks its figures against its items.
fn decode_invoice(doc: Document) -> StoreResult<Invoice> {
    let id = doc.id.clone();
    let invoice: Invoice = decode(Collection::Invoices, doc)?;

    invoice
        .verify()
        .map_err(|e| StoreError::malformed(Collection::Invoices.as_str(), id, e.to_string()))?;

    Ok(invoice)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::testing::FlakyStore;
    use chrono::NaiveDate;
    use serde_json::json;
    use tally_core::{Product, TaxMode, ValidationError};

    fn product(id: &str, price_cents: i64, tax_rate_bps: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            category: "General".to_string(),
            sku: id.to_uppercase(),
            price_cents,
            tax_rate_bps,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn draft(number: &str, date: NaiveDate) -> InvoiceDraft {
        let mut draft = InvoiceDraft::new(number, date, TaxMode::Taxed);
        draft.client_name = "  Acme Corp ".to_string();
        let first = draft.items.add(&product("a", 1000, 1000)).unwrap();
        draft.items.set_quantity(first, "2");
        draft.items.add(&product("b", 500, 0));
        draft
    }

    #[tokio::test]
    async fn test_save_writes_invoice_and_matching_sale() {
        let db = Database::in_memory();
        let repo = db.invoices();

        let id = repo.save(&draft("INV-00001", day(1))).await.unwrap();

        let invoice = repo.get(&id).await.unwrap();
        assert_eq!(invoice.client_name, "Acme Corp");
        assert_eq!(invoice.subtotal_cents, 2500);
        assert_eq!(invoice.tax_amount_cents, 200);
        assert_eq!(invoice.total_amount_cents, 2700);

        let sales = db.sales().list().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].invoice_id, id);
        assert_eq!(sales[0].total_amount_cents, invoice.total_amount_cents);
    }

    #[tokio::test]
    async fn test_validation_failures_write_nothing() {
        let db = Database::in_memory();
        let repo = db.invoices();

        let mut no_client = draft("INV-00001", day(1));
        no_client.client_name = "   ".to_string();
        assert!(matches!(
            repo.save(&no_client).await,
            Err(InvoiceError::Validation(ValidationError::Required { .. }))
        ));

        let no_items = InvoiceDraft {
            client_name: "Acme".to_string(),
            ..InvoiceDraft::new("INV-00001", day(1), TaxMode::Taxed)
        };
        assert!(matches!(
            repo.save(&no_items).await,
            Err(InvoiceError::Validation(ValidationError::Empty { .. }))
        ));

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_write_failure_is_persistence_error() {
        let db = Database::with_store(Arc::new(FlakyStore::failing_creates(Collection::Invoices)));

        let result = db.invoices().save(&draft("INV-00001", day(1))).await;

        assert!(matches!(result, Err(InvoiceError::Persistence(_))));
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sale_write_failure_is_partial_write() {
        let db = Database::with_store(Arc::new(FlakyStore::failing_creates(Collection::Sales)));

        let result = db.invoices().save(&draft("INV-00001", day(1))).await;

        let orphan = match result {
            Err(InvoiceError::PartialWrite { invoice_id, .. }) => invoice_id,
            other => panic!("expected a partial write, got {:?}", other),
        };
        assert_eq!(db.invoices().get(&orphan).await.unwrap().invoice_number, "INV-00001");
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let db = Database::in_memory();
        let repo = db.invoices();

        repo.save(&draft("INV-00001", day(3))).await.unwrap();
        repo.save(&draft("INV-00002", day(9))).await.unwrap();
        repo.save(&draft("INV-00003", day(3))).await.unwrap();

        let numbers: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.invoice_number)
            .collect();
        assert_eq!(numbers, vec!["INV-00002", "INV-00001", "INV-00003"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let db = Database::in_memory();
        assert!(matches!(
            db.invoices().get("nope").await,
            Err(InvoiceError::NotFound { id }) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn test_inconsistent_record_is_malformed() {
        let db = Database::in_memory();
        let id = db.invoices().save(&draft("INV-00001", day(1))).await.unwrap();

        let mut tampered = crate::document::Fields::new();
        tampered.insert("total_amount_cents".to_string(), json!(1));
        db.store()
            .update_record(Collection::Invoices, &id, tampered)
            .await
            .unwrap();

        assert!(matches!(
            db.invoices().list().await,
            Err(StoreError::Malformed { .. })
        ));
        assert!(matches!(
            db.invoices().get(&id).await,
            Err(InvoiceError::Persistence(StoreError::Malformed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_record_is_malformed() {
        let db = Database::in_memory();
        let line = |quantity: i64, total: i64| {
            json!({
                "product_id": "p",
                "name": "Pen",
                "quantity": quantity,
                "unit_price_cents": -500,
                "tax_rate_bps": 0,
                "line_total_cents": total,
            })
        };
        let body = json!({
            "invoice_number": "INV-00001",
            "date": "2024-05-01T00:00:00Z",
            "client_name": "Acme",
            "client_address": "",
            "items": [line(0, 0), line(-2, 1000)],
            "subtotal_cents": 1000,
            "tax_amount_cents": 0,
            "total_amount_cents": 1000,
            "tax_mode": "untaxed",
            "notes": "",
        });
        let fields: crate::document::Fields = serde_json::from_value(body).unwrap();
        let id = db
            .store()
            .create_record(Collection::Invoices, fields)
            .await
            .unwrap();

        assert!(matches!(
            db.invoices().get(&id).await,
            Err(InvoiceError::Persistence(StoreError::Malformed { .. }))
        ));
    }
}
