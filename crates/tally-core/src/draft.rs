//! # Invoice Draft
//!
//! The invoice under construction, owned by one operator session.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   new(number) ──► edit fields / items ──► to_new_invoice() ──► store    │
//! │                        ▲    │                    │                      │
//! │                        │    ▼                    │ Err: draft untouched │
//! │                    totals() (on demand)          ▼                      │
//! │                        ▲                   reset(next_number)           │
//! │                        └─────────────────────────┘                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is recomputed behind the caller's back: [`InvoiceDraft::totals`]
//! is evaluated fresh each time it is called.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::line_items::LineItems;
use crate::totals::Totals;
use crate::types::{NewInvoice, TaxMode, Timestamp};
use crate::validation::validate_client_name;

/// A mutable, not-yet-persisted invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub client_name: String,
    pub client_address: String,
    pub notes: String,
    pub tax_mode: TaxMode,
    pub items: LineItems,
}

impl InvoiceDraft {
    /// Creates an empty draft.
    pub fn new(invoice_number: impl Into<String>, issue_date: NaiveDate, tax_mode: TaxMode) -> Self {
        InvoiceDraft {
            invoice_number: invoice_number.into(),
            issue_date,
            client_name: String::new(),
            client_address: String::new(),
            notes: String::new(),
            tax_mode,
            items: LineItems::new(),
        }
    }

    /// Current figures for the draft's items and tax mode.
    pub fn totals(&self) -> Totals {
        Totals::compute(self.items.as_slice(), self.tax_mode)
    }

    /// Checks that the draft can be saved.
    ///
    /// ## Rules (checked in order)
    /// 1. client name is not blank
    /// 2. at least one line item
    /// 3. totals fit in the cent range
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.checked_totals().map(|_| ())
    }

    fn checked_totals(&self) -> Result<Totals, ValidationError> {
        validate_client_name(&self.client_name)?;

        if self.items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            });
        }

        Totals::checked(self.items.as_slice(), self.tax_mode).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "total".to_string(),
                min: 0,
                max: i64::MAX,
            }
        })
    }

    /// Commits the draft into an invoice ready to be written.
    ///
    /// The draft itself is left as is; callers reset it once the write
    /// has succeeded.
    pub fn to_new_invoice(&self) -> Result<NewInvoice, ValidationError> {
        let totals = self.checked_totals()?;

        Ok(NewInvoice {
            invoice_number: self.invoice_number.clone(),
            date: Timestamp::from_date(self.issue_date),
            client_name: self.client_name.trim().to_string(),
            client_address: self.client_address.clone(),
            items: self.items.as_slice().to_vec(),
            subtotal_cents: totals.subtotal.cents(),
            tax_amount_cents: totals.tax.cents(),
            total_amount_cents: totals.total.cents(),
            tax_mode: self.tax_mode,
            notes: self.notes.clone(),
        })
    }

    /// Starts the next invoice.
    ///
    /// Clears client details, notes and items. Issue date and tax mode are
    /// kept since consecutive invoices usually share them.
    pub fn reset(&mut self, next_number: impl Into<String>) {
        self.invoice_number = next_number.into();
        self.client_name.clear();
        self.client_address.clear();
        self.notes.clear();
        self.items.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn product(id: &str, price_cents: i64, tax_rate_bps: u32) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: "General".to_string(),
            sku: id.to_uppercase(),
            price_cents,
            tax_rate_bps,
        }
    }

    fn filled() -> InvoiceDraft {
        let mut draft = InvoiceDraft::new("INV-00001", day(), TaxMode::Taxed);
        draft.client_name = "  Acme Traders ".to_string();
        draft.client_address = "1 Main St\nSpringfield".to_string();
        draft.notes = "Net 30".to_string();
        let first = draft.items.add(&product("a", 1000, 1000)).unwrap();
        draft.items.set_quantity(first, "2");
        draft.items.add(&product("b", 500, 0));
        draft
    }

    #[test]
    fn test_commit_snapshots_totals() {
        let invoice = filled().to_new_invoice().unwrap();

        assert_eq!(invoice.invoice_number, "INV-00001");
        assert_eq!(invoice.client_name, "Acme Traders");
        assert_eq!(invoice.date.date(), day());
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.subtotal_cents, 2500);
        assert_eq!(invoice.tax_amount_cents, 200);
        assert_eq!(invoice.total_amount_cents, 2700);
    }

    #[test]
    fn test_commit_requires_client_name() {
        let mut draft = filled();
        draft.client_name = "   ".to_string();

        assert!(matches!(
            draft.to_new_invoice(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_commit_accepts_long_client_name() {
        let mut draft = filled();
        draft.client_name = "Acme ".repeat(60);

        let invoice = draft.to_new_invoice().unwrap();
        assert_eq!(invoice.client_name.len(), 299);
    }

    #[test]
    fn test_commit_requires_items() {
        let mut draft = filled();
        draft.items.clear();

        assert!(matches!(
            draft.to_new_invoice(),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn test_tax_mode_switch_changes_totals() {
        let mut draft = filled();
        assert_eq!(draft.totals().total.cents(), 2700);

        draft.tax_mode = TaxMode::Untaxed;
        assert_eq!(draft.totals().total.cents(), 2500);
    }

    #[test]
    fn test_reset_keeps_date_and_tax_mode() {
        let mut draft = filled();
        draft.tax_mode = TaxMode::Untaxed;

        draft.reset("INV-00002");

        assert_eq!(draft.invoice_number, "INV-00002");
        assert!(draft.client_name.is_empty());
        assert!(draft.client_address.is_empty());
        assert!(draft.notes.is_empty());
        assert!(draft.items.is_empty());
        assert_eq!(draft.issue_date, day());
        assert_eq!(draft.tax_mode, TaxMode::Untaxed);
    }

    #[test]
    fn test_commit_rejects_totals_out_of_range() {
        let row = |id: &str| {
            serde_json::json!({
                "product_id": id,
                "name": id,
                "quantity": 1,
                "unit_price_cents": 5_000_000_000_000_000_000i64,
                "tax_rate_bps": 1000,
                "line_total_cents": 5_000_000_000_000_000_000i64,
            })
        };
        let mut value = serde_json::to_value(filled()).unwrap();
        value["items"] = serde_json::json!({ "items": [row("a"), row("b")] });
        let draft: InvoiceDraft = serde_json::from_value(value).unwrap();

        assert!(matches!(
            draft.to_new_invoice(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
