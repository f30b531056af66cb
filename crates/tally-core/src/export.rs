//! # Export Model
//!
//! What gets handed to the document exporter: the options it should use
//! and a printable, already-formatted view of one invoice.
//!
//! The exporter itself lives in tally-store; this module does no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::draft::InvoiceDraft;
use crate::money::Money;
use crate::types::{Invoice, InvoiceLineItem, TaxMode};

// =============================================================================
// Export Options
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Settings for one export call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExportOptions {
    /// e.g. `Invoice-INV-00042.pdf`
    pub filename: String,
    pub page_format: PageFormat,
    pub orientation: Orientation,
    /// JPEG quality for rasterized pages, 0.0 - 1.0.
    pub image_quality: f32,
    /// Page margin in centimetres.
    pub margin_cm: f32,
}

impl ExportOptions {
    /// Default options for exporting an invoice: A4 portrait, quality 0.98,
    /// 1 cm margin.
    ///
    /// ```rust
    /// use tally_core::export::ExportOptions;
    ///
    /// let options = ExportOptions::for_invoice("INV-00042");
    /// assert_eq!(options.filename, "Invoice-INV-00042.pdf");
    /// ```
    pub fn for_invoice(invoice_number: &str) -> Self {
        ExportOptions {
            filename: format!("Invoice-{}.pdf", invoice_number),
            page_format: PageFormat::A4,
            orientation: Orientation::Portrait,
            image_quality: 0.98,
            margin_cm: 1.0,
        }
    }

    /// Filename without its extension.
    pub fn file_stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.filename)
    }
}

// =============================================================================
// Printable Invoice
// =============================================================================

/// One printed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ViewRow {
    pub name: String,
    pub quantity: i64,
    pub unit_price: String,
    pub tax_rate: String,
    pub line_total: String,
}

/// An invoice with every figure formatted for print.
///
/// The tax column and tax line only appear for taxed invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceView {
    pub invoice_number: String,
    pub date: String,
    pub client_name: String,
    pub client_address_lines: Vec<String>,
    pub rows: Vec<ViewRow>,
    pub show_tax: bool,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub notes: String,
}

impl InvoiceView {
    /// View of a persisted invoice, using its stored figures.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self::build(
            &invoice.invoice_number,
            invoice.date.date(),
            &invoice.client_name,
            &invoice.client_address,
            &invoice.items,
            invoice.tax_mode,
            [invoice.subtotal(), invoice.tax_amount(), invoice.total_amount()],
            &invoice.notes,
        )
    }

    /// Preview of a draft, using freshly computed figures.
    pub fn from_draft(draft: &InvoiceDraft) -> Self {
        let totals = draft.totals();
        Self::build(
            &draft.invoice_number,
            draft.issue_date,
            &draft.client_name,
            &draft.client_address,
            draft.items.as_slice(),
            draft.tax_mode,
            [totals.subtotal, totals.tax, totals.total],
            &draft.notes,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        invoice_number: &str,
        date: NaiveDate,
        client_name: &str,
        client_address: &str,
        items: &[InvoiceLineItem],
        tax_mode: TaxMode,
        [subtotal, tax, total]: [Money; 3],
        notes: &str,
    ) -> Self {
        InvoiceView {
            invoice_number: invoice_number.to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            client_name: client_name.trim().to_string(),
            client_address_lines: client_address
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            rows: items
                .iter()
                .map(|item| ViewRow {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price().to_string(),
                    tax_rate: item.tax_rate().to_string(),
                    line_total: item.line_total().to_string(),
                })
                .collect(),
            show_tax: tax_mode == TaxMode::Taxed,
            subtotal: subtotal.to_string(),
            tax: tax.to_string(),
            total: total.to_string(),
            notes: notes.to_string(),
        }
    }
}
