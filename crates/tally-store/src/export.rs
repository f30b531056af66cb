//! # Invoice Export
//!
//! The exporter port and a printable-HTML implementation.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  InvoiceView (tally-core)   +   ExportOptions::for_invoice(number)      │
//! │       │                              │ Invoice-INV-00042.pdf            │
//! │       ▼                              ▼                                  │
//! │  dyn InvoiceExporter::export(Some(&view), &options)                     │
//! │       │                                                                 │
//! │       ├── None view   ──► ExportError::MissingView                      │
//! │       ▼                                                                 │
//! │  HtmlExporter: templates/invoice.html ──► {dir}/Invoice-INV-00042.html  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A browser's "print to PDF" on the HTML output gives the paper copy; the
//! page size and margins are carried in its `@page` rule.

use std::path::{Path, PathBuf};

use askama::Template;
use async_trait::async_trait;
use tally_core::export::{ExportOptions, InvoiceView, Orientation, PageFormat};
use tracing::{debug, info};

use crate::error::ExportError;

/// Turns an invoice view into a file.
#[async_trait]
pub trait InvoiceExporter: Send + Sync {
    /// Writes the document and returns where it went.
    ///
    /// `view` is optional because the printable node may not exist yet;
    /// that is reported as [`ExportError::MissingView`].
    async fn export(
        &self,
        view: Option<&InvoiceView>,
        options: &ExportOptions,
    ) -> Result<PathBuf, ExportError>;
}

#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceHtml<'a> {
    title: &'a str,
    page_size: String,
    margin: String,
    view: &'a InvoiceView,
}

/// Writes `{stem}.html` into an output directory.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    output_dir: PathBuf,
}

impl HtmlExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        HtmlExporter {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders the page without writing it.
    pub fn render(view: &InvoiceView, options: &ExportOptions) -> Result<String, ExportError> {
        let page = match options.page_format {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "letter",
        };
        let orientation = match options.orientation {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        };

        InvoiceHtml {
            title: options.file_stem(),
            page_size: format!("{} {}", page, orientation),
            margin: format!("{}cm", options.margin_cm),
            view,
        }
        .render()
        .map_err(|e| ExportError::Render(e.to_string()))
    }
}

#[async_trait]
impl InvoiceExporter for HtmlExporter {
    async fn export(
        &self,
        view: Option<&InvoiceView>,
        options: &ExportOptions,
    ) -> Result<PathBuf, ExportError> {
        let view = view.ok_or(ExportError::MissingView)?;
        let html = Self::render(view, options)?;
        let path = self.output_dir.join(format!("{}.html", options.file_stem()));

        debug!(path = %path.display(), bytes = html.len(), "Writing invoice export");

        let io_error = |source| ExportError::Io {
            path: path.clone(),
            source,
        };
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(io_error)?;
        tokio::fs::write(&path, html).await.map_err(io_error)?;

        info!(
            invoice_number = %view.invoice_number,
            path = %path.display(),
            "Invoice exported"
        );
        Ok(path)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
