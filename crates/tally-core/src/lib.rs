//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally. It contains the invoice engine
//! as pure functions and plain values with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation layer                           │   │
//! │  │   Product search ──► Invoice builder ──► History ──► Dashboard  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │line_items │  │  totals   │  │   │
//! │  │   │  Product  │  │   Money   │  │ LineItems │  │  Totals   │  │   │
//! │  │   │  Invoice  │  │  parsing  │  │   merge   │  │ tax mode  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   draft   │  │ numbering │  │  catalog  │  │  report   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-store (Persistence Layer)                 │   │
//! │  │          document store, repositories, invoice session          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Invoice, Sale, Purchase, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`line_items`] - Ordered line items of one draft invoice
//! - [`totals`] - Subtotal / tax / total computation
//! - [`numbering`] - Invoice number formatting
//! - [`draft`] - The session-scoped draft invoice
//! - [`catalog`] - Product matching for search
//! - [`report`] - Dashboard aggregates
//! - [`export`] - Export options and the printable invoice view
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::totals::Totals;
//! use tally_core::{LineItems, Product, TaxMode};
//!
//! let pen = Product {
//!     id: "p-1".to_string(),
//!     name: "Pen".to_string(),
//!     category: "Stationery".to_string(),
//!     sku: "PEN-1".to_string(),
//!     price_cents: 1000,
//!     tax_rate_bps: 1000, // 10%
//! };
//!
//! let mut items = LineItems::new();
//! items.add(&pen);
//! items.add(&pen); // merges into one row with quantity 2
//!
//! let totals = Totals::compute(items.as_slice(), TaxMode::Taxed);
//! assert_eq!(totals.subtotal.cents(), 2000);
//! assert_eq!(totals.tax.cents(), 200);
//! assert_eq!(totals.total.cents(), 2200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod draft;
pub mod error;
pub mod export;
pub mod line_items;
pub mod money;
pub mod numbering;
pub mod report;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::InvoiceDraft;
pub use error::{CoreError, ValidationError};
pub use line_items::LineItems;
pub use money::Money;
pub use totals::Totals;
pub use types::*;
