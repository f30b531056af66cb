//! # Repository Module
//!
//! Typed access to each collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │  db.invoices().save(&draft)                                     │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                      │
//! │  ├── encode(NewInvoice) ──► create_record("invoices")                   │
//! │  └── encode(NewSale)    ──► create_record("sales")                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dyn DocumentStore (SQLite or in-memory)                                │
//! │                                                                         │
//! │  Reads always go through document::decode, so a repository only        │
//! │  ever returns fully typed, validated entities.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD and search
//! - [`invoice::InvoiceRepository`] - Invoice save / list / get
//! - [`sale::SaleRepository`] - Sales ledger and reconciliation
//! - [`purchase::PurchaseRepository`] - Stock purchases

pub mod invoice;
pub mod product;
pub mod purchase;
pub mod sale;
