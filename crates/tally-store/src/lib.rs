//! # tally-store: Persistence Layer for Tally
//!
//! Everything in Tally that talks to a document store or writes a file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                                  │
//! │                                                                         │
//! │  Presentation layer (invoice builder, history, dashboard)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  tally-store (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌───────────────┐     │    │
//! │  │   │InvoiceSession │   │ Repositories  │   │ HtmlExporter  │     │    │
//! │  │   │ draft + save  │──►│ products      │   │ (askama)      │     │    │
//! │  │   │ + next number │   │ invoices      │   └───────────────┘     │    │
//! │  │   └───────────────┘   │ sales         │   ┌───────────────┐     │    │
//! │  │   ┌───────────────┐   │ purchases     │   │ Notice        │     │    │
//! │  │   │ ReportService │──►└───────┬───────┘   │ AppConfig     │     │    │
//! │  │   └───────────────┘           │           └───────────────┘     │    │
//! │  │                    dyn DocumentStore                            │    │
//! │  │              ┌────────────┴────────────┐                        │    │
//! │  │     SqliteDocumentStore        MemoryDocumentStore              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (documents table, WAL)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`document`] - Store port, collections, encode/decode boundary
//! - [`sqlite`] / [`memory`] - Store adapters
//! - [`pool`] / [`migrations`] - SQLite connection pool and schema
//! - [`database`] - The handle that hands out repositories
//! - [`repository`] - Typed access per collection
//! - [`numbering`] - Invoice number allocation
//! - [`session`] - One draft being composed and submitted
//! - [`report`] - Dashboard service
//! - [`export`] - Exporter port and HTML exporter
//! - [`notice`] - Operator-facing outcome of each operation
//! - [`config`] / [`logging`] - Ambient setup for binaries
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::Utc;
//! use tally_core::TaxMode;
//! use tally_store::{Database, DbConfig, InvoiceSession};
//!
//! let db = Database::open(DbConfig::new("tally.db")).await?;
//! let mut session = InvoiceSession::start(db, Utc::now().date_naive(), TaxMode::Taxed).await;
//!
//! if let Some(pen) = session.search_catalog("pen").await?.first() {
//!     session.add_product(pen);
//! }
//! session.draft_mut().client_name = "Acme Traders".to_string();
//!
//! let saved = session.submit().await?;
//! println!("{}", saved.notice().message);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod database;
pub mod document;
pub mod error;
pub mod export;
pub mod logging;
pub mod memory;
pub mod migrations;
pub mod notice;
pub mod numbering;
pub mod pool;
pub mod report;
pub mod repository;
pub mod session;
pub mod sqlite;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AppConfig;
pub use database::Database;
pub use document::{Collection, DocumentStore};
pub use error::{ConfigError, ExportError, InvoiceError, StoreError, StoreResult};
pub use export::{HtmlExporter, InvoiceExporter};
pub use memory::MemoryDocumentStore;
pub use notice::{Notice, Severity};
pub use numbering::InvoiceNumberAllocator;
pub use pool::DbConfig;
pub use report::ReportService;
pub use session::{InvoiceSession, SavedInvoice};
pub use sqlite::SqliteDocumentStore;

// Repository re-exports for convenience
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::sale::SaleRepository;
