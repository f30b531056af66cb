//! # Database Handle
//!
//! One cheap-to-clone handle that hands out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database { store: Arc<dyn DocumentStore> }                             │
//! │     ├── products()   → ProductRepository                                │
//! │     ├── invoices()   → InvoiceRepository                                │
//! │     ├── sales()      → SaleRepository                                   │
//! │     ├── purchases()  → PurchaseRepository                               │
//! │     ├── numbers()    → InvoiceNumberAllocator                           │
//! │     └── reports()    → ReportService                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;

use crate::document::DocumentStore;
use crate::error::StoreResult;
use crate::memory::MemoryDocumentStore;
use crate::numbering::InvoiceNumberAllocator;
use crate::pool::DbConfig;
use crate::report::ReportService;
use crate::repository::invoice::InvoiceRepository;
use crate::repository::product::ProductRepository;
use crate::repository::purchase::PurchaseRepository;
use crate::repository::sale::SaleRepository;
use crate::sqlite::SqliteDocumentStore;

/// Main database handle providing repository access.
///
/// ## Usage
/// ```rust,no_run
/// # async fn demo() -> Result<(), tally_store::StoreError> {
/// use tally_store::{Database, DbConfig};
///
/// let db = Database::open(DbConfig::new("./tally.db")).await?;
/// let pens = db.products().search("pen").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    /// Opens the SQLite store described by `config`.
    pub async fn open(config: DbConfig) -> StoreResult<Self> {
        let store = SqliteDocumentStore::connect(&config).await?;
        info!(path = %config.database_path.display(), "Document store ready");
        Ok(Self::with_store(Arc::new(store)))
    }

    /// A fresh process-local store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryDocumentStore::new()))
    }

    /// Uses any [`DocumentStore`] implementation.
    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Database { store }
    }

    /// The underlying store, for operations no repository covers.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.store.clone())
    }

    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new(self.store.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.store.clone())
    }

    pub fn purchases(&self) -> PurchaseRepository {
        PurchaseRepository::new(self.store.clone())
    }

    pub fn numbers(&self) -> InvoiceNumberAllocator {
        InvoiceNumberAllocator::new(self.store.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.store.clone())
    }
}
