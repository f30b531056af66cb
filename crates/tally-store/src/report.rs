//! Dashboard service: fetches the four collections concurrently and hands
//! them to [`tally_core::report::summarize`].

use std::sync::Arc;

use tally_core::report::{self, DashboardSummary};
use tracing::debug;

use crate::document::DocumentStore;
use crate::error::StoreResult;
use crate::repository::invoice::InvoiceRepository;
use crate::repository::product::ProductRepository;
use crate::repository::purchase::PurchaseRepository;
use crate::repository::sale::SaleRepository;

#[derive(Debug, Clone)]
pub struct ReportService {
    store: Arc<dyn DocumentStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ReportService { store }
    }

    /// Builds the dashboard from the current contents of the store.
    pub async fn dashboard(&self) -> StoreResult<DashboardSummary> {
        let products = ProductRepository::new(self.store.clone());
        let invoices = InvoiceRepository::new(self.store.clone());
        let sales = SaleRepository::new(self.store.clone());
        let purchases = PurchaseRepository::new(self.store.clone());

        let (products, invoices, sales, purchases) = tokio::try_join!(
            products.list(),
            invoices.list(),
            sales.list(),
            purchases.list()
        )?;

        debug!(
            products = products.len(),
            invoices = invoices.len(),
            sales = sales.len(),
            purchases = purchases.len(),
            "Building dashboard"
        );

        Ok(report::summarize(&products, &invoices, &sales, &purchases))
    }
}
