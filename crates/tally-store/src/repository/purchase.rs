//! # Purchase Repository
//!
//! Stock bought from suppliers. Feeds the cost side of the dashboard.

use std::sync::Arc;

use tally_core::{NewPurchase, Purchase};
use tracing::info;

use crate::document::{decode_all, encode, Collection, DocumentStore};
use crate::error::StoreResult;

/// Repository for the `purchases` collection.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    store: Arc<dyn DocumentStore>,
}

impl PurchaseRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        PurchaseRepository { store }
    }

    /// Records a purchase built with [`NewPurchase::new`].
    pub async fn record(&self, purchase: NewPurchase) -> StoreResult<Purchase> {
        let id = self
            .store
            .create_record(Collection::Purchases, encode(&purchase)?)
            .await?;

        info!(
            %id,
            product_id = %purchase.product_id,
            quantity = purchase.quantity,
            supplier = %purchase.supplier_name,
            "Purchase recorded"
        );
        Ok(purchase.with_id(id))
    }

    /// All purchases, most recent purchase date first.
    pub async fn list(&self) -> StoreResult<Vec<Purchase>> {
        let docs = self.store.list_all(Collection::Purchases).await?;
        let mut purchases: Vec<Purchase> = decode_all(Collection::Purchases, docs)?;
        purchases.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use chrono::NaiveDate;
    use tally_core::{Money, Product};

    #[tokio::test]
    async fn test_record_and_list_newest_first() {
        let db = Database::in_memory();
        let ink = Product {
            id: "ink".to_string(),
            name: "Ink".to_string(),
            category: "Stationery".to_string(),
            sku: "INK".to_string(),
            price_cents: 400,
            tax_rate_bps: 0,
        };

        let older = NewPurchase::new(
            &ink,
            10,
            Money::from_cents(150),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            " Ink Co ",
        )
        .unwrap();
        let newer = NewPurchase::new(
            &ink,
            2,
            Money::from_cents(175),
            NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
            "Ink Co",
        )
        .unwrap();

        let first = db.purchases().record(older).await.unwrap();
        db.purchases().record(newer).await.unwrap();

        assert_eq!(first.total_cost_cents, 1500);
        assert_eq!(first.supplier_name, "Ink Co");

        let listed = db.purchases().list().await.unwrap();
        assert_eq!(
            listed.iter().map(|p| p.quantity).collect::<Vec<_>>(),
            vec![2, 10]
        );
    }
}
