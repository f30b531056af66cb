//! # Product Repository
//!
//! Catalog management plus the two search flavours from
//! [`tally_core::catalog`].

use std::sync::Arc;

use tally_core::catalog;
use tally_core::validation::{validate_price_cents, validate_search_query};
use tally_core::{NewProduct, Product};
use tracing::{debug, info};

use crate::document::{decode, encode, Collection, Document, DocumentStore};
use crate::error::{StoreError, StoreResult};

/// Repository for the `products` collection.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ProductRepository { store }
    }

    /// Every product in catalog order.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let docs = self.store.list_all(Collection::Products).await?;
        docs.into_iter().map(decode_product).collect()
    }

    /// Gets a product by its id.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        self.store
            .get_record(Collection::Products, id)
            .await?
            .map(decode_product)
            .transpose()
    }

    /// Adds a product to the catalog.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Stored product with its new id
    /// * `Err(StoreError::Invalid)` - Catalog rules not met
    pub async fn create(&self, product: &NewProduct) -> StoreResult<Product> {
        product.validate()?;
        debug!(sku = %product.sku, "Inserting product");

        let id = self
            .store
            .create_record(Collection::Products, encode(product)?)
            .await?;

        info!(%id, sku = %product.sku, "Product created");
        Ok(product.clone().with_id(id))
    }

    /// Replaces a product's catalog fields.
    ///
    /// Past invoices keep their own copies and are not affected.
    pub async fn update(&self, id: &str, product: &NewProduct) -> StoreResult<Product> {
        product.validate()?;
        debug!(%id, "Updating product");

        self.store
            .update_record(Collection::Products, id, encode(product)?)
            .await?;

        Ok(product.clone().with_id(id))
    }

    /// Removes a product from the catalog.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        debug!(%id, "Deleting product");
        self.store.delete_record(Collection::Products, id).await
    }

    pub async fn count(&self) -> StoreResult<u64> {
        self.store.count(Collection::Products).await
    }

    /// Products for the invoice picker. An empty query returns nothing
    /// without touching the store.
    ///
    /// A query longer than any product name matches nothing.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let Ok(query) = validate_search_query(query) else {
            return Ok(Vec::new());
        };
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let products = self.list().await?;
        let found: Vec<Product> = catalog::search(&products, &query)
            .into_iter()
            .cloned()
            .collect();

        debug!(query = %query, count = found.len(), "Search returned products");
        Ok(found)
    }

    /// Products for the catalog list. An empty query returns everything.
    pub async fn filter(&self, query: &str) -> StoreResult<Vec<Product>> {
        let Ok(query) = validate_search_query(query) else {
            return Ok(Vec::new());
        };
        let products = self.list().await?;

        Ok(catalog::filter(&products, &query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Gets a product that must exist.
    pub async fn require(&self, id: &str) -> StoreResult<Product> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(Collection::Products.as_str(), id))
    }
}

/// Decodes a product and rejects a negative stored price.
fn decode_product(doc: Document) -> StoreResult<Product> {
    let id = doc.id.clone();
    let product: Product = decode(Collection::Products, doc)?;

    validate_price_cents(product.price_cents)
        .map_err(|e| StoreError::malformed(Collection::Products.as_str(), id, e.to_string()))?;

    Ok(product)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn new_product(name: &str, category: &str, sku: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            sku: sku.to_string(),
            price_cents: 250,
            tax_rate_bps: 1800,
        }
    }

    async fn seeded() -> Database {
        let db = Database::in_memory();
        let repo = db.products();
        repo.create(&new_product("Blue Pen", "Stationery", "PEN-B")).await.unwrap();
        repo.create(&new_product("Notebook", "Stationery", "NOTE")).await.unwrap();
        repo.create(&new_product("Coffee", "Pantry", "COF")).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let db = Database::in_memory();
        let repo = db.products();

        let pen = repo.create(&new_product("Pen", "Stationery", "PEN")).await.unwrap();
        assert_eq!(repo.get(&pen.id).await.unwrap(), Some(pen.clone()));

        let mut changed = new_product("Pen (red)", "Stationery", "PEN-R");
        changed.price_cents = 300;
        let updated = repo.update(&pen.id, &changed).await.unwrap();
        assert_eq!(repo.require(&pen.id).await.unwrap(), updated);
        assert_eq!(updated.price_cents, 300);

        repo.delete(&pen.id).await.unwrap();
        assert!(repo.get(&pen.id).await.unwrap().is_none());
        assert!(matches!(
            repo.require(&pen.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_validates() {
        let db = Database::in_memory();
        let mut bad = new_product("", "Stationery", "PEN");
        assert!(matches!(
            db.products().create(&bad).await,
            Err(StoreError::Invalid(_))
        ));

        bad = new_product("Pen", "Stationery", "PEN");
        bad.price_cents = -1;
        assert!(db.products().create(&bad).await.is_err());
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_and_filter() {
        let db = seeded().await;
        let repo = db.products();

        let names = |products: Vec<Product>| -> Vec<String> {
            products.into_iter().map(|p| p.name).collect()
        };

        assert_eq!(names(repo.search("STATION").await.unwrap()), vec!["Blue Pen", "Notebook"]);
        assert_eq!(names(repo.search("coffee").await.unwrap()), vec!["Coffee"]);
        assert!(repo.search("").await.unwrap().is_empty());
        assert_eq!(repo.filter("").await.unwrap().len(), 3);
        assert_eq!(names(repo.filter("pan").await.unwrap()), vec!["Coffee"]);
    }

    #[tokio::test]
    async fn test_long_queries() {
        let db = Database::in_memory();
        let repo = db.products();
        let long_name = format!("Pen {}", "x".repeat(190));
        repo.create(&new_product(&long_name, "Stationery", "PEN-L")).await.unwrap();

        assert_eq!(repo.search(&long_name).await.unwrap().len(), 1);
        assert!(repo.search(&"y".repeat(500)).await.unwrap().is_empty());
        assert!(repo.filter(&"y".repeat(500)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_stored_price_is_malformed() {
        let db = Database::in_memory();
        let mut fields = encode(&new_product("Pen", "Stationery", "PEN")).unwrap();
        fields.insert("price_cents".to_string(), serde_json::json!(-500));
        let id = db
            .store()
            .create_record(Collection::Products, fields)
            .await
            .unwrap();

        assert!(matches!(
            db.products().get(&id).await,
            Err(StoreError::Malformed { .. })
        ));
        assert!(matches!(
            db.products().list().await,
            Err(StoreError::Malformed { .. })
        ));
    }
}
