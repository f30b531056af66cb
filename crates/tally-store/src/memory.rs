//! Process-local document store.
//!
//! Keeps each collection as an insertion-ordered `Vec` behind a tokio
//! `RwLock`. Nothing survives the process; used by tests and demos.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::document::{Collection, Document, DocumentStore, Fields};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn create_record(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(Document {
            id: id.clone(),
            fields,
        });
        debug!(%collection, %id, "Created in-memory record");
        Ok(id)
    }

    async fn update_record(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::not_found(collection.as_str(), id))?;

        doc.fields.extend(fields);
        Ok(())
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        let index = docs
            .iter()
            .position(|doc| doc.id == id)
            .ok_or_else(|| StoreError::not_found(collection.as_str(), id))?;

        docs.remove(index);
        Ok(())
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).map_or(0, |docs| docs.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_create_list_in_insertion_order() {
        let store = MemoryDocumentStore::new();
        let a = store
            .create_record(Collection::Products, fields(json!({"n": 1})))
            .await
            .unwrap();
        let b = store
            .create_record(Collection::Products, fields(json!({"n": 2})))
            .await
            .unwrap();

        let docs = store.list_all(Collection::Products).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(store.count(Collection::Products).await.unwrap(), 2);
        assert_eq!(store.count(Collection::Sales).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let store = MemoryDocumentStore::new();
        let id = store
            .create_record(Collection::Products, fields(json!({"a": 1, "b": 2})))
            .await
            .unwrap();

        store
            .update_record(Collection::Products, &id, fields(json!({"b": 3})))
            .await
            .unwrap();

        let doc = store.get_record(Collection::Products, &id).await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.fields), json!({"a": 1, "b": 3}));
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = MemoryDocumentStore::new();
        assert!(matches!(
            store.update_record(Collection::Sales, "nope", Fields::new()).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_record(Collection::Sales, "nope").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(store.get_record(Collection::Sales, "nope").await.unwrap().is_none());
    }
}
