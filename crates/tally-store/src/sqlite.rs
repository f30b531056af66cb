//! # SQLite Document Store
//!
//! Stores every collection in the single `documents` table, one JSON
//! object per row.
//!
//! ## Row Layout
//! ```text
//! ┌──────┬────────────┬──────────────┬──────────────────────┬─────────────┐
//! │ seq  │ collection │ id (uuid v4) │ body (JSON object)   │ timestamps  │
//! ├──────┼────────────┼──────────────┼──────────────────────┼─────────────┤
//! │ 1    │ products   │ 5f1c…        │ {"name":"Pen",…}     │ created/upd │
//! │ 2    │ invoices   │ 9a07…        │ {"invoice_number":…} │ created/upd │
//! │ 3    │ sales      │ c2d4…        │ {"invoice_id":…}     │ created/upd │
//! └──────┴────────────┴──────────────┴──────────────────────┴─────────────┘
//! ```
//! `seq` gives listings their insertion order.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::document::{Collection, Document, DocumentStore, Fields};
use crate::error::{StoreError, StoreResult};
use crate::pool::{create_pool, DbConfig};

/// SQLite-backed [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Opens the pool (running migrations if configured).
    pub async fn connect(config: &DbConfig) -> StoreResult<Self> {
        let pool = create_pool(config).await?;
        Ok(SqliteDocumentStore { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Closes the connection pool. Later operations fail with
    /// [`StoreError::Unavailable`].
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_body(collection: Collection, id: &str, body: &str) -> StoreResult<Fields> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::malformed(collection.as_str(), id, "body is not an object")),
        Err(e) => Err(StoreError::malformed(collection.as_str(), id, e.to_string())),
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = ?1
            ORDER BY seq
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        debug!(%collection, count = rows.len(), "Listed documents");

        rows.into_iter()
            .map(|(id, body)| {
                let fields = parse_body(collection, &id, &body)?;
                Ok(Document { id, fields })
            })
            .collect()
    }

    async fn create_record(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        let body = serde_json::to_string(&fields)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(collection.as_str())
        .bind(&id)
        .bind(&body)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(%collection, %id, "Created document");
        Ok(id)
    }

    async fn update_record(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ?1 AND id = ?2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let body = body.ok_or_else(|| StoreError::not_found(collection.as_str(), id))?;
        let mut merged = parse_body(collection, id, &body)?;
        merged.extend(fields);

        sqlx::query(
            r#"
            UPDATE documents
            SET body = ?3, updated_at = ?4
            WHERE collection = ?1 AND id = ?2
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(serde_json::to_string(&merged)?)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

        debug!(%collection, %id, "Updated document");
        Ok(())
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ?1 AND id = ?2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection.as_str(), id));
        }

        debug!(%collection, %id, "Deleted document");
        Ok(())
    }

    async fn get_record(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ?1 AND id = ?2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        body.map(|body| {
            let fields = parse_body(collection, id, &body)?;
            Ok(Document {
                id: id.to_string(),
                fields,
            })
        })
        .transpose()
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?1")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> SqliteDocumentStore {
        SqliteDocumentStore::connect(&DbConfig::in_memory())
            .await
            .unwrap()
    }

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_per_collection() {
        let store = store().await;
        let first = store
            .create_record(Collection::Products, fields(json!({"name": "Pen"})))
            .await
            .unwrap();
        let second = store
            .create_record(Collection::Products, fields(json!({"name": "Ink"})))
            .await
            .unwrap();
        store
            .create_record(Collection::Sales, fields(json!({"invoice_id": "x"})))
            .await
            .unwrap();

        let products = store.list_all(Collection::Products).await.unwrap();
        assert_eq!(
            products.iter().map(|d| d.id.clone()).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert_eq!(products[0].fields.get("name"), Some(&json!("Pen")));
        assert_eq!(store.count(Collection::Products).await.unwrap(), 2);
        assert_eq!(store.count(Collection::Sales).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Invoices).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_merges_and_get_reads_back() {
        let store = store().await;
        let id = store
            .create_record(Collection::Products, fields(json!({"name": "Pen", "price_cents": 100})))
            .await
            .unwrap();

        store
            .update_record(Collection::Products, &id, fields(json!({"price_cents": 150})))
            .await
            .unwrap();

        let doc = store.get_record(Collection::Products, &id).await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.fields), json!({"name": "Pen", "price_cents": 150}));
    }

    #[tokio::test]
    async fn test_delete_and_missing_records() {
        let store = store().await;
        let id = store
            .create_record(Collection::Purchases, fields(json!({"quantity": 1})))
            .await
            .unwrap();

        store.delete_record(Collection::Purchases, &id).await.unwrap();

        assert!(store.get_record(Collection::Purchases, &id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_record(Collection::Purchases, &id).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.update_record(Collection::Purchases, &id, Fields::new()).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let store = store().await;
        assert!(store.health_check().await);

        store.close().await;

        assert!(!store.health_check().await);
        assert!(store.count(Collection::Invoices).await.is_err());
    }
}
