//! # Document Store Port
//!
//! The persistence collaborator every repository talks to.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Repositories (typed)                                                  │
//! │        │  encode(NewX) → Fields          decode(Document) → X           │
//! │        ▼                                        ▲                       │
//! │   ┌──────────────────────────────────────────────────────────────┐     │
//! │   │  dyn DocumentStore                                           │     │
//! │   │    list_all(collection)         → [Document {id, fields}]   │     │
//! │   │    create_record(collection, f) → id                        │     │
//! │   │    update_record(collection, id, partial f)                 │     │
//! │   │    delete_record(collection, id)                            │     │
//! │   └──────────────────────────────────────────────────────────────┘     │
//! │        │                               │                                │
//! │        ▼                               ▼                                │
//! │   SqliteDocumentStore            MemoryDocumentStore                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decode Boundary
//! Records come back as loose JSON objects. [`decode`] is the only way into
//! a typed entity: the id is attached, then serde decodes with
//! `deny_unknown_fields`. Anything that does not fit is a
//! [`StoreError::Malformed`], never a partially filled struct.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Top-level fields of one record.
pub type Fields = Map<String, Value>;

// =============================================================================
// Collection
// =============================================================================

/// The four collections the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Products,
    Invoices,
    Sales,
    Purchases,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Products,
        Collection::Invoices,
        Collection::Sales,
        Collection::Purchases,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Invoices => "invoices",
            Collection::Sales => "sales",
            Collection::Purchases => "purchases",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Document
// =============================================================================

/// One stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

// =============================================================================
// Store Trait
// =============================================================================

/// Async document store.
///
/// Implementations assign ids, keep insertion order for `list_all`, and
/// return [`StoreError::NotFound`] when updating or deleting a missing id.
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Every record in the collection, in insertion order.
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Writes a new record and returns its store-assigned id.
    async fn create_record(&self, collection: Collection, fields: Fields) -> StoreResult<String>;

    /// Replaces the given top-level fields, leaving the others as they were.
    async fn update_record(&self, collection: Collection, id: &str, fields: Fields)
        -> StoreResult<()>;

    async fn delete_record(&self, collection: Collection, id: &str) -> StoreResult<()>;

    async fn get_record(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .list_all(collection)
            .await?
            .into_iter()
            .find(|doc| doc.id == id))
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        Ok(self.list_all(collection).await?.len() as u64)
    }
}

// =============================================================================
// Encode / Decode
// =============================================================================

/// Serializes a value into record fields.
///
/// The value must serialize to a JSON object.
pub fn encode<T: Serialize>(value: &T) -> StoreResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Serialization(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decodes a record into a typed entity, attaching its id.
pub fn decode<T: DeserializeOwned>(collection: Collection, doc: Document) -> StoreResult<T> {
    let Document { id, mut fields } = doc;

    if fields.contains_key("id") {
        return Err(StoreError::malformed(
            collection.as_str(),
            id,
            "record body must not carry its own id",
        ));
    }
    fields.insert("id".to_string(), Value::String(id.clone()));

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| StoreError::malformed(collection.as_str(), id, e.to_string()))
}

/// Decodes every record of a listing, failing on the first bad one.
pub fn decode_all<T: DeserializeOwned>(
    collection: Collection,
    docs: Vec<Document>,
) -> StoreResult<Vec<T>> {
    docs.into_iter().map(|doc| decode(collection, doc)).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
