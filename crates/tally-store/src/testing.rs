//! Fault-injecting store for failure-path tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::document::{Collection, Document, DocumentStore, Fields};
use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryDocumentStore;

/// Wraps an in-memory store and fails selected operations until healed.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryDocumentStore,
    fail_reads: bool,
    fail_creates_in: Option<Collection>,
    healed: AtomicBool,
}

impl FlakyStore {
    /// Every listing and count fails, as if the store were unreachable.
    pub(crate) fn unreachable() -> Self {
        FlakyStore {
            fail_reads: true,
            ..Default::default()
        }
    }

    /// Record creation fails for one collection only.
    pub(crate) fn failing_creates(collection: Collection) -> Self {
        FlakyStore {
            fail_creates_in: Some(collection),
            ..Default::default()
        }
    }

    /// Stops injecting failures.
    pub(crate) fn heal(&self) {
        self.healed.store(true, Ordering::SeqCst);
    }

    fn broken(&self, condition: bool) -> StoreResult<()> {
        if condition && !self.healed.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        self.broken(self.fail_reads)?;
        self.inner.list_all(collection).await
    }

    async fn create_record(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        self.broken(self.fail_creates_in == Some(collection))?;
        self.inner.create_record(collection, fields).await
    }

    async fn update_record(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> StoreResult<()> {
        self.inner.update_record(collection, id, fields).await
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.inner.delete_record(collection, id).await
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        self.broken(self.fail_reads)?;
        self.inner.count(collection).await
    }
}
