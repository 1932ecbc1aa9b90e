use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::{ensure_record_id, merge_record, Record, RecordStore, Result};

/// Process-local store, lost on restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    collections: Arc<RwLock<HashMap<String, IndexMap<String, Record>>>>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|records| records.get(id)).cloned())
    }

    async fn put(&self, collection: &str, mut record: Record) -> Result<String> {
        let id = ensure_record_id(&mut record);
        let mut collections = self.collections.write().await;
        let _ = collections.entry(collection.to_string()).or_default().insert(id.clone(), record);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Record) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let Some(record) = collections.get_mut(collection).and_then(|records| records.get_mut(id))
        else {
            return Ok(false);
        };
        merge_record(record, partial, id);
        Ok(true)
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Record>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .is_some_and(|records| records.shift_remove(id).is_some()))
    }

    fn backend(&self) -> &'static str { "memory" }
}
