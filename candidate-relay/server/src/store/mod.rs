//! Collections of JSON records keyed by a string `id`.

pub mod error;
mod memory;
mod postgres;
mod sql_executor;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

pub use self::{
    error::{Error, Result},
    memory::MemoryRecordStore,
    postgres::PostgresRecordStore,
};

/// A stored JSON object. Its `id` member is the key within a collection.
pub type Record = Map<String, Value>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>>;

    /// Inserts `record`, replacing any record with the same `id`.
    ///
    /// A record without a string `id` is assigned a fresh UUID. Returns the id.
    async fn put(&self, collection: &str, record: Record) -> Result<String>;

    /// Shallow-merges `partial` into the record `id`, which keeps its `id`.
    ///
    /// Returns `false` if no such record exists.
    async fn update(&self, collection: &str, id: &str, partial: Record) -> Result<bool>;

    /// Every record of `collection`, oldest first.
    async fn list_all(&self, collection: &str) -> Result<Vec<Record>>;

    /// Returns `false` if no such record exists.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// Short name of the backend, shown in server info.
    fn backend(&self) -> &'static str;
}

/// Returns the `id` of `record`, assigning a new UUID when it has none.
fn ensure_record_id(record: &mut Record) -> String {
    if let Some(Value::String(id)) = record.get("id") {
        if !id.is_empty() {
            return id.clone();
        }
    }
    let id = Uuid::new_v4().to_string();
    let _ = record.insert("id".to_string(), Value::String(id.clone()));
    id
}

fn merge_record(target: &mut Record, partial: Record, id: &str) {
    target.extend(partial);
    let _ = target.insert("id".to_string(), Value::String(id.to_string()));
}
