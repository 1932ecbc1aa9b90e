use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::PgPool;

use super::{
    ensure_record_id, error, sql_executor::RecordSqlExecutor, Record, RecordStore, Result,
};

/// Records kept as JSONB rows of the `records` table.
#[derive(Clone, Debug)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Record>> {
        let mut conn = self.pool.acquire().await.context(error::AcquireConnectionSnafu)?;
        conn.get_record(collection, id).await
    }

    async fn put(&self, collection: &str, mut record: Record) -> Result<String> {
        let id = ensure_record_id(&mut record);
        let mut conn = self.pool.acquire().await.context(error::AcquireConnectionSnafu)?;
        conn.put_record(collection, &id, &record).await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Record) -> Result<bool> {
        let mut conn = self.pool.acquire().await.context(error::AcquireConnectionSnafu)?;
        conn.update_record(collection, id, &partial).await
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Record>> {
        let mut conn = self.pool.acquire().await.context(error::AcquireConnectionSnafu)?;
        conn.list_records(collection).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await.context(error::AcquireConnectionSnafu)?;
        conn.delete_record(collection, id).await
    }

    fn backend(&self) -> &'static str { "postgres" }
}
