use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{types::Json, Executor, Postgres};

use super::{error, Record, Result};

#[async_trait]
pub trait RecordSqlExecutor {
    async fn get_record(&mut self, collection: &str, id: &str) -> Result<Option<Record>>;

    async fn put_record(&mut self, collection: &str, id: &str, record: &Record) -> Result<()>;

    async fn update_record(&mut self, collection: &str, id: &str, partial: &Record)
        -> Result<bool>;

    async fn list_records(&mut self, collection: &str) -> Result<Vec<Record>>;

    async fn delete_record(&mut self, collection: &str, id: &str) -> Result<bool>;
}

#[async_trait]
impl<E> RecordSqlExecutor for E
where
    E: Send,
    for<'c> &'c mut E: Executor<'c, Database = Postgres>,
{
    async fn get_record(&mut self, collection: &str, id: &str) -> Result<Option<Record>> {
        let record = sqlx::query_scalar::<_, Json<Record>>(include_str!(
            "../../sql/record/get_record.sql"
        ))
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *self)
        .await
        .context(error::GetRecordSnafu { collection, id })?;

        Ok(record.map(|Json(record)| record))
    }

    async fn put_record(&mut self, collection: &str, id: &str, record: &Record) -> Result<()> {
        let _ = sqlx::query(include_str!("../../sql/record/put_record.sql"))
            .bind(collection)
            .bind(id)
            .bind(Json(record))
            .execute(&mut *self)
            .await
            .context(error::PutRecordSnafu { collection, id })?;

        Ok(())
    }

    async fn update_record(
        &mut self,
        collection: &str,
        id: &str,
        partial: &Record,
    ) -> Result<bool> {
        let result = sqlx::query(include_str!("../../sql/record/update_record.sql"))
            .bind(collection)
            .bind(id)
            .bind(Json(partial))
            .execute(&mut *self)
            .await
            .context(error::UpdateRecordSnafu { collection, id })?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_records(&mut self, collection: &str) -> Result<Vec<Record>> {
        let records = sqlx::query_scalar::<_, Json<Record>>(include_str!(
            "../../sql/record/list_records.sql"
        ))
        .bind(collection)
        .fetch_all(&mut *self)
        .await
        .context(error::ListRecordsSnafu { collection })?;

        Ok(records.into_iter().map(|Json(record)| record).collect())
    }

    async fn delete_record(&mut self, collection: &str, id: &str) -> Result<bool> {
        let result = sqlx::query(include_str!("../../sql/record/delete_record.sql"))
            .bind(collection)
            .bind(id)
            .execute(&mut *self)
            .await
            .context(error::DeleteRecordSnafu { collection, id })?;

        Ok(result.rows_affected() > 0)
    }
}
