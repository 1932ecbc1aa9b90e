use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Fail to acquire database connection, error: {source}"))]
    AcquireConnection { source: sqlx::Error },

    #[snafu(display("Fail to get record `{id}` from `{collection}`, error: {source}"))]
    GetRecord { collection: String, id: String, source: sqlx::Error },

    #[snafu(display("Fail to put record `{id}` into `{collection}`, error: {source}"))]
    PutRecord { collection: String, id: String, source: sqlx::Error },

    #[snafu(display("Fail to update record `{id}` in `{collection}`, error: {source}"))]
    UpdateRecord { collection: String, id: String, source: sqlx::Error },

    #[snafu(display("Fail to list records of `{collection}`, error: {source}"))]
    ListRecords { collection: String, source: sqlx::Error },

    #[snafu(display("Fail to delete record `{id}` from `{collection}`, error: {source}"))]
    DeleteRecord { collection: String, id: String, source: sqlx::Error },
}
