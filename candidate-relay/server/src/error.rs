use std::borrow::Cow;

use snafu::Snafu;

use crate::web;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Can not initialize Postgres pool with endpoint \
         `postgres://{username}@{host}:{port}/{database}`, error: {source}"
    ))]
    InitializePostgresPool {
        host: Cow<'static, str>,
        port: u16,
        username: Cow<'static, str>,
        database: Cow<'static, str>,
        source: sqlx::error::Error,
    },

    #[snafu(display("Fail to migrate postgres schema, error: {source}",))]
    MigrateSchema { source: sqlx::migrate::MigrateError },

    #[snafu(display("Error occurs while creating mail sender, error: {source}"))]
    CreateMailer { source: notification::Error },

    #[snafu(display("{source}"))]
    Metrics { source: relay_metrics::Error },

    #[snafu(display("{source}"))]
    Web { source: web::Error },
}

impl From<relay_metrics::Error> for Error {
    fn from(source: relay_metrics::Error) -> Self { Self::Metrics { source } }
}

impl From<web::Error> for Error {
    fn from(source: web::Error) -> Self { Self::Web { source } }
}
