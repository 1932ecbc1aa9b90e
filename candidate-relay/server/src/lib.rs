pub mod entity;
mod error;
mod service;
pub mod store;
mod web;

use std::{net::SocketAddr, sync::Arc};

use candidate_relay_core::{
    config::{Config, MailerConfig, PostgresConfig, StoreConfig},
    ServerInfo,
};
use futures::{future::BoxFuture, FutureExt};
use notification::NotificationClient;
use relay_metrics::RelayMetrics;
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::ResultExt;
use sqlx::{
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
    Executor, PgPool,
};
use tracing::Instrument;

use self::store::{MemoryRecordStore, PostgresRecordStore, RecordStore};
pub use self::{
    error::{Error, Result},
    service::{error::Error as ServiceError, CandidateService},
    web::{controller, new_router, ApiDoc, ServiceState},
};

const MIGRATOR: Migrator = Migrator { ignore_missing: true, ..sqlx::migrate!() };

/// # Errors
/// Returns errors when server fails to start
pub async fn serve_with_shutdown(config: Config, server_info: ServerInfo) -> Result<()> {
    let Config { web, metrics, store, mailer } = config;

    let record_store = initialize_record_store(&store).await?;

    let mailer = initialize_mailer(mailer).await?;

    let relay_metrics = RelayMetrics::new()?;

    let service_state = ServiceState::new(CandidateService::new(
        record_store,
        mailer,
        relay_metrics.clone(),
    ));

    let lifecycle_manager = LifecycleManager::<Error>::new();

    let _handle = lifecycle_manager.spawn(
        "Http Server",
        create_web_http_server_future(web.listen_address, service_state, server_info),
    );

    if metrics.enable {
        let _handle = lifecycle_manager.spawn(
            "Metrics server",
            create_metrics_server_future(metrics.listen_address, relay_metrics),
        );
    }

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

async fn initialize_record_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    match config {
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory record store, records are lost on restart");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StoreConfig::Postgres(postgres) => {
            let pool = initialize_postgres_pool(postgres).await?;
            Ok(Arc::new(PostgresRecordStore::new(pool)))
        }
    }
}

#[tracing::instrument(
    skip(password, database, ssl_mode, max_connections),
    fields(
        host = %host,
        port = port,
        username = %username
    )
)]
async fn initialize_postgres_pool(
    PostgresConfig {
        host,
        port,
        username,
        role,
        password,
        database,
        ssl_mode,
        max_connections,
        application_name,
    }: &PostgresConfig,
) -> Result<PgPool> {
    tracing::info!("Initializing database");

    let connect_opts = PgConnectOptions::new_without_pgpass()
        .host(host)
        .port(*port)
        .username(username)
        .password(password)
        .database(database)
        .ssl_mode(*ssl_mode);

    let connect_opts = if let Some(app_name) = application_name {
        connect_opts.application_name(app_name)
    } else {
        connect_opts
    };

    let pool_opts = {
        let opts = PgPoolOptions::new().max_connections(*max_connections);

        if let Some(role) = role {
            let set_role = format!(r#"SET SESSION ROLE = "{role}";"#);
            opts.after_connect(move |conn, _meta| {
                let set_role = set_role.clone();
                async move {
                    let _ = conn.execute(set_role.as_str()).await?;
                    Ok(())
                }
                .boxed()
            })
        } else {
            opts
        }
    };
    let pool =
        pool_opts.connect_with(connect_opts).await.context(error::InitializePostgresPoolSnafu {
            host: host.to_string(),
            port: *port,
            username: username.to_string(),
            database: database.to_string(),
        })?;

    MIGRATOR
        .run(&pool)
        .instrument(tracing::info_span!("migrate"))
        .await
        .context(error::MigrateSchemaSnafu)?;

    Ok(pool)
}

#[tracing::instrument(skip_all, fields(mailer = config.kind()))]
async fn initialize_mailer(config: MailerConfig) -> Result<Arc<dyn NotificationClient>> {
    tracing::info!("Initializing mail sender");

    match config {
        MailerConfig::Console { from } => Ok(Arc::new(notification::console::Client::new(from))),
        MailerConfig::Gmail { impersonate_user } => {
            let client = notification::gmail::Client::new(notification::gmail::Config {
                impersonate_user,
            })
            .await
            .context(error::CreateMailerSnafu)?;
            Ok(Arc::new(client))
        }
    }
}

fn create_web_http_server_future(
    listen_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>> {
    move |shutdown_signal| {
        async move {
            tracing::info!("Listen Web HTTP server endpoint on {listen_address}");

            let result =
                web::new_api_server(listen_address, service_state, server_info, shutdown_signal)
                    .await;

            match result {
                Ok(()) => {
                    tracing::info!("HTTP server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}

fn create_metrics_server_future<Metrics>(
    listen_address: SocketAddr,
    metrics: Metrics,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>>
where
    Metrics: relay_metrics::Metrics + 'static,
{
    move |signal| {
        async move {
            tracing::info!("Listen metrics endpoint on {listen_address}");
            let result = relay_metrics::start_metrics_server(listen_address, metrics, signal).await;
            match result {
                Ok(()) => {
                    tracing::info!("Metrics server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}
