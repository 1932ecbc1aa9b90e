use std::net::SocketAddr;

use sqlx::postgres::PgSslMode;

#[derive(Clone, Debug)]
pub struct Config {
    pub web: WebConfig,

    pub metrics: MetricsConfig,

    pub store: StoreConfig,

    pub mailer: MailerConfig,
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enable: bool,

    pub listen_address: SocketAddr,
}

/// Backend of the record store.
#[derive(Clone, Debug)]
pub enum StoreConfig {
    /// Process-local, lost on restart.
    Memory,

    Postgres(PostgresConfig),
}

impl StoreConfig {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub host: String,

    pub port: u16,

    pub database: String,

    pub username: String,

    pub password: String,

    pub role: Option<String>,

    pub ssl_mode: PgSslMode,

    pub max_connections: u32,

    pub application_name: Option<String>,
}

#[derive(Clone, Debug)]
pub enum MailerConfig {
    /// Log emails instead of sending them.
    Console { from: String },

    /// Send through the Gmail API as `impersonate_user`.
    Gmail { impersonate_user: String },
}

impl MailerConfig {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Console { .. } => "console",
            Self::Gmail { .. } => "gmail",
        }
    }
}
