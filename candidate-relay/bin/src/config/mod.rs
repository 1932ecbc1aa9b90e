mod error;
mod mailer;
mod metrics;
mod postgres;
mod store;
mod web;

use std::path::{Path, PathBuf};

use relay_cli_common::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{
    error::Error, mailer::MailerConfig, metrics::MetricsConfig, postgres::PostgresConfig,
    store::StoreConfig, web::WebConfig,
};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub mailer: MailerConfig,
}

impl Config {
    #[inline]
    pub fn default_path() -> PathBuf {
        [
            candidate_relay_core::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(candidate_relay_core::CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let data = std::fs::read_to_string(&path)
                .context(error::OpenConfigSnafu { filename: path.as_ref().to_path_buf() })?;

            serde_yaml::from_str(&data)
                .context(error::ParseConfigSnafu { filename: path.as_ref().to_path_buf() })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }
}

#[inline]
pub fn load_server_config(
    Config { web, metrics, store, mailer, .. }: Config,
) -> candidate_relay_core::config::Config {
    candidate_relay_core::config::Config {
        web: web.into(),
        metrics: metrics.into(),
        store: store.into(),
        mailer: mailer.into(),
    }
}

#[cfg(test)]
mod tests {
    use candidate_relay_core::config as core;

    use super::*;

    #[test]
    fn empty_sections_fall_back_to_defaults() {
        let config: Config = serde_yaml::from_str("log: {}\nweb: {}\n").unwrap();
        let config = load_server_config(config);

        assert_eq!(config.web.listen_address.port(), candidate_relay_core::DEFAULT_WEB_PORT);
        assert!(!config.metrics.enable);
        assert!(matches!(config.store, core::StoreConfig::Memory));
        assert!(matches!(config.mailer, core::MailerConfig::Console { .. }));
    }

    #[test]
    fn tagged_store_and_mailer_sections() {
        let config: Config = serde_yaml::from_str(
            r"
store:
  type: postgres
  host: db.internal
  ssl_mode: require
  max_connections: 8
mailer:
  type: gmail
  impersonate_user: recruiter@example.com
metrics:
  enable: true
  port: 9100
",
        )
        .unwrap();
        let config = load_server_config(config);

        let core::StoreConfig::Postgres(postgres) = config.store else {
            panic!("expected postgres store");
        };
        assert_eq!(postgres.host, "db.internal");
        assert_eq!(postgres.port, 5432);
        assert_eq!(postgres.max_connections, 8);
        assert!(matches!(postgres.ssl_mode, sqlx::postgres::PgSslMode::Require));

        assert!(matches!(
            config.mailer,
            core::MailerConfig::Gmail { ref impersonate_user } if impersonate_user == "recruiter@example.com"
        ));
        assert!(config.metrics.enable);
        assert_eq!(config.metrics.listen_address.port(), 9100);
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let text = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(text.contains("type: memory"));
        assert!(text.contains("type: console"));

        let config: Config = serde_yaml::from_str(&text).unwrap();
        assert_eq!(config.web.port, candidate_relay_core::DEFAULT_WEB_PORT);
    }
}
