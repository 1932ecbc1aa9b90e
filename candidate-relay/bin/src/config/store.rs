use serde::{Deserialize, Serialize};

use super::PostgresConfig;

/// `type: memory` or `type: postgres` followed by the connection settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    Memory,

    Postgres(PostgresConfig),
}

impl From<StoreConfig> for candidate_relay_core::config::StoreConfig {
    fn from(config: StoreConfig) -> Self {
        match config {
            StoreConfig::Memory => Self::Memory,
            StoreConfig::Postgres(postgres) => Self::Postgres(postgres.into()),
        }
    }
}
