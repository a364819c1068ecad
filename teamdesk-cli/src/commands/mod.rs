//! Command implementations for the teamdesk binary

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;
use teamdesk_core::TeamdeskConfig;
use teamdesk_server::db::{create_pool, PoolSettings};

pub use migrate::{run_migrate, MigrateArgs};
pub use seed::{run_seed, SeedArgs};
pub use serve::{run_serve, ServeArgs};

/// Connection flags shared by every database command
#[derive(Args, Debug, Default)]
pub struct DatabaseArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    pub fn apply(self, config: &mut TeamdeskConfig) {
        if let Some(url) = self.database_url.filter(|u| !u.trim().is_empty()) {
            config.database.url = Some(url);
        }
    }
}

/// Open the pool described by `config`.
pub async fn connect(config: &TeamdeskConfig) -> Result<PgPool> {
    let settings = PoolSettings::from_config(config).context("Invalid database settings")?;
    tracing::debug!(
        max_connections = settings.max_connections,
        tls = settings.require_tls,
        "connecting to database"
    );

    create_pool(&settings)
        .await
        .context("Failed to connect to database. Is DATABASE_URL correct?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_flag_overrides_config() {
        let mut config = TeamdeskConfig::default();
        config.database.url = Some("postgres://file/crm".into());

        DatabaseArgs {
            database_url: Some("postgres://flag/crm".into()),
        }
        .apply(&mut config);
        assert_eq!(config.database.url.as_deref(), Some("postgres://flag/crm"));

        DatabaseArgs::default().apply(&mut config);
        assert_eq!(config.database.url.as_deref(), Some("postgres://flag/crm"));
    }
}
