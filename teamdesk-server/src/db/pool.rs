//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use teamdesk_core::TeamdeskConfig;

/// Everything needed to open the pool
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Force `sslmode=require` unless the URL names its own mode
    pub require_tls: bool,
}

impl PoolSettings {
    pub fn from_config(config: &TeamdeskConfig) -> teamdesk_core::Result<Self> {
        Ok(Self {
            url: config.database_url()?,
            max_connections: config.database.max_connections.max(1),
            acquire_timeout: Duration::from_secs(config.database.acquire_timeout_secs.max(1)),
            require_tls: config.database_requires_tls(),
        })
    }

    /// Connect options with the TLS policy applied.
    ///
    /// `Require` encrypts without verifying the server certificate, which is
    /// what hosted Postgres providers with self-signed chains need.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let options = PgConnectOptions::from_str(&self.url)?;
        if self.require_tls && !self.url.contains("sslmode=") {
            Ok(options.ssl_mode(PgSslMode::Require))
        } else {
            Ok(options)
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Create a PostgreSQL connection pool, connecting eagerly.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the first connection fails.
///
/// # Example
///
/// ```ignore
/// let settings = PoolSettings::from_config(&config)?;
/// let pool = create_pool(&settings).await?;
/// ```
pub async fn create_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let options = settings.connect_options()?;
    settings.pool_options().connect_with(options).await
}

/// Create a pool that connects on first use.
pub fn create_lazy_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let options = settings.connect_options()?;
    Ok(settings.pool_options().connect_lazy_with(options))
}
