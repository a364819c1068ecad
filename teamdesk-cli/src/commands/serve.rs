//! HTTP server command
//!
//! Applies the schema, then serves the API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teamdesk_core::TeamdeskConfig;
use teamdesk_server::db::migrations;
use teamdesk_server::{run_server, AppState, GeminiClient, ServerConfig};

use super::{connect, DatabaseArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind (IP address)
    #[arg(long, env = "TEAMDESK_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short, env = "PORT")]
    pub port: Option<u16>,

    /// Skip creating missing tables on start
    #[arg(long)]
    pub no_migrate: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

impl ServeArgs {
    fn apply(self, config: &mut TeamdeskConfig) -> bool {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        self.db.apply(config);
        !self.no_migrate
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: TeamdeskConfig) -> Result<()> {
    let migrate = args.apply(&mut config);
    let server_config = ServerConfig::from_config(&config).context("Invalid server settings")?;

    let pool = connect(&config).await?;
    if migrate {
        migrations::run(&pool)
            .await
            .context("Failed to create tables")?;
    }

    let chat = GeminiClient::new(&config.gemini).context("Failed to build Gemini client")?;
    tracing::info!(
        environment = config.environment.as_str(),
        model = chat.model(),
        "Starting TeamDesk API"
    );

    let state = AppState::new(pool, Arc::new(chat), config.team.clone());
    run_server(state, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
