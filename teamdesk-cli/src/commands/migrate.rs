//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;
use teamdesk_core::TeamdeskConfig;
use teamdesk_server::db::migrations;

use super::{connect, DatabaseArgs};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs, mut config: TeamdeskConfig) -> Result<()> {
    args.db.apply(&mut config);
    let pool = connect(&config).await?;

    migrations::run(&pool)
        .await
        .context("Failed to create tables")?;

    println!(
        "✅ Schema ready: {}",
        migrations::table_names().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}
