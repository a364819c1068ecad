//! Demo data loader

use anyhow::{Context, Result};
use clap::Parser;
use teamdesk_core::TeamdeskConfig;
use teamdesk_server::db::{migrations, seed};

use super::{connect, DatabaseArgs};

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Truncate every table before seeding
    #[arg(long, short)]
    pub force: bool,

    #[command(flatten)]
    pub db: DatabaseArgs,
}

pub async fn run_seed(args: SeedArgs, mut config: TeamdeskConfig) -> Result<()> {
    args.db.apply(&mut config);
    let pool = connect(&config).await?;

    migrations::run(&pool)
        .await
        .context("Failed to create tables")?;
    let report = seed::seed(&pool, args.force)
        .await
        .context("Failed to seed database")?;

    if report.skipped {
        println!("Database already has data, nothing seeded. Use --force to reset it.");
        return Ok(());
    }

    println!("✅ Seeded {} rows", report.total());
    for (table, rows) in [
        ("users", report.users),
        ("contacts", report.contacts),
        ("leads", report.leads),
        ("activities", report.activities),
        ("deals", report.deals),
        ("tasks", report.tasks),
        ("products", report.products),
        ("bookmarks", report.bookmarks),
    ] {
        println!("   {:<10} {}", table, rows);
    }
    Ok(())
}
