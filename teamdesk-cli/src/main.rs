use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use teamdesk_core::TeamdeskConfig;

mod commands;
mod config;
mod tracing_setup;

use commands::{MigrateArgs, SeedArgs, ServeArgs};
use config::ConfigArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(name = "teamdesk", author, version, about = "TeamDesk CRM backend")]
struct Cli {
    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Config file (default: ~/.teamdesk/config.toml if present)
    #[arg(long, short = 'c', global = true, env = "TEAMDESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create any missing database tables
    Migrate(MigrateArgs),
    /// Load the demo workspace into the database
    Seed(SeedArgs),
    /// Inspect configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = run(cli).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let explicit = cli.config.as_deref();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, load_config(explicit)?).await,
        Commands::Migrate(args) => commands::run_migrate(args, load_config(explicit)?).await,
        Commands::Seed(args) => commands::run_seed(args, load_config(explicit)?).await,
        Commands::Config(args) => config::run_config(args, explicit),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<TeamdeskConfig> {
    TeamdeskConfig::load(explicit).context("Failed to load configuration")
}
