use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use teamdesk_core::TeamdeskConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved config as TOML, secrets redacted
    Show,
    /// Show config file path
    Path,
}

pub fn run_config(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => run_show(explicit),
        ConfigCommands::Path => run_path(explicit),
    }
}

fn run_show(explicit: Option<&Path>) -> Result<()> {
    let config = TeamdeskConfig::load(explicit).context("Failed to load configuration")?;
    print!("{}", render(&config)?);
    Ok(())
}

fn run_path(explicit: Option<&Path>) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(TeamdeskConfig::default_path);
    let note = if path.exists() { "" } else { " (not found)" };
    println!("{}{}", path.display(), note);
    Ok(())
}

fn render(config: &TeamdeskConfig) -> Result<String> {
    toml::to_string_pretty(&config.redacted()).context("Failed to render config as TOML")
}
