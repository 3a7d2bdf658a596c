pub mod api;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod http;
pub mod rate_limiter;
pub mod rating;
pub mod report;
pub mod services;
pub mod stats;

use std::io;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::snapshot::to_json;
use crate::services::{ReportService, SnapshotService, load_aliases};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn resolve_now(now: Option<NaiveDateTime>) -> NaiveDateTime {
    now.unwrap_or_else(|| chrono::Local::now().naive_local())
}

pub fn handle_report(
    input: Option<&Path>,
    aliases: Option<&Path>,
    now: Option<NaiveDateTime>,
    dry_run: bool,
) -> Result<()> {
    let config = AppConfig::from_env();
    let aliases = load_aliases(aliases)?;
    let mut service = ReportService::new(
        config,
        input.map(Path::to_path_buf),
        aliases,
        resolve_now(now),
        dry_run,
    )?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async { service.run().await })?;
    Ok(())
}

pub fn handle_snapshot(
    input: Option<&Path>,
    aliases: Option<&Path>,
    now: Option<NaiveDateTime>,
    pretty: bool,
) -> Result<()> {
    let config = AppConfig::from_env();
    let aliases = load_aliases(aliases)?;
    let service =
        SnapshotService::new(config, input.map(Path::to_path_buf), aliases, resolve_now(now));

    let runtime = tokio::runtime::Runtime::new()?;
    let snapshot = runtime.block_on(async { service.build().await })?;
    println!("{}", to_json(&snapshot, pretty)?);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
