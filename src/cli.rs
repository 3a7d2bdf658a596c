use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Table-tennis ladder: Elo ratings, leaderboards and head-to-head reports"
)]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Fetch match results, build the report and post it to the chat
    Report {
        /// Read rows from a JSON export instead of the AppSheet table
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// JSON file mapping name variants to official player names
        #[arg(short, long)]
        aliases: Option<PathBuf>,
        /// Reference time (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS), defaults to now
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
        /// Print messages instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the computed ratings, leaderboards and progression as JSON
    Snapshot {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        aliases: Option<PathBuf>,
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
        #[arg(long)]
        pretty: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

pub fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS, got {value:?}"))
}
