use anyhow::Result;

use ttladder::cli::Command;
use ttladder::{handle_completions, handle_report, handle_snapshot, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Report {
            input,
            aliases,
            now,
            dry_run,
        } => handle_report(input.as_deref(), aliases.as_deref(), *now, *dry_run),
        Command::Snapshot {
            input,
            aliases,
            now,
            pretty,
        } => handle_snapshot(input.as_deref(), aliases.as_deref(), *now, *pretty),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
