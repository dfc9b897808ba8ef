//! flagline - user identity tooling for the flagline SDK
//!
//! Builds the records the SDK would send or cache for a user, migrates
//! legacy cache records, and inspects the local user cache.
//!
//! # Examples
//!
//! ```bash
//! # Event record for a user, with configured private attributes redacted
//! flagline record --user user.json --pretty
//!
//! # Rewrite a legacy cache record in the current layout
//! flagline migrate --input old-record.json
//!
//! # Print this install's anonymous key
//! flagline anonymous-key
//! ```

use fl_cli::{Cli, CliResult, Context, execute, logger};
use fl_config::Config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command, cli.pretty) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: fl_cli::Commands, pretty: bool) -> CliResult<String> {
    let config = Config::load()?;
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.logging.file.as_ref().map(PathBuf::from),
        config.logging.colored,
    )?;
    config.log_summary();

    let context = Context::from_config(&config)?;
    let output = execute(command, &context)?;
    render(&output, pretty)
}

fn render(value: &Value, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
