//! chlog CLI Application
//!
//! Records change entries as they land, consolidates them into versioned
//! release files and renders the release history as a changelog.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod errors;
mod tracing;

use crate::commands::Command;
use crate::errors::{CliError, EXIT_OK, exit_code_for, render_error};
use crate::tracing::{Level, TracingConfig, TracingFormat};
use std::io::Write;

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing may be
    // unusable during a panic.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    let json_mode = cli.json;

    let exit_code = match run(cli) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            let code = exit_code_for(&err);
            render_error(err, json_mode);
            code
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: cli::Cli) -> Result<(), CliError> {
    let tracing_config = TracingConfig {
        format: if cli.json {
            TracingFormat::Json
        } else {
            TracingFormat::Compact
        },
        level: Level::from(cli.level),
    };
    crate::tracing::init_tracing(tracing_config).map_err(|e| CliError::config(e.to_string()))?;

    let command: Command = cli.command.into();
    ::tracing::debug!(
        command = command.name(),
        change_dir = %cli.change_dir.display(),
        "Executing command"
    );

    let output = commands::execute(command, &cli.change_dir)?;

    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(output.as_bytes());
    let _ = stdout.flush();
    Ok(())
}
