//! Command execution for the chlog CLI.
//!
//! Every command returns its stdout text; only `main` writes to the terminal.

pub mod change;
pub mod init;
pub mod query;
pub mod release;
pub mod render;

use chlog_core::{BumpType, ChangeEntry, ChangeStore, Query, Version};
use std::path::Path;

/// A parsed command, independent of the argument parser.
#[derive(Debug, Clone)]
pub enum Command {
    Init,
    NewChange {
        entry: ChangeEntry,
    },
    NewRelease {
        version: Option<Version>,
        bump: Option<BumpType>,
        summary: Option<String>,
    },
    Render {
        template: Option<String>,
    },
    Query {
        query: Query,
    },
    Pending,
}

impl Command {
    /// Short name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::NewChange { .. } => "new-change",
            Self::NewRelease { .. } => "new-release",
            Self::Render { .. } => "render",
            Self::Query { .. } => "query",
            Self::Pending => "pending",
        }
    }
}

/// Run a command against the change directory.
///
/// # Errors
///
/// Returns the underlying error of the command that failed.
pub fn execute(command: Command, change_dir: &Path) -> chlog_core::Result<String> {
    let store = ChangeStore::new(change_dir);
    let span = tracing::debug_span!("command", command = command.name());
    let _guard = span.enter();

    match command {
        Command::Init => init::execute_init(&store),
        Command::NewChange { entry } => change::execute_new_change(&store, entry),
        Command::NewRelease {
            version,
            bump,
            summary,
        } => release::execute_new_release(&store, version, bump, summary),
        Command::Render { template } => render::execute_render(&store, template.as_deref()),
        Command::Query { query } => query::execute_query(&store, query),
        Command::Pending => query::execute_pending(&store),
    }
}
