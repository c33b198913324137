//! Changelog management for chlog.
//!
//! Changes are recorded one entry at a time into a staging area, then
//! consolidated into immutable, versioned release files. Stored releases are
//! rendered into a human-readable changelog through a template.
//!
//! # Architecture
//!
//! - [`entry`] - Change entries, release collections and the release file format
//! - [`schema`] - Allowed-value and non-empty validation of entries
//! - [`version`] - Version parsing, ordering and bump rules
//! - [`storage`] - The change directory: staging, consolidation and loading
//! - [`render`] - Template rendering of release history
//! - [`prompt`] - Editor-driven completion of partial entries
//! - [`query`] - Read-only questions about pending and released changes
//! - [`workflow`] - Recording entries and cutting releases
//! - [`config`] - Optional `config.toml` in the change directory
//!
//! # Example
//!
//! ```rust,ignore
//! use chlog_core::{ChangeEntry, ChangeStore, EntrySchema, EditorPrompter, ReleaseRequest};
//!
//! let store = ChangeStore::new(".changes");
//! store.init()?;
//!
//! let entry = ChangeEntry::new("feature", "parser", "Support slice expressions");
//! chlog_core::record_entry(&store, entry, &EntrySchema::default(), &EditorPrompter::from_env())?;
//!
//! let release = chlog_core::cut_release(&store, ReleaseRequest::default())?;
//! println!("Wrote {}", release.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod entry;
pub mod error;
pub mod prompt;
pub mod query;
pub mod render;
pub mod schema;
pub mod storage;
pub mod version;
pub mod workflow;

pub use config::ChangelogConfig;
pub use entry::{ChangeEntry, ReleaseCollection};
pub use error::{Error, Result};
pub use prompt::{EditorPrompter, EntryFileParser, EntryPrompter, complete_entry};
pub use query::{Query, run_query};
pub use render::{DEFAULT_TEMPLATE, render, render_pending};
pub use schema::{EntrySchema, validate};
pub use storage::{ChangeStore, DEFAULT_CHANGE_DIR};
pub use version::{BumpType, Version, last_released_version, next_version};
pub use workflow::{ReleaseRequest, cut_release, record_entry};
