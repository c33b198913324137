//! The two write paths: recording an entry and cutting a release.

use crate::entry::ChangeEntry;
use crate::error::Result;
use crate::prompt::{EntryPrompter, complete_entry};
use crate::schema::{EntrySchema, validate};
use crate::storage::ChangeStore;
use crate::version::{BumpType, Version, last_released_version, next_version};
use std::path::PathBuf;

/// Complete, validate and stage a change entry.
///
/// Returns the absolute path of the staged file. Nothing is written if the
/// entry is invalid.
///
/// # Errors
///
/// Returns [`crate::Error::Validation`] listing every violation, or any
/// prompter or storage error.
pub fn record_entry(
    store: &ChangeStore,
    entry: ChangeEntry,
    schema: &EntrySchema,
    prompter: &dyn EntryPrompter,
) -> Result<PathBuf> {
    let entry = complete_entry(entry, prompter)?;
    validate(&entry, schema)?;
    store.stage_entry(&entry)
}

/// Parameters for [`cut_release`].
#[derive(Debug, Clone, Default)]
pub struct ReleaseRequest {
    /// Release under exactly this version.
    pub version: Option<Version>,
    /// Bump the last release by this instead of the derived bump type.
    pub bump: Option<BumpType>,
    /// Release notes stored with the release.
    pub summary: Option<String>,
}

/// Consolidate every pending entry into a new release.
///
/// The version is, in order of precedence, the requested version, the last
/// release bumped by the requested bump type, or the last release bumped by
/// the type derived from the pending entries. Returns the release file path.
///
/// # Errors
///
/// Returns [`crate::Error::NoChangesFound`] if nothing is staged,
/// [`crate::Error::ReleaseExists`] if the version was already released,
/// [`crate::Error::InvalidVersion`] if the next version would overflow, or a
/// storage error.
pub fn cut_release(store: &ChangeStore, request: ReleaseRequest) -> Result<PathBuf> {
    let mut pending = store.load_pending()?;

    let version = match request.version {
        Some(version) => version,
        None => {
            let last = last_released_version(&store.list_released_versions()?);
            let bump = request
                .bump
                .unwrap_or_else(|| pending.version_bump_type());
            tracing::debug!(last = %last, bump = %bump, "Computing release version");
            next_version(&last, bump)?
        }
    };

    if let Some(summary) = request.summary.filter(|s| !s.trim().is_empty()) {
        pending = pending.with_summary(summary);
    }

    store.consolidate(&version, &pending)
}
