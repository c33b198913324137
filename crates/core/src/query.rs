//! Read-only queries over the change directory.

use crate::error::Result;
use crate::storage::ChangeStore;
use crate::version::{last_released_version, next_version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A question that can be asked about the release history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Query {
    /// `patch` or `minor`, derived from the pending entries.
    NextReleaseType,
    /// The version the pending entries would be released as.
    NextVersion,
    /// The highest released version, or `0.0.0`.
    LastReleaseVersion,
}

impl Query {
    /// The name the query is invoked by.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NextReleaseType => "next-release-type",
            Self::NextVersion => "next-version",
            Self::LastReleaseVersion => "last-release-version",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Answer a query against the given store.
///
/// # Errors
///
/// Returns [`crate::Error::NoChangesFound`] for queries about pending
/// entries when nothing is staged, or a storage error.
pub fn run_query(store: &ChangeStore, query: Query) -> Result<String> {
    let answer = match query {
        Query::LastReleaseVersion => {
            last_released_version(&store.list_released_versions()?).to_string()
        }
        Query::NextVersion => {
            let pending = store.load_pending()?;
            let last = last_released_version(&store.list_released_versions()?);
            next_version(&last, pending.version_bump_type())?.to_string()
        }
        Query::NextReleaseType => store.load_pending()?.version_bump_type().to_string(),
    };
    tracing::debug!(query = %query, answer = %answer, "Answered query");
    Ok(answer)
}
