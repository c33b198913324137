//! Change entries and release collections.
//!
//! A [`ChangeEntry`] is one atomic change record. Pending entries are stored
//! one per file while staged; a [`ReleaseCollection`] groups the entries bound
//! to a single released version.
//!
//! # Release file format
//!
//! ```json
//! {
//!   "schema-version": "0.2",
//!   "changes": [
//!     { "type": "feature", "category": "parser", "description": "Add slices" }
//!   ],
//!   "summary": "Optional release notes"
//! }
//! ```
//!
//! Older releases were written as a bare array of entries. Those still load,
//! tagged with [`LEGACY_SCHEMA_VERSION`].

use crate::version::BumpType;
use serde::{Deserialize, Serialize};

/// Schema version written into every new release file.
pub const CURRENT_SCHEMA_VERSION: &str = "0.2";

/// Schema version assigned to releases stored as a bare array of entries.
pub const LEGACY_SCHEMA_VERSION: &str = "0.1";

/// Entry type that escalates a release to a minor version bump.
pub const FEATURE_TYPE: &str = "feature";

/// A single change record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// The kind of change (`feature`, `bugfix`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// The high level feature area.
    pub category: String,
    /// Free-form description, possibly spanning several lines.
    pub description: String,
}

impl ChangeEntry {
    /// Create a new change entry.
    #[must_use]
    pub fn new(
        kind: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    /// Create an entry with every field empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Field names paired with their values, in serialization order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("type", self.kind.as_str()),
            ("category", self.category.as_str()),
            ("description", self.description.as_str()),
        ]
    }

    /// Check if all fields are non-empty.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.fields().iter().all(|(_, value)| !value.is_empty())
    }

    /// Overwrite fields with the non-empty values of `other`.
    ///
    /// Empty fields in `other` leave the current value untouched.
    pub fn merge_from(&mut self, other: Self) {
        if !other.kind.is_empty() {
            self.kind = other.kind;
        }
        if !other.category.is_empty() {
            self.category = other.category;
        }
        if !other.description.is_empty() {
            self.description = other.description;
        }
    }

    /// Serialize the entry as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The set of changes bound to one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCollection {
    /// Entries in output order.
    pub changes: Vec<ChangeEntry>,
    /// Tag of the on-disk format this collection was read from or will be
    /// written as.
    pub schema_version: String,
    /// Optional release notes; empty when absent.
    pub summary: String,
}

impl ReleaseCollection {
    /// Create a collection in the current schema with no summary.
    #[must_use]
    pub fn new(changes: Vec<ChangeEntry>) -> Self {
        Self {
            changes,
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            summary: String::new(),
        }
    }

    /// Attach release notes to the collection.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Whether the collection holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The bump implied by the contained entries.
    ///
    /// Any `feature` entry makes this a minor release; otherwise it is a
    /// patch release. Major bumps are never derived.
    #[must_use]
    pub fn version_bump_type(&self) -> BumpType {
        if self.changes.iter().any(|entry| entry.kind == FEATURE_TYPE) {
            BumpType::Minor
        } else {
            BumpType::Patch
        }
    }

    /// The on-disk form of this collection in the current schema.
    pub(crate) fn to_file(&self) -> ReleaseFile {
        ReleaseFile::Current(CurrentRelease {
            schema_version: self.schema_version.clone(),
            changes: self.changes.clone(),
            summary: self.summary.clone(),
        })
    }

    /// Build a collection from either on-disk shape.
    pub(crate) fn from_file(file: ReleaseFile) -> Self {
        match file {
            ReleaseFile::Legacy(changes) => Self {
                changes,
                schema_version: LEGACY_SCHEMA_VERSION.to_string(),
                summary: String::new(),
            },
            ReleaseFile::Current(release) => Self {
                changes: release.changes,
                schema_version: release.schema_version,
                summary: release.summary,
            },
        }
    }
}

/// The two shapes a release file can take on disk.
///
/// Decoded only at the storage boundary and immediately converted into a
/// [`ReleaseCollection`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReleaseFile {
    /// A bare array of entries.
    Legacy(Vec<ChangeEntry>),
    /// An object carrying a schema version and optional summary.
    Current(CurrentRelease),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CurrentRelease {
    #[serde(rename = "schema-version")]
    schema_version: String,
    changes: Vec<ChangeEntry>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(kind: &str) -> ChangeEntry {
        ChangeEntry::new(kind, "foo", "bar")
    }

    #[test]
    fn test_entry_to_json() {
        let entry = ChangeEntry::new("feature", "foo", "My Feature");
        assert_eq!(
            entry.to_json().unwrap(),
            "{\n  \"type\": \"feature\",\n  \"category\": \"foo\",\n  \"description\": \"My Feature\"\n}"
        );
    }

    #[test]
    fn test_entry_is_completed() {
        assert!(ChangeEntry::new("feature", "foo", "bar").is_completed());
        assert!(!ChangeEntry::new("feature", "foo", "").is_completed());
        assert!(!ChangeEntry::new("", "foo", "bar").is_completed());
        assert!(!ChangeEntry::empty().is_completed());
    }

    #[test]
    fn test_merge_only_overwrites_with_non_empty_values() {
        let mut entry = ChangeEntry::new("feature", "foo", "");
        entry.merge_from(ChangeEntry::new("", "", "Filled in"));
        assert_eq!(entry, ChangeEntry::new("feature", "foo", "Filled in"));

        entry.merge_from(ChangeEntry::new("bugfix", "", ""));
        assert_eq!(entry, ChangeEntry::new("bugfix", "foo", "Filled in"));
    }

    #[test]
    fn test_bump_type_patch_for_bugfixes() {
        let collection = ReleaseCollection::new(vec![change("bugfix"), change("bugfix"), change("bugfix")]);
        assert_eq!(collection.version_bump_type(), BumpType::Patch);
    }

    #[test]
    fn test_bump_type_minor_for_features() {
        let collection = ReleaseCollection::new(vec![change("feature")]);
        assert_eq!(collection.version_bump_type(), BumpType::Minor);

        let collection = ReleaseCollection::new(vec![change("feature"), change("bugfix")]);
        assert_eq!(collection.version_bump_type(), BumpType::Minor);
    }

    #[test]
    fn test_bump_type_never_major() {
        let collection = ReleaseCollection::new(vec![change("enhancement"), change("breaking")]);
        assert_eq!(collection.version_bump_type(), BumpType::Patch);
    }

    #[test]
    fn test_release_file_current_format() {
        let collection = ReleaseCollection::new(vec![change("feature")]);
        let value = serde_json::to_value(collection.to_file()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "schema-version": "0.2",
                "changes": [{"type": "feature", "category": "foo", "description": "bar"}],
            })
        );

        let with_summary = collection.with_summary("Big release");
        let value = serde_json::to_value(with_summary.to_file()).unwrap();
        assert_eq!(value["summary"], "Big release");
    }

    #[test]
    fn test_release_file_legacy_format() {
        let data = r#"[{"type": "bugfix", "category": "foo", "description": "bar"}]"#;
        let file: ReleaseFile = serde_json::from_str(data).unwrap();
        let collection = ReleaseCollection::from_file(file);
        assert_eq!(collection.schema_version, LEGACY_SCHEMA_VERSION);
        assert_eq!(collection.summary, "");
        assert_eq!(collection.changes, vec![change("bugfix")]);
    }

    #[test]
    fn test_release_file_current_without_summary() {
        let data = r#"{"schema-version": "0.2", "changes": []}"#;
        let file: ReleaseFile = serde_json::from_str(data).unwrap();
        let collection = ReleaseCollection::from_file(file);
        assert_eq!(collection.schema_version, "0.2");
        assert!(collection.is_empty());
        assert_eq!(collection.summary, "");
    }
}
