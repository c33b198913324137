//! Storage of pending entries and release files.
//!
//! Everything chlog persists lives under a single change directory:
//!
//! ```text
//! .changes/
//! ├── next-release/          staged entries, one JSON file each
//! │   └── 01729...-feature-parser-3f9a1c2e.json
//! ├── templates/             optional render templates
//! ├── config.toml            optional configuration
//! ├── 0.1.0.json             one file per released version
//! └── 0.2.0.json
//! ```
//!
//! [`ChangeStore`] is the only type that touches these paths.

use crate::config::{CONFIG_FILE, ChangelogConfig};
use crate::entry::{ChangeEntry, ReleaseCollection, ReleaseFile};
use crate::error::{Error, Result};
use crate::version::Version;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Default location of the change directory, relative to the project root.
pub const DEFAULT_CHANGE_DIR: &str = ".changes";

/// Staging directory for pending entries, inside the change directory.
pub const NEXT_RELEASE_DIR: &str = "next-release";

/// Directory holding user render templates, inside the change directory.
pub const TEMPLATES_DIR: &str = "templates";

const JSON_EXTENSION: &str = "json";

/// Manager for the files under a change directory.
#[derive(Debug, Clone)]
pub struct ChangeStore {
    /// Root of the change directory.
    change_dir: PathBuf,
}

impl ChangeStore {
    /// Create a store rooted at the given change directory.
    #[must_use]
    pub fn new(change_dir: impl Into<PathBuf>) -> Self {
        Self {
            change_dir: change_dir.into(),
        }
    }

    /// The change directory this store manages.
    #[must_use]
    pub fn change_dir(&self) -> &Path {
        &self.change_dir
    }

    /// The staging directory for pending entries.
    #[must_use]
    pub fn next_release_dir(&self) -> PathBuf {
        self.change_dir.join(NEXT_RELEASE_DIR)
    }

    /// The directory holding user render templates.
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.change_dir.join(TEMPLATES_DIR)
    }

    /// The optional configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.change_dir.join(CONFIG_FILE)
    }

    /// The release file for a version.
    #[must_use]
    pub fn release_path(&self, version: &Version) -> PathBuf {
        self.change_dir.join(format!("{version}.{JSON_EXTENSION}"))
    }

    /// Create the change directory if it does not exist.
    ///
    /// Returns `true` if the directory was created by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn init(&self) -> Result<bool> {
        if self.change_dir.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.change_dir).map_err(|e| {
            Error::io_with_source(
                "Failed to create change directory",
                Some(self.change_dir.clone()),
                e,
            )
        })?;
        tracing::info!(path = %self.change_dir.display(), "Initialized change directory");
        Ok(true)
    }

    /// Durably write an entry into the staging directory.
    ///
    /// The file name starts with a per-process strictly increasing timestamp,
    /// so sorted file names follow staging order. Returns the absolute path
    /// of the new file.
    ///
    /// # Errors
    ///
    /// Returns an error if the staging directory or the file cannot be
    /// written.
    pub fn stage_entry(&self, entry: &ChangeEntry) -> Result<PathBuf> {
        let dir = self.next_release_dir();
        if !dir.is_dir() {
            fs::create_dir_all(&dir).map_err(|e| {
                Error::io_with_source("Failed to create staging directory", Some(dir.clone()), e)
            })?;
        }

        let (path, mut file) = loop {
            let candidate = dir.join(staged_file_name(entry));
            if candidate.exists() {
                continue;
            }
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => {
                    return Err(Error::io_with_source(
                        "Failed to create change file",
                        Some(candidate),
                        e,
                    ));
                }
            }
        };

        let mut contents = entry.to_json()?;
        contents.push('\n');
        file.write_all(contents.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| Error::io_with_source("Failed to write change file", Some(path.clone()), e))?;

        let path = std::path::absolute(&path)
            .map_err(|e| Error::io_with_source("Failed to resolve change file path", Some(path), e))?;
        tracing::info!(path = %path.display(), kind = %entry.kind, "Staged change entry");
        Ok(path)
    }

    /// Whether there is a staging directory to release from.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.next_release_dir().is_dir()
    }

    /// Load every staged entry, in sorted file name order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoChangesFound`] if the staging directory does not
    /// exist, or an error if a staged file cannot be read or parsed.
    pub fn load_pending(&self) -> Result<ReleaseCollection> {
        let dir = self.next_release_dir();
        if !dir.is_dir() {
            return Err(Error::NoChangesFound);
        }

        let mut files: Vec<PathBuf> = read_dir_files(&dir)?
            .into_iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == JSON_EXTENSION))
            .collect();
        files.sort();

        let changes = files
            .iter()
            .map(|path| parse_json::<ChangeEntry>(path))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = changes.len(), "Loaded pending changes");
        Ok(ReleaseCollection::new(changes))
    }

    /// Write a release file for `version` and clear the staging directory.
    ///
    /// The release file is written to a temporary sibling, synced and renamed
    /// into place before staging is removed. If removing staging fails the
    /// release file stays behind and both must be reconciled by hand.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReleaseExists`] if the version was already released,
    /// or an error if writing the release or removing staging fails.
    pub fn consolidate(&self, version: &Version, collection: &ReleaseCollection) -> Result<PathBuf> {
        let path = self.release_path(version);
        if path.exists() {
            return Err(Error::ReleaseExists {
                version: version.to_string(),
                path,
            });
        }

        let mut contents = serde_json::to_string_pretty(&collection.to_file())?;
        contents.push('\n');
        write_atomic(&path, contents.as_bytes())?;
        tracing::debug!(path = %path.display(), "Wrote release file");

        let staging = self.next_release_dir();
        if staging.is_dir() {
            fs::remove_dir_all(&staging).map_err(|e| {
                Error::io_with_source(
                    format!(
                        "Release {version} was written but the staging directory could not be removed"
                    ),
                    Some(staging.clone()),
                    e,
                )
            })?;
        }

        tracing::info!(
            version = %version,
            changes = collection.changes.len(),
            "Consolidated pending changes into release"
        );
        Ok(path)
    }

    /// List released versions in ascending order.
    ///
    /// Only files named `{major}.{minor}.{patch}.json` count as releases. A
    /// missing change directory has no releases.
    ///
    /// # Errors
    ///
    /// Returns an error if the change directory cannot be read.
    pub fn list_released_versions(&self) -> Result<Vec<Version>> {
        if !self.change_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions: Vec<Version> = read_dir_files(&self.change_dir)?
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .filter_map(|name| name.strip_suffix(".json"))
            .filter_map(|stem| stem.parse().ok())
            .collect();
        versions.sort();
        Ok(versions)
    }

    /// Load one release, accepting both the current and the legacy format.
    ///
    /// # Errors
    ///
    /// Returns an error if the release file cannot be read or parsed.
    pub fn load_release(&self, version: &Version) -> Result<ReleaseCollection> {
        let file: ReleaseFile = parse_json(&self.release_path(version))?;
        Ok(ReleaseCollection::from_file(file))
    }

    /// Load every release keyed by version.
    ///
    /// # Errors
    ///
    /// Returns an error if any release file cannot be read or parsed.
    pub fn load_all_releases(&self) -> Result<BTreeMap<Version, ReleaseCollection>> {
        self.list_released_versions()?
            .into_iter()
            .map(|version| Ok((version, self.load_release(&version)?)))
            .collect()
    }

    /// Load `config.toml` from the change directory.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_config(&self) -> Result<ChangelogConfig> {
        let path = self.config_path();
        if !path.is_file() {
            return Ok(ChangelogConfig::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            Error::config(format!("Failed to read {CONFIG_FILE}: {e}"), Some(path.clone()))
        })?;
        let config = ChangelogConfig::from_toml_str(&contents, Some(path.clone()))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Read a named template from the templates directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTemplateName`] if `name` is not a plain file
    /// name, or [`Error::TemplateNotFound`] if there is no such template.
    pub fn load_template(&self, name: &str) -> Result<String> {
        if !is_plain_file_name(name) {
            return Err(Error::InvalidTemplateName {
                name: name.to_string(),
            });
        }

        let path = self.templates_dir().join(name);
        if !path.is_file() {
            return Err(Error::TemplateNotFound {
                name: name.to_string(),
                path,
            });
        }
        fs::read_to_string(&path)
            .map_err(|e| Error::io_with_source("Failed to read template", Some(path), e))
    }
}

/// Build a candidate file name for a staged entry.
fn staged_file_name(entry: &ChangeEntry) -> String {
    let sanitize = |s: &str| -> String { s.chars().filter(char::is_ascii_alphanumeric).collect() };
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!(
        "{:020}-{}-{}-{suffix}.{JSON_EXTENSION}",
        next_timestamp(),
        sanitize(&entry.kind),
        sanitize(&entry.category),
    )
}

/// Wall-clock nanoseconds, forced strictly increasing within this process.
fn next_timestamp() -> u64 {
    static LAST: AtomicU64 = AtomicU64::new(0);

    let now = chrono::Utc::now()
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .unwrap_or_default();
    let previous = LAST
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}

/// A single normal path component with no separators of either platform.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

fn read_dir_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| Error::io_with_source("Failed to read directory", Some(dir.to_path_buf()), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::io_with_source("Failed to read directory entry", Some(dir.to_path_buf()), e)
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::io_with_source("Failed to read change file", Some(path.to_path_buf()), e))?;
    tracing::debug!(path = %path.display(), "Parsing change file");
    serde_json::from_str(&contents).map_err(|source| Error::EntryParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `data` to a temporary sibling of `path`, sync it, then rename it
/// into place.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("tmp");

    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::io_with_source(
            "Failed to write release file",
            Some(tmp_path),
            e,
        ));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::io_with_source("Failed to move release file into place", Some(path.to_path_buf()), e)
    })
}
