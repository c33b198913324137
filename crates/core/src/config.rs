//! Change directory configuration.
//!
//! An optional `config.toml` inside the change directory narrows the allowed
//! entry values and picks a default render template:
//!
//! ```toml
//! [schema]
//! types = ["feature", "bugfix", "enhancement"]
//! categories = ["parser", "lexer"]
//!
//! [render]
//! template = "rst"
//! ```
//!
//! Reading the file is left to [`ChangeStore::load_config`](crate::ChangeStore::load_config);
//! this module only decodes it.

use crate::error::{Error, Result};
use crate::schema::{DEFAULT_CATEGORIES, DEFAULT_TYPES, EntrySchema};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the configuration inside the change directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Complete chlog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Allowed entry values.
    pub schema: SchemaConfig,
    /// Rendering settings.
    pub render: RenderConfig,
}

/// Allowed values for the constrained entry fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Allowed entry types; empty accepts anything.
    pub types: Vec<String>,
    /// Allowed categories; empty accepts anything.
    pub categories: Vec<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            types: DEFAULT_TYPES.iter().map(ToString::to_string).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Name of a file in `templates/` used when no template is requested.
    pub template: Option<String>,
}

impl ChangelogConfig {
    /// Decode a `config.toml` document.
    ///
    /// `path` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is not valid TOML of the
    /// expected shape.
    pub fn from_toml_str(contents: &str, path: Option<PathBuf>) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::config(e.to_string(), path))
    }

    /// The validation schema described by this configuration.
    #[must_use]
    pub fn schema(&self) -> EntrySchema {
        EntrySchema::new(self.schema.types.clone(), self.schema.categories.clone())
    }
}
