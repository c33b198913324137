//! Error types for change entry and release operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for chlog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while recording, releasing or rendering changes.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A change entry failed schema validation.
    ///
    /// Carries every violation found, in the order they were detected.
    #[error("The change entry is invalid:\n\n{}", .errors.join("\n"))]
    #[diagnostic(
        code(chlog::entry::invalid),
        help("Fill in every field and use one of the allowed values")
    )]
    Validation {
        /// Every violation, one message per violated rule
        errors: Vec<String>,
    },

    /// The staging directory does not exist, so there is nothing to release.
    #[error("There are no pending changes.")]
    #[diagnostic(
        code(chlog::release::no_changes),
        help("Record a change with 'chlog new-change' first")
    )]
    NoChangesFound,

    /// A template could not be compiled or rendered.
    #[error("Failed to render changelog: {message}")]
    #[diagnostic(
        code(chlog::render::template),
        help("Check the template syntax and the names of the fields it references")
    )]
    Render {
        /// The error message
        message: String,
        /// The underlying template engine error
        #[source]
        source: Option<minijinja::Error>,
    },

    /// A version string is not a plain `major.minor.patch` triple.
    #[error("Invalid version: {version}")]
    #[diagnostic(
        code(chlog::version::invalid),
        help("Versions must be plain major.minor.patch numbers (e.g., 1.4.0)")
    )]
    InvalidVersion {
        /// The invalid version string
        version: String,
    },

    /// A release file already exists for the requested version.
    #[error("Release {version} already exists")]
    #[diagnostic(
        code(chlog::release::exists),
        help("Releases are immutable; pick a different version with --release-version")
    )]
    ReleaseExists {
        /// The version that was requested
        version: String,
        /// The existing release file
        path: PathBuf,
    },

    /// A named render template was not found in the templates directory.
    #[error("Template not found: {name}")]
    #[diagnostic(
        code(chlog::render::template_not_found),
        help("Templates are looked up in the 'templates' directory of the change directory")
    )]
    TemplateNotFound {
        /// The template name
        name: String,
        /// The path that was checked
        path: PathBuf,
    },

    /// A template name that would resolve outside the templates directory.
    #[error("Invalid template name: {name}")]
    #[diagnostic(
        code(chlog::render::invalid_template_name),
        help("Pass the plain file name of a template in the 'templates' directory")
    )]
    InvalidTemplateName {
        /// The rejected name
        name: String,
    },

    /// Failed to read or write a file under the change directory.
    #[error("I/O error: {message}")]
    #[diagnostic(
        code(chlog::storage::io),
        help("Check that the change directory exists and is writable")
    )]
    Io {
        /// The error message
        message: String,
        /// The path that caused the error
        path: Option<PathBuf>,
        /// The underlying source error
        #[source]
        source: Option<std::io::Error>,
    },

    /// A staged entry or release file is not valid JSON of the expected shape.
    #[error("Malformed change file: {}", .path.display())]
    #[diagnostic(
        code(chlog::storage::parse),
        help("Fix or remove the file; change files must contain type, category and description")
    )]
    EntryParse {
        /// The file that failed to parse
        path: PathBuf,
        /// The underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// The interactive editor could not be launched or exited with an error.
    #[error("Editor error: {message}")]
    #[diagnostic(
        code(chlog::prompt::editor),
        help("Set $VISUAL or $EDITOR to an editor that exits with status 0")
    )]
    Editor {
        /// The error message
        message: String,
    },

    /// The change directory configuration file is invalid.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(chlog::config), help("Check the syntax of config.toml"))]
    Config {
        /// The error message
        message: String,
        /// The configuration file path
        path: Option<PathBuf>,
    },

    /// Wrapped JSON error.
    #[error("JSON error: {0}")]
    #[diagnostic(code(chlog::json))]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new validation error from the collected violations.
    #[must_use]
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    /// Create a new render error.
    #[must_use]
    pub fn render(message: impl Into<String>, source: Option<minijinja::Error>) -> Self {
        Self::Render {
            message: message.into(),
            source,
        }
    }

    /// Create a new invalid version error.
    #[must_use]
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create a new I/O error with source.
    #[must_use]
    pub fn io_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    /// Create a new editor error.
    #[must_use]
    pub fn editor(message: impl Into<String>) -> Self {
        Self::Editor {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path,
        }
    }

    /// Whether this error is an expected outcome the user can act on
    /// (invalid input or nothing to release) rather than a failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NoChangesFound)
    }
}
