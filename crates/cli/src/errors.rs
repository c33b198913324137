//! CLI error types and their exit codes.
//!
//! Expected outcomes such as an invalid entry or nothing to release are
//! reported as a plain message; everything else goes through miette so the
//! full source chain and help text are shown.

use miette::{Diagnostic, Report};
use std::io::{self, Write};
use thiserror::Error;

/// Successful execution exit code
pub const EXIT_OK: i32 = 0;
/// Invalid input or nothing to do exit code
pub const EXIT_REJECTED: i32 = 1;
/// Usage error exit code (matches clap)
pub const EXIT_CLI: i32 = 2;
/// Storage, template or editor failure exit code
pub const EXIT_FAILURE: i32 = 3;

/// CLI-specific error types with exit code mapping
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The user's request was understood but cannot be honoured (exit code 1)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Rejected(chlog_core::Error),

    /// The operation failed (exit code 3)
    #[error(transparent)]
    #[diagnostic(transparent)]
    Failed(chlog_core::Error),

    /// Startup or argument handling failed (exit code 2)
    #[error("CLI error: {message}")]
    #[diagnostic(code(chlog::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a CLI configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }
}

impl From<chlog_core::Error> for CliError {
    fn from(err: chlog_core::Error) -> Self {
        if err.is_user_facing() {
            Self::Rejected(err)
        } else {
            Self::Failed(err)
        }
    }
}

/// Get the exit code for an error
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Rejected(_) => EXIT_REJECTED,
        CliError::Config { .. } => EXIT_CLI,
        CliError::Failed(_) => EXIT_FAILURE,
    }
}

fn error_code(err: &CliError) -> &'static str {
    match err {
        CliError::Rejected(_) => "rejected",
        CliError::Failed(_) => "failed",
        CliError::Config { .. } => "config",
    }
}

/// Write an error to stderr, as JSON when `json_mode` is set
#[allow(clippy::print_stderr)]
pub fn render_error(err: CliError, json_mode: bool) {
    if json_mode {
        let envelope = serde_json::json!({
            "status": "error",
            "error": {
                "code": error_code(&err),
                "message": err.to_string(),
            },
        });
        eprintln!("{envelope}");
    } else if let CliError::Rejected(inner) = &err {
        eprintln!("{inner}");
    } else {
        eprintln!("{:?}", Report::new(err));
    }
    let _ = io::stderr().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(EXIT_OK, 0);

        let rejected: CliError = chlog_core::Error::NoChangesFound.into();
        assert!(matches!(rejected, CliError::Rejected(_)));
        assert_eq!(exit_code_for(&rejected), EXIT_REJECTED);

        let invalid: CliError = chlog_core::Error::validation(vec!["bad".to_string()]).into();
        assert_eq!(exit_code_for(&invalid), EXIT_REJECTED);

        let failed: CliError = chlog_core::Error::editor("exited with 1").into();
        assert!(matches!(failed, CliError::Failed(_)));
        assert_eq!(exit_code_for(&failed), EXIT_FAILURE);

        assert_eq!(exit_code_for(&CliError::config("bad flag")), EXIT_CLI);
    }

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: CliError = chlog_core::Error::NoChangesFound.into();
        assert_eq!(err.to_string(), "There are no pending changes.");
    }

    #[test]
    fn test_wrapped_errors_keep_their_diagnostic_code() {
        let err: CliError = chlog_core::Error::invalid_version("1.x").into();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("chlog::version::invalid"));
    }
}
