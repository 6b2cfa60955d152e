use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report generated (or cache cleared) successfully
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (registry error, config error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for scope graph generation.
///
/// The first three variants form the per-package error taxonomy: they are
/// raised while retrieving one package's data and are caught at the batch
/// boundary, where the package is skipped. The remaining variants are fatal
/// for the whole run.
#[derive(Debug, Error)]
pub enum ScopeGraphError {
    /// Non-success HTTP status or network failure
    #[error("Failed to fetch {what} for \"{package}\"\nDetails: {details}")]
    FetchError {
        package: String,
        what: String,
        details: String,
    },

    /// Response body is not well-formed JSON or does not match the expected shape
    #[error("Invalid response body for \"{package}\"\nDetails: {details}")]
    ParseError { package: String, details: String },

    /// Data present but structurally unusable (e.g. no `downloads` array)
    #[error("Unusable data for \"{package}\": {details}")]
    PartialDataError { package: String, details: String },

    #[error("No packages found in scope {scope}\n\n💡 Hint: Check the scope name (it must start with '@') and your network connection")]
    NoPackagesFound { scope: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    InvalidConfig { message: String, hint: String },

    #[error("Unsupported output: {message}\n\n💡 Hint: {hint}")]
    UnsupportedFormat { message: String, hint: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Cache store error: {path}\nDetails: {details}\n\n💡 Hint: Run `scope-graph cache clear` or delete the file to start over")]
    CacheStoreError { path: PathBuf, details: String },
}

impl ScopeGraphError {
    /// True for the per-package errors a batch may skip over
    pub fn is_package_level(&self) -> bool {
        matches!(
            self,
            ScopeGraphError::FetchError { .. }
                | ScopeGraphError::ParseError { .. }
                | ScopeGraphError::PartialDataError { .. }
        )
    }
}
