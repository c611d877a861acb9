//! Error types for depstash
//!
//! All modules use `StashResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for depstash operations
pub type StashResult<T> = Result<T, StashError>;

/// All errors that can occur in depstash
#[derive(Error, Debug)]
pub enum StashError {
    // Caller errors
    #[error("unknown package manager specified: {0}")]
    UnsupportedPackageManager(String),

    #[error("No file in {} matched to [{patterns}]", work_dir.display())]
    NoMatchingFiles { work_dir: PathBuf, patterns: String },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    PatternInvalid { pattern: String, reason: String },

    // Artifact store errors, classified by the store adapter so the
    // coordinators never inspect message strings.
    #[error("{0}")]
    ReserveConflict(String),

    #[error("archive creation failed: {0}")]
    ArchiveFailure(String),

    #[error("cache store error: {0}")]
    StoreFailure(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Home directory could not be resolved")]
    HomeDirUnavailable,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StashError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Build a `NoMatchingFiles` error from the effective pattern list
    pub fn no_matching_files(work_dir: impl Into<PathBuf>, patterns: &[String]) -> Self {
        Self::NoMatchingFiles {
            work_dir: work_dir.into(),
            patterns: patterns.join(","),
        }
    }

    /// Whether a save failure on this error may be swallowed by the caller
    pub fn is_reserve_conflict(&self) -> bool {
        matches!(self, Self::ReserveConflict(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedPackageManager(_) => Some("Supported values: maven, gradle, sbt"),
            Self::NoMatchingFiles { .. } => {
                Some("Check that the project is checked out and --dependency-path is correct")
            }
            _ => None,
        }
    }
}
