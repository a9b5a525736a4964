//! Errors raised while reading or writing project files.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by [`super::Project`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Raised when a required file is absent.
    #[error("missing required file: {path}")]
    MissingFile {
        /// Path that was expected to exist.
        path: Utf8PathBuf,
    },
    /// Raised when a file is not valid JSON.
    #[error("invalid JSON in {path}: {message}")]
    MalformedJson {
        /// Path that could not be parsed.
        path: Utf8PathBuf,
        /// Parser error message.
        message: String,
    },
    /// Raised when a mandatory field is missing or has the wrong type.
    #[error("{path} is missing {field} (or it has the wrong type)")]
    MissingField {
        /// File that lacks the field.
        path: Utf8PathBuf,
        /// Dotted field path.
        field: String,
    },
    /// Raised when the requested build profile is not declared.
    #[error("{path} has no build profile named {profile:?} (available: {available})")]
    UnknownProfile {
        /// Requested profile name.
        profile: String,
        /// Profile declaration file.
        path: Utf8PathBuf,
        /// Declared profile names, comma separated.
        available: String,
    },
    /// Raised when an existing value blocks an edit.
    #[error("invalid structure in {path}: {message}")]
    InvalidStructure {
        /// File with the unexpected structure.
        path: Utf8PathBuf,
        /// Human-readable description.
        message: String,
    },
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Operating system error string.
        message: String,
    },
    /// Raised when a document cannot be rendered back to JSON.
    #[error("failed to serialise {path}: {message}")]
    Serialize {
        /// Path being written.
        path: Utf8PathBuf,
        /// Serializer error message.
        message: String,
    },
}
