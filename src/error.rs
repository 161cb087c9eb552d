//! Error types for document loading, building, and overrides.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading an API description document.
#[derive(Debug, Error)]
pub enum DocumentError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot fetch {url}: built without the 'remote' feature")]
    RemoteDisabled { url: String },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("pointer not found: {pointer}")]
    PointerNotFound { pointer: String },
}

impl DocumentError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DocumentError::FileNotFound { .. } | DocumentError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            DocumentError::NetworkError { .. } => 3,
            DocumentError::RemoteDisabled { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while loading or validating generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config with {} violation(s)", violations.len())]
    Invalid { violations: Vec<ConfigViolation> },
}

/// Single config validation violation with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConfigViolation {
    /// JSON Pointer (RFC 6901) to the offending config value.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ConfigError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::FileNotFound { .. } | ConfigError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while locating an operation's schemas in the document.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("path \"{path}\" not found in document")]
    UnknownPath { path: String },

    #[error("no {method} operation on \"{path}\"")]
    UnknownMethod { path: String, method: String },

    #[error("cannot resolve $ref \"{reference}\": {message}")]
    BadReference { reference: String, message: String },

    #[error("circular $ref chain through \"{reference}\"")]
    CircularReference { reference: String },
}

/// Errors while turning a schema node into an attribute tree.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid schema node at \"{path}\": expected object, got {actual}")]
    InvalidNode { path: String, actual: String },

    #[error("unsupported schema at \"{path}\": {message}")]
    UnsupportedSchema { path: String, message: String },
}

/// Errors while applying a single override entry.
///
/// Collected and reported, never fatal: a failed entry leaves its target
/// attribute unchanged and other entries proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("override path \"{path}\" descends into non-nested attribute \"{attribute}\"")]
    NotNested { path: String, attribute: String },

    #[error("unknown computability \"{token}\" at \"{path}\": expected computed, optional, required, or computed_optional")]
    UnknownComputability { path: String, token: String },
}
