//! Error types for batch-api
//!
//! This module separates the two error channels of a batch call:
//! - [`Error`] rejects a whole call (malformed input, invalid config, broken invariants)
//! - [`TaskError`] describes a single failed request and lives inside its result slot
//!
//! It also carries the error types of the KMZ codec and the sector store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for batch-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for batch-api
///
/// Returned when a call fails as a whole. Per-request failures never use this type;
/// they are reported as [`TaskError`] in the matching output slot.
#[derive(Debug, Error)]
pub enum Error {
    /// A request descriptor in the batch is malformed; nothing was dispatched
    #[error("invalid batch: {0}")]
    Validation(#[from] ValidationError),

    /// Aggregation found a missing or duplicated task index
    #[error("internal consistency error: {0}")]
    InternalConsistency(#[from] ConsistencyError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "request_timeout")
        key: Option<String>,
    },

    /// Sector store error
    #[error("sector store error: {0}")]
    Sector(#[from] SectorError),

    /// KMZ codec error
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error outside of a single task (e.g. building the HTTP client)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Machine-readable error code for this error
    pub fn error_code(&self) -> &str {
        match self {
            Error::Validation(e) => match e {
                ValidationError::NotAnObject { .. } => "not_an_object",
                ValidationError::MissingKey { .. } => "missing_key",
                ValidationError::NotAString { .. } => "not_a_string",
                ValidationError::EmptyUrl { .. } => "empty_url",
            },
            Error::InternalConsistency(_) => "internal_consistency",
            Error::Config { .. } => "config_error",
            Error::Sector(_) => "sector_error",
            Error::Archive(_) => "archive_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
        }
    }

    /// Returns true if the whole batch was rejected because of caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Schema violations found while validating a batch
///
/// Every variant names the position of the offending element so the caller can
/// locate it in their input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Element is not a key/value mapping
    #[error("request {index} is not an object; expected a mapping with url and body keys")]
    NotAnObject {
        /// Position of the element in the batch
        index: usize,
    },

    /// A mandatory key is absent
    #[error("request {index} is missing the `{key}` key; expected a mapping with url and body keys")]
    MissingKey {
        /// Position of the element in the batch
        index: usize,
        /// The missing key ("url" or "body")
        key: &'static str,
    },

    /// A mandatory key holds something other than a string
    #[error("request {index} has a non-string `{key}` value")]
    NotAString {
        /// Position of the element in the batch
        index: usize,
        /// The offending key ("url" or "body")
        key: &'static str,
    },

    /// The url is present but empty
    #[error("request {index} has an empty url")]
    EmptyUrl {
        /// Position of the element in the batch
        index: usize,
    },
}

impl ValidationError {
    /// Position of the rejected element
    pub fn index(&self) -> usize {
        match self {
            ValidationError::NotAnObject { index }
            | ValidationError::MissingKey { index, .. }
            | ValidationError::NotAString { index, .. }
            | ValidationError::EmptyUrl { index } => *index,
        }
    }
}

/// Aggregation invariant violations. These indicate a scheduler bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// Two task results claimed the same slot
    #[error("task index {0} reported more than once")]
    DuplicateIndex(usize),

    /// A task result pointed past the end of the batch
    #[error("task index {index} out of range for batch of {len}")]
    IndexOutOfRange {
        /// The reported index
        index: usize,
        /// Expected batch length
        len: usize,
    },

    /// No task result was reported for a slot
    #[error("no result for task index {0}")]
    MissingIndex(usize),
}

/// Classification of a single request failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskErrorKind {
    /// The request did not finish within the configured timeout
    Timeout,
    /// Could not connect to the remote host
    Connect,
    /// Any other transport-level failure (invalid url, TLS, redirect loop, ...)
    Transport,
    /// The remote answered with a non-success status and the policy treats it as failure
    Status,
    /// The response body could not be read
    Body,
    /// The executor task panicked or was aborted
    Panicked,
}

impl TaskErrorKind {
    /// Stable string form, suitable for logs and host bindings
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskErrorKind::Timeout => "timeout",
            TaskErrorKind::Connect => "connect",
            TaskErrorKind::Transport => "transport",
            TaskErrorKind::Status => "status",
            TaskErrorKind::Body => "body",
            TaskErrorKind::Panicked => "panicked",
        }
    }
}

impl std::fmt::Display for TaskErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one request in a batch
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} error: {message}")]
pub struct TaskError {
    /// What went wrong
    pub kind: TaskErrorKind,
    /// Human-readable detail
    pub message: String,
    /// HTTP status, when the remote answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl TaskError {
    /// Create a task error without a status code
    pub fn new(kind: TaskErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Create a [`TaskErrorKind::Status`] error for a non-success response
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: TaskErrorKind::Status,
            message: message.into(),
            status: Some(status),
        }
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TaskErrorKind::Timeout
        } else if e.is_connect() {
            TaskErrorKind::Connect
        } else if e.is_body() || e.is_decode() {
            TaskErrorKind::Body
        } else {
            TaskErrorKind::Transport
        };
        Self {
            kind,
            message: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        }
    }
}

/// KMZ codec errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Could not open or read the archive container
    #[error("failed to read KMZ archive: {0}")]
    Read(String),

    /// Could not write the archive or the extracted markup
    #[error("failed to write {path}: {reason}")]
    Write {
        /// Destination that failed
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Could not open an input file
    #[error("failed to open {path}: {reason}")]
    Open {
        /// Input path
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// The archive holds no `.kml` entry
    #[error("KMZ archive contains no .kml entry")]
    NoMarkupEntry,

    /// The `.kml` entry is not valid UTF-8
    #[error("KML entry is not valid UTF-8")]
    InvalidUtf8,
}

/// Sector store errors
#[derive(Debug, Error)]
pub enum SectorError {
    /// The KMZ file could not be opened or unpacked
    #[error("invalid KMZ file at {path}: {reason}")]
    Archive {
        /// Path of the KMZ file
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// The KML markup could not be parsed
    #[error("unable to parse KML: {0}")]
    Parse(String),

    /// The markup parsed but does not have the expected document structure
    #[error("invalid KML document: {0}")]
    InvalidDocument(String),

    /// A placemark lacks its sector name
    #[error("placemark {position} has no sector name")]
    MissingName {
        /// Position of the placemark within the document
        position: usize,
    },

    /// A placemark geometry could not be converted
    #[error("placemark {name} has unusable geometry: {reason}")]
    Geometry {
        /// Sector name of the placemark
        name: String,
        /// Underlying reason
        reason: String,
    },
}
