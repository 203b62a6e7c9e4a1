//! Error taxonomy for sift
//!
//! Hard errors abort a reassembly call and bubble to the caller. A hit whose
//! record no longer exists in its store is not an error: it is dropped from
//! the result, so a page may hold fewer records than the reported total.

use std::time::Duration;
use thiserror::Error;

/// Result alias used across sift crates
pub type SiftResult<T> = Result<T, SiftError>;

/// Errors raised by registry, backends and the reassembler
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SiftError {
    /// A hit's (index, type) matches no registration
    #[error("unknown document type: index '{index}', type {}", display_type(.doc_type))]
    UnknownDocumentType {
        /// Index reported by the hit
        index: String,
        /// Type reported by the hit, `None` when typeless
        doc_type: Option<String>,
    },

    /// A batch fetch against a record store failed
    #[error("fetch failed for {record_type}: {reason}")]
    FetchFailed {
        /// Record type being fetched
        record_type: String,
        /// Underlying failure
        reason: String,
    },

    /// A registration claims an (index, type) pair that is already taken
    #[error("duplicate registration for index '{index}', type {}: already claimed by {existing}", display_type(.doc_type))]
    DuplicateRegistration {
        /// Index name
        index: String,
        /// Type name
        doc_type: Option<String>,
        /// Record type holding the existing registration
        existing: String,
    },

    /// The call was cancelled by its caller
    #[error("reassembly cancelled")]
    Cancelled,

    /// The call's deadline passed before it completed
    #[error("deadline exceeded after {elapsed_ms}ms")]
    DeadlineExceeded {
        /// Time spent before giving up
        elapsed_ms: u64,
    },

    /// Caller supplied an invalid value
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong
        message: String,
    },

    /// Encoding or decoding failed
    #[error("serialization error: {message}")]
    Serialization {
        /// Decoder message
        message: String,
    },

    /// Configuration could not be loaded
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// A record store could not be read
    #[error("storage error: {message}")]
    Storage {
        /// Underlying failure
        message: String,
    },
}

fn display_type(doc_type: &Option<String>) -> String {
    match doc_type {
        Some(t) => format!("'{}'", t),
        None => "<none>".to_string(),
    }
}

impl SiftError {
    /// Build an `UnknownDocumentType` error.
    pub fn unknown_type(index: impl Into<String>, doc_type: Option<&str>) -> Self {
        SiftError::UnknownDocumentType {
            index: index.into(),
            doc_type: doc_type.map(str::to_string),
        }
    }

    /// Build a `FetchFailed` error.
    pub fn fetch_failed(record_type: impl ToString, reason: impl Into<String>) -> Self {
        SiftError::FetchFailed {
            record_type: record_type.to_string(),
            reason: reason.into(),
        }
    }

    /// Build a `DeadlineExceeded` error from the elapsed time.
    pub fn deadline_exceeded(elapsed: Duration) -> Self {
        SiftError::DeadlineExceeded {
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Build an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SiftError::InvalidInput {
            message: message.into(),
        }
    }

    /// Build a `Serialization` error.
    pub fn serialization(message: impl Into<String>) -> Self {
        SiftError::Serialization {
            message: message.into(),
        }
    }

    /// Build a `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        SiftError::Config {
            message: message.into(),
        }
    }

    /// Build a `Storage` error.
    pub fn storage(message: impl Into<String>) -> Self {
        SiftError::Storage {
            message: message.into(),
        }
    }

    /// True for cancellation and deadline errors.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SiftError::Cancelled | SiftError::DeadlineExceeded { .. })
    }
}

impl From<serde_json::Error> for SiftError {
    fn from(e: serde_json::Error) -> Self {
        SiftError::serialization(e.to_string())
    }
}

impl From<std::io::Error> for SiftError {
    fn from(e: std::io::Error) -> Self {
        SiftError::storage(e.to_string())
    }
}
