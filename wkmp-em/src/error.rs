//! Error types for wkmp-em
//!
//! Merge failures are terminal for the current merge attempt: nothing is
//! retried and no partially assembled entity is returned.

use serde_json::Value;
use thiserror::Error;

/// Result type for merge operations
pub type MergeResult<T> = std::result::Result<T, MergeError>;

/// Fatal fragment merge errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// Entity kind has no registered schema
    #[error("Unsupported entity kind: \"{0}\"")]
    UnsupportedKind(String),

    /// Fragment is not a single-key object
    #[error("Invalid fragment: {0}")]
    InvalidFragment(String),

    /// A second fragment resolved to the whole-entity slot
    #[error("Entity already parsed, duplicate root fragment \"{0}\"")]
    DuplicateRoot(String),

    /// Declared parent path does not exist in the tree built so far
    #[error("Unable to find parent: {0}")]
    ParentNotFound(String),

    /// A match-based rule targeted a value that is not an array
    #[error("Unable to find match, expected an array at \"{0}\"")]
    ExpectedCollection(String),

    /// No element of the target array satisfied the matcher
    #[error("Unable to find match in \"{0}\"")]
    MatchNotFound(String),

    /// Scalar placeholder disagrees with the incoming fragment identifier
    #[error("Invalid item (expected {expected}, found {found})")]
    IdentityMismatch { expected: Value, found: Value },

    /// Strict mode: no array element carried the fragment identifier
    #[error("No placeholder for {id} at \"{path}\"")]
    PlaceholderNotFound { path: String, id: Value },

    /// Strict mode: fragments were supplied but none of them was the root
    #[error("No root fragment found")]
    MissingRoot,
}

/// Schema construction and loading errors
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid path \"{path}\": {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Duplicate fragment \"{fragment}\" for entity \"{entity}\"")]
    DuplicateFragment { entity: String, fragment: String },

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Entity \"{0}\" declares more than one root fragment")]
    MultipleRoots(String),

    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),

    #[error("Invalid rule for \"{fragment}\": {reason}")]
    InvalidRule { fragment: String, reason: String },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        SchemaError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_rule(fragment: &str, reason: impl Into<String>) -> Self {
        SchemaError::InvalidRule {
            fragment: fragment.to_string(),
            reason: reason.into(),
        }
    }
}
