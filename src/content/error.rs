//! Errors raised while reading records

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A record's front matter could not be read or written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The opening marker line has no matching closing marker
    #[error("front matter opened on line {line} is never closed")]
    Unterminated { line: usize },

    /// The block between the markers is not valid key-value text
    #[error("invalid front matter on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The block parsed, but is a list or scalar instead of a mapping
    #[error("front matter must be a key-value mapping")]
    NotAMapping,

    /// A value has a shape the record format does not allow
    #[error("unsupported {kind} value for key `{key}`")]
    Unsupported { key: String, kind: &'static str },

    #[error("duplicate front matter key `{key}`")]
    DuplicateKey { key: String },

    #[error("failed to serialize front matter: {0}")]
    Serialize(String),
}

/// A filename is not a valid `YYYY-MM-DD-slug` identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("`{0}` does not match YYYY-MM-DD-slug")]
    Shape(String),

    #[error("`{0}` is not a valid calendar date")]
    Date(String),

    #[error("`{0}` is not a URL-safe slug")]
    Slug(String),
}

/// Per-record failure while enumerating the store
///
/// Each variant carries the path of the offending file so a caller can report
/// it and move on to the next record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad record name {path:?}: {source}")]
    Identifier {
        path: PathBuf,
        #[source]
        source: IdentifierError,
    },

    #[error("malformed record {path:?}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("{path:?} reuses identifier `{id}` already taken by {first:?}")]
    Duplicate {
        path: PathBuf,
        id: String,
        first: PathBuf,
    },
}

impl StoreError {
    /// Path of the record the error belongs to
    pub fn path(&self) -> &std::path::Path {
        match self {
            StoreError::Io { path, .. }
            | StoreError::Identifier { path, .. }
            | StoreError::Format { path, .. }
            | StoreError::Duplicate { path, .. } => path,
        }
    }
}
