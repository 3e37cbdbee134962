//! Error types for the folio-index crate.

use std::{io, path::PathBuf};

use folio_query::QueryError;
use tantivy::TantivyError;
use thiserror::Error;

/// Errors that can occur when working with the document index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index could not be opened or created.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Another writer holds the index lock.
    #[error("index at {path} is unavailable: {message}")]
    IndexUnavailable {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// On-disk index data is damaged or was written by an incompatible version.
    #[error("index at {path} is corrupt or incompatible: {message}")]
    StoreCorruption {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// A record failed validation or conversion and was not indexed.
    #[error("malformed record '{id}': {reason}")]
    MalformedRecord {
        /// Record id as supplied (may be empty).
        id: String,
        /// Why the record was rejected.
        reason: String,
    },

    /// The query could not be parsed or compiled.
    #[error("{0}")]
    Query(#[from] QueryError),

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to read from the index.
    #[error("failed to read index: {0}")]
    Read(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid index settings.
    #[error("invalid index settings: {0}")]
    Settings(String),

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),
}

impl IndexError {
    /// Classifies a Tantivy error raised while opening an index.
    pub(crate) fn open_index(path: PathBuf, source: &TantivyError) -> Self {
        let message = source.to_string();
        match source {
            TantivyError::LockFailure(..) => Self::IndexUnavailable { path, message },
            TantivyError::DataCorruption(_)
            | TantivyError::IncompatibleIndex(_)
            | TantivyError::SchemaError(_)
            | TantivyError::OpenReadError(_) => Self::StoreCorruption { path, message },
            _ => Self::OpenIndex { path, message },
        }
    }

    /// Creates a `MalformedRecord` error.
    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Read` error from a Tantivy error.
    pub(crate) fn read(source: &TantivyError) -> Self {
        Self::Read(source.to_string())
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use tantivy::directory::error::LockError;

    use super::*;

    #[test]
    fn lock_failure_is_unavailable() {
        let err = IndexError::open_index(
            Path::new("/idx").to_path_buf(),
            &TantivyError::LockFailure(LockError::LockBusy, None),
        );
        assert!(matches!(err, IndexError::IndexUnavailable { .. }));
    }

    #[test]
    fn other_errors_are_open_failures() {
        let err = IndexError::open_index(
            Path::new("/idx").to_path_buf(),
            &TantivyError::InvalidArgument("bad".into()),
        );
        assert!(matches!(err, IndexError::OpenIndex { .. }));
        assert!(err.to_string().contains("/idx"));
    }

    #[test]
    fn malformed_names_the_record() {
        let err = IndexError::malformed("doc-7", "empty id");
        assert_eq!(err.to_string(), "malformed record 'doc-7': empty id");
    }
}
