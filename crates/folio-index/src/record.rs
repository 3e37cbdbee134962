//! The unit of ingestion.
//!
//! A [`DocumentRecord`] carries the extracted text of one source file plus its
//! identity and file-level attributes. Extractors produce records; the write
//! session consumes them.

use std::{collections::BTreeMap, path::Path, time::SystemTime};

use crate::IndexError;

/// Extracted text and attributes of one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Caller-supplied identity; the only key for replace and delete.
    pub id: String,
    /// Path of the source file.
    pub file_path: String,
    /// Display name, usually the last path component.
    pub file_name: String,
    /// Full extracted text.
    pub content: String,
    /// Per-page text, page `n` at index `n - 1`.
    pub page_contents: Option<Vec<String>>,
    /// MIME-like type.
    pub content_type: String,
    /// Source size in bytes.
    pub file_size: u64,
    /// Source modification time.
    pub last_modified: SystemTime,
    /// When the record was produced.
    pub indexed_at: SystemTime,
    /// Free-form string attributes.
    pub metadata: BTreeMap<String, String>,
}

impl DocumentRecord {
    /// Creates a record with the file name taken from `file_path`.
    ///
    /// Timestamps default to now, the content type to `text/plain`, and the
    /// size to the content length.
    pub fn new(id: impl Into<String>, file_path: impl Into<String>, content: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let content = content.into();
        let file_name = Path::new(&file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.clone());
        let now = SystemTime::now();

        Self {
            id: id.into(),
            file_size: content.len() as u64,
            file_path,
            file_name,
            content,
            page_contents: None,
            content_type: String::from("text/plain"),
            last_modified: now,
            indexed_at: now,
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the per-page text.
    pub fn with_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page_contents = Some(pages.into_iter().map(Into::into).collect());
        self
    }

    /// Adds one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Overrides the display file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Overrides the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Number of pages, when the record is paginated.
    pub fn page_count(&self) -> Option<usize> {
        self.page_contents.as_ref().map(Vec::len)
    }

    /// Checks the invariants that indexing relies on.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.id.trim().is_empty() {
            return Err(IndexError::malformed(&self.id, "id must not be empty"));
        }
        for key in self.metadata.keys() {
            if key.is_empty() {
                return Err(IndexError::malformed(&self.id, "metadata key must not be empty"));
            }
            if key.chars().any(char::is_control) {
                return Err(IndexError::malformed(
                    &self.id,
                    format!("metadata key {key:?} contains control characters"),
                ));
            }
        }
        Ok(())
    }
}
