//! Data structures returned by snapshot reads.

use std::collections::BTreeMap;

use serde::Serialize;
use tantivy::{
    TantivyDocument,
    schema::{Field, Value},
};

use crate::{IndexError, schema::IndexSchema};

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Record id.
    pub document_id: String,
    /// Source path.
    pub file_path: String,
    /// Display name.
    pub file_name: String,
    /// Content type.
    pub content_type: String,
    /// Relevance, higher is better.
    pub score: f32,
    /// Source size in bytes.
    pub file_size: u64,
    /// Source modification time, seconds since the Unix epoch.
    pub last_modified: i64,
    /// Indexing time, seconds since the Unix epoch.
    pub indexed_at: i64,
    /// Number of pages for paginated records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
    /// Pages containing a query word, ascending.
    pub matched_pages: Vec<u32>,
    /// Excerpt around the first query word.
    pub snippet: String,
}

/// Stored fields of one live document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    /// Record id.
    pub id: String,
    /// Source path.
    pub file_path: String,
    /// Display name.
    pub file_name: String,
    /// Content type.
    pub content_type: String,
    /// Source size in bytes.
    pub file_size: u64,
    /// Source modification time, seconds since the Unix epoch.
    pub last_modified: i64,
    /// Indexing time, seconds since the Unix epoch.
    pub indexed_at: i64,
    /// Number of pages for paginated records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
    /// Metadata pairs.
    pub metadata: BTreeMap<String, String>,
}

impl DocumentSummary {
    /// Reads the summary out of a stored document.
    pub(crate) fn from_doc(schema: &IndexSchema, doc: &TantivyDocument) -> Result<Self, IndexError> {
        let meta = text(doc, schema.meta);
        let metadata = if meta.is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&meta)
                .map_err(|e| IndexError::Read(format!("stored metadata is not valid JSON: {e}")))?
        };

        Ok(Self {
            id: text(doc, schema.id),
            file_path: text(doc, schema.file_path),
            file_name: text(doc, schema.file_name),
            content_type: text(doc, schema.content_type),
            file_size: number(doc, schema.file_size).unwrap_or(0),
            last_modified: timestamp(doc, schema.last_modified),
            indexed_at: timestamp(doc, schema.indexed_at),
            page_count: number(doc, schema.page_count),
            metadata,
        })
    }
}

/// Counts describing the committed index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Live documents.
    pub total_documents: u64,
    /// Deleted documents not yet purged by a merge.
    pub deleted_documents: u64,
    /// Document slots across segments, deleted included.
    pub max_doc: u64,
    /// Number of segments.
    pub segments: usize,
}

/// First stored text value of `field`, or empty.
pub(crate) fn text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// First stored u64 value of `field`.
pub(crate) fn number(doc: &TantivyDocument, field: Field) -> Option<u64> {
    doc.get_first(field).and_then(|v| v.as_u64())
}

/// First stored date of `field` as epoch seconds, or 0.
pub(crate) fn timestamp(doc: &TantivyDocument, field: Field) -> i64 {
    doc.get_first(field)
        .and_then(|v| v.as_datetime())
        .map(|d| d.into_timestamp_secs())
        .unwrap_or(0)
}
