//! Conversion of records into engine documents.
//!
//! A record is first flattened into a list of [`IndexField`]s tagged with how
//! each value is meant to be handled. The list is then checked against the
//! schema and turned into a Tantivy document.

use std::time::{SystemTime, UNIX_EPOCH};

use tantivy::{DateTime, TantivyDocument, schema::FieldType};

use crate::{
    IndexError,
    pages::encode_pages,
    record::DocumentRecord,
    schema::{IndexSchema, names},
};

/// How a field participates in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Searchable, not retrievable.
    Indexed,
    /// Retrievable, not searchable.
    Stored,
    /// Searchable and retrievable.
    Both,
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text, tokenized or raw depending on the schema.
    Text(String),
    /// Unsigned integer.
    U64(u64),
    /// Timestamp.
    Date(SystemTime),
}

/// One named, tagged value destined for the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexField {
    /// Schema field name.
    pub name: &'static str,
    /// Intended handling.
    pub kind: FieldKind,
    /// The value.
    pub value: FieldValue,
}

impl IndexField {
    /// Creates a field.
    fn new(name: &'static str, kind: FieldKind, value: FieldValue) -> Self {
        Self { name, kind, value }
    }

    /// Creates a text field.
    fn text(name: &'static str, kind: FieldKind, value: impl Into<String>) -> Self {
        Self::new(name, kind, FieldValue::Text(value.into()))
    }
}

/// Flattens a record into its index fields.
///
/// Page text is capped at `page_text_cap` characters per page; `content` is
/// never truncated. Paging fields are only emitted for paginated records.
pub fn record_fields(record: &DocumentRecord, page_text_cap: usize) -> Result<Vec<IndexField>, IndexError> {
    use FieldKind::{Both, Indexed, Stored};

    let meta = serde_json::to_string(&record.metadata)
        .map_err(|e| IndexError::malformed(&record.id, format!("metadata not encodable: {e}")))?;
    let metadata_text = record
        .metadata
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let mut fields = vec![
        IndexField::text(names::ID, Both, record.id.as_str()),
        IndexField::text(names::FILE_PATH, Both, record.file_path.as_str()),
        IndexField::text(names::FILE_NAME, Both, record.file_name.as_str()),
        IndexField::text(names::CONTENT, Both, record.content.as_str()),
        IndexField::text(names::METADATA, Indexed, metadata_text),
        IndexField::text(names::META, Stored, meta),
        IndexField::text(names::CONTENT_TYPE, Both, record.content_type.as_str()),
        IndexField::new(names::FILE_SIZE, Stored, FieldValue::U64(record.file_size)),
        IndexField::new(names::LAST_MODIFIED, Both, FieldValue::Date(record.last_modified)),
        IndexField::new(names::INDEXED_AT, Both, FieldValue::Date(record.indexed_at)),
    ];

    if let Some(pages) = &record.page_contents {
        fields.push(IndexField::text(
            names::PAGES,
            Stored,
            encode_pages(pages, page_text_cap),
        ));
        fields.push(IndexField::new(
            names::PAGE_COUNT,
            Both,
            FieldValue::U64(pages.len() as u64),
        ));
    }

    Ok(fields)
}

/// Builds a Tantivy document, rejecting fields the schema cannot hold as tagged.
pub fn to_document(schema: &IndexSchema, id: &str, fields: Vec<IndexField>) -> Result<TantivyDocument, IndexError> {
    let mut doc = TantivyDocument::new();

    for field in fields {
        let handle = schema
            .schema()
            .get_field(field.name)
            .map_err(|_| IndexError::malformed(id, format!("unknown field '{}'", field.name)))?;
        let entry = schema.schema().get_field_entry(handle);

        let fits = match field.kind {
            FieldKind::Indexed => entry.is_indexed(),
            FieldKind::Stored => entry.is_stored(),
            FieldKind::Both => entry.is_indexed() && entry.is_stored(),
        };
        if !fits {
            return Err(IndexError::malformed(
                id,
                format!("field '{}' cannot be {:?}", field.name, field.kind),
            ));
        }

        match (field.value, entry.field_type()) {
            (FieldValue::Text(text), FieldType::Str(_)) => doc.add_text(handle, text),
            (FieldValue::U64(n), FieldType::U64(_)) => doc.add_u64(handle, n),
            (FieldValue::Date(time), FieldType::Date(_)) => {
                doc.add_date(handle, DateTime::from_timestamp_secs(epoch_secs(time)));
            }
            (value, field_type) => {
                return Err(IndexError::malformed(
                    id,
                    format!(
                        "value {value:?} does not fit field '{}' of type {:?}",
                        field.name,
                        field_type.value_type()
                    ),
                ));
            }
        }
    }

    Ok(doc)
}

/// Seconds since the Unix epoch, negative for earlier times.
pub(crate) fn epoch_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
