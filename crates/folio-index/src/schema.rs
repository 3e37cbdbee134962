//! Index schema definition.
//!
//! | Field          | Indexing                   | Stored | Notes                         |
//! |----------------|----------------------------|--------|-------------------------------|
//! | `id`           | raw                        | yes    | replace/delete key            |
//! | `filePath`     | raw                        | yes    |                               |
//! | `fileName`     | analyzed, positions        | yes    | boost 3.0                     |
//! | `content`      | analyzed, positions        | yes    | boost 1.0, full text          |
//! | `metadata`     | analyzed, positions        | no     | boost 1.5, all values joined  |
//! | `meta`         | none                       | yes    | JSON object of metadata pairs |
//! | `contentType`  | raw                        | yes    |                               |
//! | `fileSize`     | none                       | yes    | fast                          |
//! | `lastModified` | date                       | yes    | fast                          |
//! | `indexedAt`    | date                       | yes    | fast                          |
//! | `pages`        | none                       | yes    | `|PAGE:<n>|<text>` blob       |
//! | `pageCount`    | u64                        | yes    | fast, only for paged records  |

use tantivy::schema::{
    DateOptions, FAST, Field, INDEXED, IndexRecordOption, NumericOptions, STORED, STRING,
    Schema, TextFieldIndexing, TextOptions,
};

use crate::{IndexError, analyzer::FOLIO_TOKENIZER};

/// Field names as they appear in the index and in queries.
pub mod names {
    /// Record id.
    pub const ID: &str = "id";
    /// Source path.
    pub const FILE_PATH: &str = "filePath";
    /// Display file name.
    pub const FILE_NAME: &str = "fileName";
    /// Full extracted text.
    pub const CONTENT: &str = "content";
    /// Joined metadata values.
    pub const METADATA: &str = "metadata";
    /// Stored metadata map.
    pub const META: &str = "meta";
    /// MIME-like type.
    pub const CONTENT_TYPE: &str = "contentType";
    /// Size in bytes.
    pub const FILE_SIZE: &str = "fileSize";
    /// Source modification time.
    pub const LAST_MODIFIED: &str = "lastModified";
    /// Ingestion time.
    pub const INDEXED_AT: &str = "indexedAt";
    /// Page blob.
    pub const PAGES: &str = "pages";
    /// Number of pages.
    pub const PAGE_COUNT: &str = "pageCount";
}

/// Field boost weights for search ranking.
pub mod boost {
    /// File name boost (3.0x).
    pub const FILE_NAME: f32 = 3.0;
    /// Content boost (1.0x).
    pub const CONTENT: f32 = 1.0;
    /// Metadata boost (1.5x).
    pub const METADATA: f32 = 1.5;
}

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Record id.
    pub id: Field,
    /// Source path.
    pub file_path: Field,
    /// File name.
    pub file_name: Field,
    /// Full content.
    pub content: Field,
    /// Joined metadata values.
    pub metadata: Field,
    /// Stored metadata map.
    pub meta: Field,
    /// Content type.
    pub content_type: Field,
    /// File size.
    pub file_size: Field,
    /// Last modification time.
    pub last_modified: Field,
    /// Indexing time.
    pub indexed_at: Field,
    /// Page blob.
    pub pages: Field,
    /// Page count.
    pub page_count: Field,
}

impl IndexSchema {
    /// Creates the schema used for new indexes.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let id = builder.add_text_field(names::ID, STRING | STORED);
        let file_path = builder.add_text_field(names::FILE_PATH, STRING | STORED);
        let file_name = builder.add_text_field(names::FILE_NAME, analyzed_text().set_stored());
        let content = builder.add_text_field(names::CONTENT, analyzed_text().set_stored());
        let metadata = builder.add_text_field(names::METADATA, analyzed_text());
        let meta = builder.add_text_field(names::META, STORED);
        let content_type = builder.add_text_field(names::CONTENT_TYPE, STRING | STORED);
        let file_size = builder.add_u64_field(names::FILE_SIZE, NumericOptions::from(STORED | FAST));

        let date_options = DateOptions::default()
            .set_indexed()
            .set_stored()
            .set_fast();
        let last_modified = builder.add_date_field(names::LAST_MODIFIED, date_options.clone());
        let indexed_at = builder.add_date_field(names::INDEXED_AT, date_options);

        let pages = builder.add_text_field(names::PAGES, STORED);
        let page_count = builder.add_u64_field(names::PAGE_COUNT, INDEXED | STORED | FAST);

        Self {
            schema: builder.build(),
            id,
            file_path,
            file_name,
            content,
            metadata,
            meta,
            content_type,
            file_size,
            last_modified,
            indexed_at,
            pages,
            page_count,
        }
    }

    /// Resolves field handles from an existing schema.
    ///
    /// Fails when a field is missing, which happens for indexes written by
    /// something else.
    pub fn from_schema(schema: Schema) -> Result<Self, IndexError> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| IndexError::Settings(format!("index has no '{name}' field")))
        };

        Ok(Self {
            id: field(names::ID)?,
            file_path: field(names::FILE_PATH)?,
            file_name: field(names::FILE_NAME)?,
            content: field(names::CONTENT)?,
            metadata: field(names::METADATA)?,
            meta: field(names::META)?,
            content_type: field(names::CONTENT_TYPE)?,
            file_size: field(names::FILE_SIZE)?,
            last_modified: field(names::LAST_MODIFIED)?,
            indexed_at: field(names::INDEXED_AT)?,
            pages: field(names::PAGES)?,
            page_count: field(names::PAGE_COUNT)?,
            schema,
        })
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Analyzed text fields searched by unscoped terms, with their boosts.
    pub fn text_fields(&self) -> [(Field, f32); 3] {
        [
            (self.file_name, boost::FILE_NAME),
            (self.content, boost::CONTENT),
            (self.metadata, boost::METADATA),
        ]
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for a text field run through the folio analyzer with positions.
fn analyzed_text() -> TextOptions {
    TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(FOLIO_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    )
}
