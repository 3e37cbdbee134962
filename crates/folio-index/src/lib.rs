//! Tantivy-based document index and search core for folio.
//!
//! This crate provides:
//! - A durable index store with one write session and many snapshot readers
//! - Upsert-by-id ingestion of [`DocumentRecord`]s with per-record outcomes
//! - Multi-field ranked search (fileName 3.0, content 1.0, metadata 1.5)
//! - Page-match localization and snippets for paginated documents
//! - File discovery and a plain-text extractor
//!
//! # Example
//!
//! ```no_run
//! use folio_index::{DocumentRecord, IndexStore, StoreOptions};
//!
//! let store = IndexStore::open_or_create("./index".as_ref(), StoreOptions::default()).unwrap();
//!
//! let mut session = store.writer().unwrap();
//! let record = DocumentRecord::new("doc1", "/archive/report.pdf", "Annual report discusses revenue growth")
//!     .with_pages(["Intro page", "Revenue grew 20% this year"]);
//! session.index_document(&record).unwrap();
//! session.commit().unwrap();
//!
//! let hits = store.snapshot().unwrap().search("revenue", 10).unwrap();
//! assert_eq!(hits[0].matched_pages, vec![2]);
//! ```

#![warn(missing_docs)]

mod analyzer;
mod discovery;
mod error;
mod extract;
mod fields;
mod indexer;
mod pages;
mod query;
mod record;
mod schema;
mod search;
mod snippet;
mod store;
mod writer;

pub use analyzer::{AnalyzerKind, CjkTokenizer, FOLIO_TOKENIZER, parse_language};
pub use discovery::{DiscoveredFile, Discovery, DiscoveryOptions, SkippedFile, discover_files};
pub use error::IndexError;
pub use extract::{PlainTextExtractor, TextExtractor};
pub use fields::{FieldKind, FieldValue, IndexField, record_fields, to_document};
pub use indexer::{ProgressReporter, SilentReporter, ingest, record_id};
pub use pages::{PAGE_MARKER, clean_terms, encode_pages, matching_pages};
pub use query::{QueryCompiler, QueryError, QueryErrorKind, QueryExpr, match_terms, parse as parse_query};
pub use record::DocumentRecord;
pub use schema::{IndexSchema, boost, names};
pub use search::{DocumentSummary, IndexStats, SearchResult, Snapshot};
pub use snippet::make_snippet;
pub use store::{IndexStore, MANIFEST_FILE, StoreManifest, StoreOptions};
pub use writer::{BatchSummary, RecordOutcome, WriteSession};
