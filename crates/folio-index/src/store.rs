//! The on-disk index store.
//!
//! An [`IndexStore`] owns a Tantivy index directory together with a small
//! `folio-index.json` file recording the analyzer the index was built with.
//! Writes go through a [`WriteSession`]; reads go through a [`Snapshot`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use folio_config::Config;
use serde::{Deserialize, Serialize};
use tantivy::{
    Index, IndexReader, IndexSettings, ReloadPolicy, TantivyError, directory::MmapDirectory,
    tokenizer::TextAnalyzer,
};
use tracing::{debug, info, warn};

use crate::{
    IndexError,
    analyzer::{AnalyzerKind, FOLIO_TOKENIZER},
    schema::IndexSchema,
    search::Snapshot,
    writer::WriteSession,
};

/// File in the index directory holding [`StoreManifest`].
pub const MANIFEST_FILE: &str = "folio-index.json";

/// Version of the on-disk layout written by this crate.
const FORMAT_VERSION: u32 = 1;

/// Tantivy refuses writer budgets below this.
const MIN_WRITER_HEAP: usize = 15_000_000;

/// Settings persisted next to the index at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Layout version.
    pub format_version: u32,
    /// Analyzer used for every tokenized field.
    pub analyzer: AnalyzerKind,
}

impl StoreManifest {
    /// Reads the manifest from an index directory.
    fn load(dir: &Path) -> Result<Self, IndexError> {
        let path = dir.join(MANIFEST_FILE);
        let contents = fs::read_to_string(&path).map_err(|e| IndexError::StoreCorruption {
            path: dir.to_path_buf(),
            message: format!("cannot read {MANIFEST_FILE}: {e}"),
        })?;
        let manifest: Self =
            serde_json::from_str(&contents).map_err(|e| IndexError::StoreCorruption {
                path: dir.to_path_buf(),
                message: format!("cannot parse {MANIFEST_FILE}: {e}"),
            })?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(IndexError::StoreCorruption {
                path: dir.to_path_buf(),
                message: format!(
                    "unsupported format version {} (expected {FORMAT_VERSION})",
                    manifest.format_version
                ),
            });
        }
        Ok(manifest)
    }

    /// Writes the manifest into an index directory.
    fn save(&self, dir: &Path) -> Result<(), IndexError> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            IndexError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize {MANIFEST_FILE}: {e}"),
            ))
        })?;
        fs::write(dir.join(MANIFEST_FILE), contents)?;
        Ok(())
    }
}

/// Tunables for opening a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Analyzer for newly created indexes.
    pub analyzer: AnalyzerKind,
    /// Characters kept per page in the page blob.
    pub page_text_cap: usize,
    /// Writer memory budget in bytes.
    pub writer_heap_bytes: usize,
    /// Snippet window in characters.
    pub snippet_chars: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerKind::default(),
            page_text_cap: 2000,
            writer_heap_bytes: 50_000_000,
            snippet_chars: 300,
        }
    }
}

impl StoreOptions {
    /// Builds and validates options from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, IndexError> {
        let options = Self {
            analyzer: AnalyzerKind::from_settings(&config.index.tokenizer, &config.index.stemmer)?,
            page_text_cap: config.index.page_text_cap,
            writer_heap_bytes: config.index.writer_heap_bytes,
            snippet_chars: config.search.snippet_chars,
        };
        options.validate()?;
        Ok(options)
    }

    /// Rejects values the store cannot work with.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.page_text_cap == 0 {
            return Err(IndexError::Settings("page_text_cap must be positive".into()));
        }
        if self.snippet_chars == 0 {
            return Err(IndexError::Settings("snippet_chars must be positive".into()));
        }
        if self.writer_heap_bytes < MIN_WRITER_HEAP {
            return Err(IndexError::Settings(format!(
                "writer_heap_bytes must be at least {MIN_WRITER_HEAP}"
            )));
        }
        Ok(())
    }
}

/// A durable index directory shared by one writer and any number of readers.
pub struct IndexStore {
    /// Index directory.
    path: PathBuf,
    /// The Tantivy index.
    index: Index,
    /// Reader reloaded whenever a snapshot is taken.
    reader: IndexReader,
    /// Field handles.
    schema: IndexSchema,
    /// Analyzer the index was created with.
    analyzer: AnalyzerKind,
    /// Built form of `analyzer`, cloned into snapshots.
    text_analyzer: TextAnalyzer,
    /// Effective options.
    options: StoreOptions,
}

impl IndexStore {
    /// Creates a new, empty index at `path`.
    pub fn create(path: &Path, options: StoreOptions) -> Result<Self, IndexError> {
        options.validate()?;
        fs::create_dir_all(path)?;

        let schema = IndexSchema::new();
        let index = Index::create(
            open_directory(path)?,
            schema.schema().clone(),
            IndexSettings::default(),
        )
        .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        StoreManifest {
            format_version: FORMAT_VERSION,
            analyzer: options.analyzer.clone(),
        }
        .save(path)?;

        info!(path = %path.display(), analyzer = %options.analyzer.label(), "created index");
        Self::assemble(path, index, schema, options.analyzer.clone(), options)
    }

    /// Opens an existing index, using the analyzer it was created with.
    pub fn open(path: &Path, options: StoreOptions) -> Result<Self, IndexError> {
        options.validate()?;
        if !path.is_dir() {
            return Err(IndexError::OpenIndex {
                path: path.to_path_buf(),
                message: "index directory does not exist".to_string(),
            });
        }

        let manifest = StoreManifest::load(path)?;
        let index = Index::open(open_directory(path)?)
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;
        let schema = IndexSchema::from_schema(index.schema()).map_err(|e| {
            IndexError::StoreCorruption {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        if manifest.analyzer != options.analyzer {
            warn!(
                path = %path.display(),
                configured = %options.analyzer.label(),
                persisted = %manifest.analyzer.label(),
                "configured analyzer differs from the index; using the index's analyzer"
            );
        }

        debug!(path = %path.display(), "opened index");
        Self::assemble(path, index, schema, manifest.analyzer, options)
    }

    /// Opens the index at `path`, creating it when absent.
    pub fn open_or_create(path: &Path, options: StoreOptions) -> Result<Self, IndexError> {
        if index_exists(path)? {
            Self::open(path, options)
        } else {
            Self::create(path, options)
        }
    }

    /// Registers the analyzer and builds the reader.
    fn assemble(
        path: &Path,
        index: Index,
        schema: IndexSchema,
        analyzer: AnalyzerKind,
        options: StoreOptions,
    ) -> Result<Self, IndexError> {
        let text_analyzer = analyzer.build()?;
        index
            .tokenizers()
            .register(FOLIO_TOKENIZER, text_analyzer.clone());

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: TantivyError| IndexError::open_index(path.to_path_buf(), &e))?;

        Ok(Self {
            path: path.to_path_buf(),
            index,
            reader,
            schema,
            analyzer,
            text_analyzer,
            options,
        })
    }

    /// Starts the single write session.
    ///
    /// Fails with [`IndexError::IndexUnavailable`] while another session, in
    /// this process or another, holds the index lock.
    pub fn writer(&self) -> Result<WriteSession<'_>, IndexError> {
        let writer = self
            .index
            .writer(self.options.writer_heap_bytes)
            .map_err(|e| match e {
                TantivyError::LockFailure(..) => IndexError::open_index(self.path.clone(), &e),
                other => IndexError::write(&other),
            })?;
        Ok(WriteSession::new(self, writer))
    }

    /// Returns a point-in-time view of the last commit.
    pub fn snapshot(&self) -> Result<Snapshot, IndexError> {
        self.reader.reload().map_err(|e| IndexError::read(&e))?;
        Ok(Snapshot::new(
            self.reader.searcher(),
            self.schema.clone(),
            self.text_analyzer.clone(),
            self.options.snippet_chars,
        ))
    }

    /// Index directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Analyzer the index uses.
    pub fn analyzer(&self) -> &AnalyzerKind {
        &self.analyzer
    }

    /// Field handles.
    pub fn schema(&self) -> &IndexSchema {
        &self.schema
    }

    /// Effective options.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }
}

/// Opens a memory-mapped directory, classifying failures.
fn open_directory(path: &Path) -> Result<MmapDirectory, IndexError> {
    MmapDirectory::open(path).map_err(|e| {
        let err: TantivyError = e.into();
        IndexError::open_index(path.to_path_buf(), &err)
    })
}

/// Whether `path` holds a Tantivy index.
fn index_exists(path: &Path) -> Result<bool, IndexError> {
    if !path.is_dir() {
        return Ok(false);
    }
    Index::exists(&open_directory(path)?).map_err(|e| {
        let err: TantivyError = e.into();
        IndexError::open_index(path.to_path_buf(), &err)
    })
}
