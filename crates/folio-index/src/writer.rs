//! The write session: upserts, deletes and commits.

use tantivy::{IndexWriter, Term};
use tracing::{debug, info, warn};

use crate::{
    IndexError,
    fields::{record_fields, to_document},
    record::DocumentRecord,
    store::IndexStore,
};

/// What happened to one record of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The record was staged for commit.
    Indexed {
        /// Record id.
        id: String,
    },
    /// The record was rejected and nothing was written for it.
    Skipped {
        /// Record id as supplied.
        id: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl RecordOutcome {
    /// Id of the record this outcome is about.
    pub fn id(&self) -> &str {
        match self {
            Self::Indexed { id } | Self::Skipped { id, .. } => id,
        }
    }
}

/// Per-record outcomes of a batch, in input order.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// One outcome per input record.
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchSummary {
    /// Number of records staged and committed.
    pub fn indexed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Indexed { .. }))
            .count()
    }

    /// Number of records skipped.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.indexed_count()
    }

    /// Skipped records with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            RecordOutcome::Skipped { id, reason } => Some((id.as_str(), reason.as_str())),
            RecordOutcome::Indexed { .. } => None,
        })
    }

    /// Appends an outcome.
    pub fn push(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }
}

/// The single writer of an [`IndexStore`].
///
/// Changes stay invisible to snapshots until [`commit`](Self::commit).
/// Dropping a session without committing discards its pending changes.
pub struct WriteSession<'a> {
    /// Store being written.
    store: &'a IndexStore,
    /// Tantivy writer holding the directory lock.
    writer: IndexWriter,
    /// Operations staged since the last commit.
    pending: usize,
}

impl<'a> WriteSession<'a> {
    /// Wraps a writer obtained from `store`.
    pub(crate) fn new(store: &'a IndexStore, writer: IndexWriter) -> Self {
        Self {
            store,
            writer,
            pending: 0,
        }
    }

    /// Validates, converts and stages one record, replacing any document with the same id.
    fn stage(&mut self, record: &DocumentRecord) -> Result<(), IndexError> {
        record.validate()?;
        let schema = self.store.schema();
        let fields = record_fields(record, self.store.options().page_text_cap)?;
        let doc = to_document(schema, &record.id, fields)?;

        self.writer
            .delete_term(Term::from_field_text(schema.id, &record.id));
        self.writer
            .add_document(doc)
            .map_err(|e| IndexError::write(&e))?;
        self.pending += 1;

        debug!(id = %record.id, path = %record.file_path, "staged document");
        Ok(())
    }

    /// Inserts or replaces one record. Visible after the next commit.
    pub fn index_document(&mut self, record: &DocumentRecord) -> Result<(), IndexError> {
        self.stage(record)
    }

    /// Stages every valid record, skips the rest, then commits once.
    ///
    /// Malformed records become [`RecordOutcome::Skipped`] and do not stop
    /// the batch. Any other failure discards everything staged in the session
    /// and is returned, so a later commit cannot publish part of the batch.
    pub fn index_documents(&mut self, records: &[DocumentRecord]) -> Result<BatchSummary, IndexError> {
        let mut summary = BatchSummary::default();

        for record in records {
            match self.stage(record) {
                Ok(()) => summary.push(RecordOutcome::Indexed {
                    id: record.id.clone(),
                }),
                Err(e @ IndexError::MalformedRecord { .. }) => {
                    warn!(id = %record.id, error = %e, "skipping record");
                    summary.push(RecordOutcome::Skipped {
                        id: record.id.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(self.abort_batch(e)),
            }
        }

        if let Err(e) = self.commit() {
            return Err(self.abort_batch(e));
        }
        info!(
            indexed = summary.indexed_count(),
            skipped = summary.failed_count(),
            "indexed batch"
        );
        Ok(summary)
    }

    /// Schedules deletion of the document with `id`. Visible after the next commit.
    pub fn delete_document(&mut self, id: &str) {
        let term = Term::from_field_text(self.store.schema().id, id);
        self.writer.delete_term(term);
        self.pending += 1;
        debug!(id, "staged delete");
    }

    /// Publishes staged changes atomically.
    ///
    /// Returns `false` without touching the index when nothing is staged.
    pub fn commit(&mut self) -> Result<bool, IndexError> {
        if self.pending == 0 {
            return Ok(false);
        }
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        info!(operations = self.pending, "committed index");
        self.pending = 0;
        Ok(true)
    }

    /// Discards staged changes.
    pub fn rollback(&mut self) -> Result<(), IndexError> {
        self.writer.rollback().map_err(|e| IndexError::commit(&e))?;
        self.pending = 0;
        Ok(())
    }

    /// Rolls back everything staged after a batch failed, returning `err`.
    pub(crate) fn abort_batch(&mut self, err: IndexError) -> IndexError {
        warn!(error = %err, pending = self.pending, "batch failed, discarding staged changes");
        if let Err(rollback) = self.rollback() {
            warn!(error = %rollback, "rollback after failed batch also failed");
        }
        self.pending = 0;
        err
    }

    /// Deletes every document and commits.
    pub fn clear_index(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        self.pending = 0;
        info!(path = %self.store.path().display(), "cleared index");
        Ok(())
    }

    /// Number of operations staged since the last commit.
    pub fn pending(&self) -> usize {
        self.pending
    }
}
