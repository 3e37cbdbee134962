//! File ingestion pipeline.
//!
//! [`ingest`] drives the path from discovered files to a committed index:
//! each supported file is extracted, staged through the write session, and
//! the whole run is published with a single commit.

use std::{fs, path::Path};

use tracing::{debug, info, warn};

use crate::{
    IndexError,
    discovery::DiscoveredFile,
    extract::TextExtractor,
    writer::{BatchSummary, RecordOutcome, WriteSession},
};

/// Callback for reporting ingestion progress.
pub trait ProgressReporter {
    /// Called before a file is extracted.
    fn on_file_start(&mut self, path: &Path, current: usize, total: usize);

    /// Called when a file was staged.
    fn on_file_done(&mut self, path: &Path);

    /// Called when a file could not be extracted or indexed.
    fn on_file_skipped(&mut self, path: &Path, reason: &str);

    /// Called after the commit.
    fn on_complete(&mut self, summary: &BatchSummary);
}

/// A no-op progress reporter for silent indexing.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_file_start(&mut self, _path: &Path, _current: usize, _total: usize) {}
    fn on_file_done(&mut self, _path: &Path) {}
    fn on_file_skipped(&mut self, _path: &Path, _reason: &str) {}
    fn on_complete(&mut self, _summary: &BatchSummary) {}
}

/// Record id for a file: its canonical absolute path.
pub fn record_id(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

/// Extracts and indexes `files`, then commits once.
///
/// Files the extractor does not support are ignored. Files that fail to
/// read or convert are recorded as skipped and do not stop the run. Any
/// other error discards the files staged so far and ends the run.
pub fn ingest<E, R>(
    session: &mut WriteSession<'_>,
    extractor: &E,
    files: &[DiscoveredFile],
    reporter: &mut R,
) -> Result<BatchSummary, IndexError>
where
    E: TextExtractor + ?Sized,
    R: ProgressReporter,
{
    let supported: Vec<&DiscoveredFile> = files
        .iter()
        .filter(|f| {
            let ok = extractor.supports(&f.path);
            if !ok {
                debug!(path = %f.path.display(), "no extractor for file");
            }
            ok
        })
        .collect();

    let total = supported.len();
    let mut summary = BatchSummary::default();

    for (idx, file) in supported.into_iter().enumerate() {
        reporter.on_file_start(&file.path, idx + 1, total);
        let id = record_id(&file.path);

        let staged = extractor
            .extract(&file.path, &id)
            .and_then(|record| session.index_document(&record));

        match staged {
            Ok(()) => {
                reporter.on_file_done(&file.path);
                summary.push(RecordOutcome::Indexed { id });
            }
            Err(e @ (IndexError::MalformedRecord { .. } | IndexError::Io(_))) => {
                let reason = e.to_string();
                warn!(path = %file.path.display(), error = %reason, "skipping file");
                reporter.on_file_skipped(&file.path, &reason);
                summary.push(RecordOutcome::Skipped { id, reason });
            }
            Err(e) => return Err(session.abort_batch(e)),
        }
    }

    if let Err(e) = session.commit() {
        return Err(session.abort_batch(e));
    }
    info!(
        indexed = summary.indexed_count(),
        skipped = summary.failed_count(),
        "ingested files"
    );
    reporter.on_complete(&summary);
    Ok(summary)
}
