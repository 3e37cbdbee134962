//! Implementation of `folio index`.

use std::{path::Path, process::ExitCode};

use folio_index::{
    AnalyzerKind, BatchSummary, DiscoveryOptions, PlainTextExtractor, ProgressReporter,
    discover_files, ingest,
};

use crate::cli::{
    args::IndexCommand,
    context::CommandContext,
    output::{dim, output_batch_summary, warning},
};

/// Prints per-file progress to stderr.
struct StderrReporter {
    /// Whether to print a line per file.
    verbose: bool,
}

impl ProgressReporter for StderrReporter {
    fn on_file_start(&mut self, path: &Path, current: usize, total: usize) {
        if self.verbose {
            eprintln!("{} {}", dim(&format!("[{current}/{total}]")), path.display());
        }
    }

    fn on_file_done(&mut self, _path: &Path) {}

    fn on_file_skipped(&mut self, path: &Path, reason: &str) {
        if self.verbose {
            eprintln!("   {} {}: {reason}", warning("skipped"), path.display());
        }
    }

    fn on_complete(&mut self, _summary: &BatchSummary) {}
}

/// Discovers files under the given path, extracts and indexes them.
pub fn run(ctx: &CommandContext, cmd: &IndexCommand) -> ExitCode {
    let mut options = match ctx.store_options() {
        Ok(options) => options,
        Err(code) => return code,
    };
    if let Some(tokenizer) = &cmd.tokenizer {
        match AnalyzerKind::from_settings(tokenizer, &ctx.config.index.stemmer) {
            Ok(kind) => options.analyzer = kind,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let exclude = match ctx.config.exclude_patterns() {
        Ok(patterns) => patterns,
        Err(e) => {
            eprintln!("error: invalid exclude pattern: {e}");
            return ExitCode::FAILURE;
        }
    };

    let index_dir = ctx.index_dir(&cmd.index);
    let discovery_options = DiscoveryOptions {
        max_file_size: cmd.max_file_size.unwrap_or(ctx.config.index.max_file_size),
        exclude,
        skip_dir: Some(index_dir),
    };
    let discovery = match discover_files(&cmd.path, &discovery_options) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    for skipped in &discovery.skipped {
        eprintln!(
            "{} {}: {}",
            warning("skipped"),
            skipped.path.display(),
            skipped.reason
        );
    }

    let store = match ctx.open_or_create_store(&cmd.index, options) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let mut session = match store.writer() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let extractor = PlainTextExtractor::new(&ctx.config.index.extensions);
    let mut reporter = StderrReporter {
        verbose: ctx.verbose > 0,
    };
    match ingest(&mut session, &extractor, &discovery.files, &mut reporter) {
        Ok(summary) => {
            output_batch_summary(&summary, discovery.skipped.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: indexing failed: {e}");
            ExitCode::FAILURE
        }
    }
}
