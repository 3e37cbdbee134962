//! Implementation of `folio search`.

use std::process::ExitCode;

use folio_index::IndexError;

use crate::cli::{args::SearchCommand, context::CommandContext, output::output_search_results};

/// Searches the index and prints ranked hits.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let store = match ctx.open_store(&cmd.index) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let snapshot = match store.snapshot() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let limit = cmd.max_results.unwrap_or(ctx.config.search.max_results);
    match snapshot.search(&cmd.query, limit) {
        Ok(results) => output_search_results(&results, &cmd.query, cmd.output.json),
        Err(IndexError::Query(e)) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: search failed: {e}");
            ExitCode::FAILURE
        }
    }
}
