//! Implementation of `folio list`.

use std::process::ExitCode;

use crate::cli::{args::ListCommand, context::CommandContext, output::output_documents};

/// Lists indexed documents in index order.
pub fn run(ctx: &CommandContext, cmd: &ListCommand) -> ExitCode {
    let store = match ctx.open_store(&cmd.index) {
        Ok(store) => store,
        Err(code) => return code,
    };

    let limit = cmd.max_results.unwrap_or(ctx.config.search.max_results);
    match store.snapshot().and_then(|s| s.list_all_documents(limit)) {
        Ok(docs) => output_documents(&docs, cmd.output.json),
        Err(e) => {
            eprintln!("error: failed to list documents: {e}");
            ExitCode::FAILURE
        }
    }
}
