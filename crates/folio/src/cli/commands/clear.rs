//! Implementation of `folio clear`.

use std::process::ExitCode;

use crate::cli::{args::ClearCommand, context::CommandContext};

/// Deletes every document and commits.
pub fn run(ctx: &CommandContext, cmd: &ClearCommand) -> ExitCode {
    let store = match ctx.open_store(&cmd.index) {
        Ok(store) => store,
        Err(code) => return code,
    };

    let before = match store.snapshot() {
        Ok(s) => s.get_stats().total_documents,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cleared = store.writer().and_then(|mut session| session.clear_index());
    if let Err(e) = cleared {
        eprintln!("error: failed to clear index: {e}");
        return ExitCode::FAILURE;
    }

    println!("Cleared {before} document(s) from {}.", store.path().display());
    ExitCode::SUCCESS
}
