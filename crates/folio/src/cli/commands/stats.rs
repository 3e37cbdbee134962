//! Implementation of `folio stats`.

use std::process::ExitCode;

use crate::cli::{args::StatsCommand, context::CommandContext, output::output_stats};

/// Prints document and segment counts.
pub fn run(ctx: &CommandContext, cmd: &StatsCommand) -> ExitCode {
    let store = match ctx.open_store(&cmd.index) {
        Ok(store) => store,
        Err(code) => return code,
    };

    match store.snapshot() {
        Ok(snapshot) => output_stats(&snapshot.get_stats(), cmd.output.json),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
