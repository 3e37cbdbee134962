//! Command-line interface for the `folio` document index.

use std::process::ExitCode;

use clap::Parser;
use folio::cli::{CommandContext, args::Cli, commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut ctx = match CommandContext::load() {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    ctx.verbose = cli.verbose;

    commands::run(cli.command, &ctx)
}
