//! Command implementations and dispatch.

pub mod clear;
pub mod index;
pub mod list;
pub mod search;
pub mod stats;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Index(cmd) => index::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
        Commands::List(cmd) => list::run(ctx, &cmd),
        Commands::Stats(cmd) => stats::run(ctx, &cmd),
        Commands::Clear(cmd) => clear::run(ctx, &cmd),
    }
}
