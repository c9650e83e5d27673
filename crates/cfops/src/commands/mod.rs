//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod domains;
pub mod routes;
pub mod util;

use cfops_core::CloudFoundryOperations;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ops: &CloudFoundryOperations,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Routes(args) => routes::handle(ops, args, global).await,
        Command::Domains(args) => domains::handle(ops, args, global).await,
        // Config and Completions are handled before a session exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
