use clap::Parser;

mod agent;
mod cli_args;
mod error_map;
mod oneshot;
mod report_emit;
mod session;
mod session_state;
mod source_loader;

use cli_args::{AgentCommand, Cli, Mode};
use error_map::emit_error;

/// Parses argv and runs one command, returning the process exit code.
/// Protocol lines go to stdout; clap usage errors go to stderr.
pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return 2;
        }
    };

    match cli.command {
        Mode::Agent(args) => match args.command {
            AgentCommand::Open(args) => exit_from(agent::run_open(&args)),
            AgentCommand::Bind(args) => exit_from(agent::run_bind(&args)),
            AgentCommand::Edit(args) => exit_from(agent::run_edit(&args)),
            AgentCommand::Diag(args) => exit_from(agent::run_diag(&args)),
        },
        Mode::Check(args) => match oneshot::run_check(&args) {
            Ok(code) => code,
            Err(error) => emit_error(error),
        },
        Mode::Diff(args) => exit_from(oneshot::run_diff(&args)),
        Mode::Session(args) => match session::run_session(&args) {
            Ok(code) => code,
            Err(error) => emit_error(error),
        },
    }
}

fn exit_from(result: Result<(), ss_core::SceneScriptError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => emit_error(error),
    }
}
