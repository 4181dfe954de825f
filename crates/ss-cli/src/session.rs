use std::io::{BufRead, Write};
use std::sync::Arc;

use ss_api::{create_live_sync, resume_live_sync, CreateLiveSyncOptions};
use ss_core::SceneScriptError;
use ss_sync::LiveSyncEngine;

use crate::cli_args::SessionArgs;
use crate::error_map::map_session_io;
use crate::report_emit::{emit_diagnostics, emit_pass_report};
use crate::session_state::{
    load_state, save_state, MemoryStore, SessionHarness, SessionRuntime, SessionStateV1,
};

const HELP_TEXT: &str = "\
COMMANDS:
  :bind <path> <object>   bind an object to a script path
  :edit <path>            read script lines until a lone '.'
  :tick <n>               advance the debounce clock n ticks
  :flush [path]           run pending passes now
  :diag <path>            print current diagnostics for a path
  :schema <path>          print the current schema for a path
  :save [file]            write session state (default --state-file)
  :load [file]            replace session state (default --state-file)
  :help                   print this help
  :quit                   exit";

struct Session {
    runtime: Arc<SessionRuntime>,
    store: Arc<MemoryStore>,
    engine: LiveSyncEngine,
    debounce: Option<u64>,
}

impl Session {
    fn from_state(state: SessionStateV1, debounce: Option<u64>) -> Result<Self, SceneScriptError> {
        let harness = SessionHarness::from_state(&state);
        let engine = resume_live_sync(
            CreateLiveSyncOptions {
                runtime: harness.runtime.clone(),
                store: harness.store.clone(),
                debounce,
            },
            state.snapshot,
        )?;
        Ok(Self {
            runtime: harness.runtime,
            store: harness.store,
            engine,
            debounce,
        })
    }

    fn fresh(debounce: Option<u64>) -> Self {
        let runtime = Arc::new(SessionRuntime::default());
        let store = Arc::new(MemoryStore::default());
        let engine = create_live_sync(CreateLiveSyncOptions {
            runtime: runtime.clone(),
            store: store.clone(),
            debounce,
        });
        Self {
            runtime,
            store,
            engine,
            debounce,
        }
    }

    fn to_state(&self) -> SessionStateV1 {
        let mut state = SessionStateV1::empty();
        state.snapshot = self.engine.snapshot();
        state.bindings = self.runtime.bindings();
        state.files = self.store.files();
        state
    }
}

pub(crate) fn run_session(args: &SessionArgs) -> Result<i32, SceneScriptError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session_loop(stdin.lock(), stdout.lock(), args)
}

/// Line-oriented session loop with injected streams so tests can drive it.
/// Command-level failures print error lines and keep the loop alive; only
/// stream failures abort.
pub(crate) fn run_session_loop<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
    args: &SessionArgs,
) -> Result<i32, SceneScriptError> {
    let mut session = match &args.state_file {
        Some(file) => Session::from_state(load_state(file)?, args.debounce_ms)?,
        None => Session::fresh(args.debounce_ms),
    };

    writeln!(out, "SESSION:READY").map_err(map_session_io)?;

    let mut line = String::new();
    loop {
        line.clear();
        let read = input.read_line(&mut line).map_err(map_session_io)?;
        if read == 0 {
            break;
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let mut parts = trimmed.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let rest: Vec<&str> = parts.collect();

        match command {
            ":quit" => break,
            ":help" => writeln!(out, "{HELP_TEXT}").map_err(map_session_io)?,
            ":bind" => match rest.as_slice() {
                [path, object] => {
                    session.runtime.bind(path, object);
                    writeln!(out, "BOUND:{path}={object}").map_err(map_session_io)?;
                }
                _ => emit_command_error(&mut out, "SESSION_ARGS", ":bind <path> <object>")?,
            },
            ":edit" => match rest.as_slice() {
                [path] => {
                    let text = read_edit_body(&mut input)?;
                    let generation = session.engine.on_edit(path, &text);
                    writeln!(out, "QUEUED:{path}").map_err(map_session_io)?;
                    writeln!(out, "GENERATION:{generation}").map_err(map_session_io)?;
                }
                _ => emit_command_error(&mut out, "SESSION_ARGS", ":edit <path>")?,
            },
            ":tick" => match rest.as_slice() {
                [ticks] => match ticks.parse::<u64>() {
                    Ok(ticks) => {
                        let reports = session.engine.advance(ticks);
                        emit_reports(&mut out, &session, &reports)?;
                    }
                    Err(_) => emit_command_error(&mut out, "SESSION_ARGS", ":tick <n>")?,
                },
                _ => emit_command_error(&mut out, "SESSION_ARGS", ":tick <n>")?,
            },
            ":flush" => {
                let reports = match rest.as_slice() {
                    [] => session.engine.flush(None),
                    [path] => session.engine.flush(Some(*path)),
                    _ => {
                        emit_command_error(&mut out, "SESSION_ARGS", ":flush [path]")?;
                        continue;
                    }
                };
                emit_reports(&mut out, &session, &reports)?;
            }
            ":diag" => match rest.as_slice() {
                [path] => emit_diagnostics(&mut out, session.engine.diagnostics(path))
                    .map_err(map_session_io)?,
                _ => emit_command_error(&mut out, "SESSION_ARGS", ":diag <path>")?,
            },
            ":schema" => match rest.as_slice() {
                [path] => match session.engine.schema(path) {
                    Some(ast) => writeln!(
                        out,
                        "SCHEMA_JSON:{}",
                        serde_json::to_string(ast).expect("ast json")
                    )
                    .map_err(map_session_io)?,
                    None => writeln!(out, "SCHEMA:NONE").map_err(map_session_io)?,
                },
                _ => emit_command_error(&mut out, "SESSION_ARGS", ":schema <path>")?,
            },
            ":save" => match state_target(&rest, args) {
                Some(file) => match save_state(&file, &session.to_state()) {
                    Ok(()) => writeln!(out, "SAVED:{file}").map_err(map_session_io)?,
                    Err(error) => emit_command_error(&mut out, &error.code, &error.message)?,
                },
                None => emit_command_error(&mut out, "SESSION_ARGS", ":save [file]")?,
            },
            ":load" => match state_target(&rest, args) {
                Some(file) => {
                    let loaded = load_state(&file)
                        .and_then(|state| Session::from_state(state, session.debounce));
                    match loaded {
                        Ok(next) => {
                            session = next;
                            writeln!(out, "LOADED:{file}").map_err(map_session_io)?;
                        }
                        Err(error) => {
                            emit_command_error(&mut out, &error.code, &error.message)?
                        }
                    }
                }
                None => emit_command_error(&mut out, "SESSION_ARGS", ":load [file]")?,
            },
            _ => emit_command_error(&mut out, "SESSION_COMMAND", trimmed)?,
        }
    }

    writeln!(out, "SESSION:BYE").map_err(map_session_io)?;
    Ok(0)
}

fn state_target(rest: &[&str], args: &SessionArgs) -> Option<String> {
    match rest {
        [file] => Some((*file).to_string()),
        [] => args.state_file.clone(),
        _ => None,
    }
}

fn read_edit_body<R: BufRead>(input: &mut R) -> Result<String, SceneScriptError> {
    let mut body = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        let read = input.read_line(&mut line).map_err(map_session_io)?;
        if read == 0 {
            break;
        }
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed == "." {
            break;
        }
        body.push_str(trimmed);
        body.push('\n');
    }
    Ok(body)
}

fn emit_reports<W: Write>(
    out: &mut W,
    session: &Session,
    reports: &[ss_sync::PassReport],
) -> Result<(), SceneScriptError> {
    let calls = session.runtime.take_calls();
    let mut calls = Some(calls);
    if reports.is_empty() {
        writeln!(out, "PASSES:0").map_err(map_session_io)?;
        return Ok(());
    }
    for report in reports {
        // Calls are drained once; attribute them to the first report.
        let calls = calls.take().unwrap_or_default();
        emit_pass_report(out, report, &calls).map_err(map_session_io)?;
    }
    Ok(())
}

fn emit_command_error<W: Write>(
    out: &mut W,
    code: &str,
    message: &str,
) -> Result<(), SceneScriptError> {
    writeln!(out, "ERROR_CODE:{code}").map_err(map_session_io)?;
    writeln!(
        out,
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(message).expect("string json")
    )
    .map_err(map_session_io)?;
    Ok(())
}
