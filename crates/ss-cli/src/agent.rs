use ss_api::{resume_live_sync, CreateLiveSyncOptions};
use ss_core::SceneScriptError;
use ss_sync::LiveSyncEngine;

use crate::cli_args::{BindArgs, DiagArgs, EditArgs, OpenArgs};
use crate::error_map::map_cli_source_read;
use crate::report_emit::{emit_diagnostics, emit_pass_report};
use crate::session_state::{load_state, save_state, SessionHarness, SessionStateV1};

pub(crate) fn run_open(args: &OpenArgs) -> Result<(), SceneScriptError> {
    let state = SessionStateV1::empty();
    save_state(&args.state_out, &state)?;
    println!("RESULT:OK");
    println!("STATE_OUT:{}", args.state_out);
    Ok(())
}

pub(crate) fn run_bind(args: &BindArgs) -> Result<(), SceneScriptError> {
    let state = load_state(&args.state_in)?;
    let snapshot = state.snapshot.clone();
    let harness = SessionHarness::from_state(&state);
    harness.runtime.bind(&args.script_path, &args.object);

    save_state(&args.state_out, &harness.into_state(snapshot))?;
    println!("RESULT:OK");
    println!("BOUND:{}={}", args.script_path, args.object);
    println!("STATE_OUT:{}", args.state_out);
    Ok(())
}

pub(crate) fn run_edit(args: &EditArgs) -> Result<(), SceneScriptError> {
    let text = resolve_edit_source(args)?;
    let state = load_state(&args.state_in)?;
    let harness = SessionHarness::from_state(&state);
    let mut engine = resume_engine(&harness, state)?;

    engine.on_edit(&args.script_path, &text);
    let reports = engine.flush(Some(&args.script_path));

    println!("RESULT:OK");
    let mut out = std::io::stdout().lock();
    for report in &reports {
        let calls = harness.runtime.take_calls();
        emit_pass_report(&mut out, report, &calls).map_err(|error| {
            SceneScriptError::new("CLI_EMIT", error.to_string())
        })?;
    }
    drop(out);

    save_state(&args.state_out, &harness.into_state(engine.snapshot()))?;
    println!("STATE_OUT:{}", args.state_out);
    Ok(())
}

pub(crate) fn run_diag(args: &DiagArgs) -> Result<(), SceneScriptError> {
    let state = load_state(&args.state_in)?;
    let harness = SessionHarness::from_state(&state);
    let engine = resume_engine(&harness, state)?;

    println!("RESULT:OK");
    let mut out = std::io::stdout().lock();
    emit_diagnostics(&mut out, engine.diagnostics(&args.script_path)).map_err(|error| {
        SceneScriptError::new("CLI_EMIT", error.to_string())
    })?;
    Ok(())
}

fn resolve_edit_source(args: &EditArgs) -> Result<String, SceneScriptError> {
    match (&args.source_file, &args.source_text) {
        (Some(file), None) => std::fs::read_to_string(file).map_err(map_cli_source_read),
        (None, Some(text)) => Ok(text.clone()),
        _ => Err(SceneScriptError::new(
            "CLI_EDIT_SOURCE",
            "Provide exactly one of --source-file or --source-text.",
        )),
    }
}

fn resume_engine(
    harness: &SessionHarness,
    state: SessionStateV1,
) -> Result<LiveSyncEngine, SceneScriptError> {
    resume_live_sync(
        CreateLiveSyncOptions {
            runtime: harness.runtime.clone(),
            store: harness.store.clone(),
            debounce: None,
        },
        state.snapshot,
    )
}
