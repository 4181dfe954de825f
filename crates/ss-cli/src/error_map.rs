use ss_core::SceneScriptError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> SceneScriptError {
    SceneScriptError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: SceneScriptError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    1
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> SceneScriptError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_source_scan(error: std::path::StripPrefixError) -> SceneScriptError {
    map_error("CLI_SOURCE_SCAN", error)
}

pub(crate) fn map_cli_state_write(error: std::io::Error) -> SceneScriptError {
    map_error("CLI_STATE_WRITE", error)
}

pub(crate) fn map_cli_state_read(error: std::io::Error) -> SceneScriptError {
    map_error("CLI_STATE_READ", error)
}

pub(crate) fn map_cli_state_invalid(error: serde_json::Error) -> SceneScriptError {
    map_error("CLI_STATE_INVALID", error)
}

pub(crate) fn map_session_io(error: std::io::Error) -> SceneScriptError {
    map_error("SESSION_IO", error)
}
