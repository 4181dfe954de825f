use std::io::Write;

use ss_core::Diagnostic;
use ss_sync::{PassOutcome, PassReport};

use crate::session_state::RuntimeCall;

pub(crate) fn emit_diagnostics<W: Write>(
    out: &mut W,
    diagnostics: &[Diagnostic],
) -> std::io::Result<()> {
    for diagnostic in diagnostics {
        writeln!(
            out,
            "DIAGNOSTIC_JSON:{}",
            serde_json::to_string(diagnostic).expect("diagnostic json")
        )?;
    }
    Ok(())
}

/// One pass, one block of protocol lines. Failed passes still print their
/// diagnostics and recorded calls before the error lines.
pub(crate) fn emit_pass_report<W: Write>(
    out: &mut W,
    report: &PassReport,
    calls: &[RuntimeCall],
) -> std::io::Result<()> {
    writeln!(out, "PASS:{}", report.path)?;
    writeln!(out, "GENERATION:{}", report.generation)?;
    writeln!(out, "OUTCOME:{}", report.outcome.kind_name())?;
    emit_diagnostics(out, &report.diagnostics)?;
    if let PassOutcome::Patched { change_set } = &report.outcome {
        writeln!(
            out,
            "CHANGESET_JSON:{}",
            serde_json::to_string(change_set).expect("change set json")
        )?;
    }
    for call in calls {
        writeln!(
            out,
            "CALL_JSON:{}",
            serde_json::to_string(call).expect("call json")
        )?;
    }
    for write in &report.writes {
        writeln!(out, "WRITE:{write}")?;
    }
    for error in &report.runtime_errors {
        writeln!(
            out,
            "RUNTIME_ERROR_JSON:{}",
            serde_json::to_string(&serde_json::json!({
                "code": error.code,
                "message": error.message,
            }))
            .expect("runtime error json")
        )?;
    }
    if let PassOutcome::Failed { error } = &report.outcome {
        writeln!(out, "ERROR_CODE:{}", error.code)?;
        writeln!(
            out,
            "ERROR_MSG_JSON:{}",
            serde_json::to_string(&error.message).expect("string json")
        )?;
    }
    Ok(())
}
