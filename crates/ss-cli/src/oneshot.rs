use std::io::Write;

use ss_api::{classify_source_edit, diff_property_schemas, parse_script_source};
use ss_core::{SceneScriptError, Severity};

use crate::cli_args::{CheckArgs, DiffArgs};
use crate::report_emit::emit_diagnostics;
use crate::source_loader::{load_script_file, scan_scripts_dir, LoadedScript};

/// `check`: parse every script and print its diagnostics. Exit code 1 when
/// any script carries an error-severity diagnostic; warnings alone pass.
pub(crate) fn run_check(args: &CheckArgs) -> Result<i32, SceneScriptError> {
    let scripts = resolve_check_inputs(args)?;

    let mut failed = false;
    let mut out = std::io::stdout().lock();
    for script in &scripts {
        let ast = parse_script_source(&script.text);
        writeln!(out, "FILE:{}", script.relative_path)
            .map_err(|error| SceneScriptError::new("CLI_EMIT", error.to_string()))?;
        emit_diagnostics(&mut out, &ast.diagnostics)
            .map_err(|error| SceneScriptError::new("CLI_EMIT", error.to_string()))?;
        if ast
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
        {
            failed = true;
        }
    }
    drop(out);

    if failed {
        println!("RESULT:CHECK_FAILED");
        Ok(1)
    } else {
        println!("RESULT:OK");
        Ok(0)
    }
}

fn resolve_check_inputs(args: &CheckArgs) -> Result<Vec<LoadedScript>, SceneScriptError> {
    match (&args.scripts_dir, &args.script) {
        (Some(dir), None) => scan_scripts_dir(dir),
        (None, Some(path)) => Ok(vec![load_script_file(path)?]),
        _ => Err(SceneScriptError::new(
            "CLI_SOURCE_PATH",
            "Provide exactly one of --scripts-dir or --script.",
        )),
    }
}

/// `diff`: classify the edit from old to new and print the property-level
/// change set.
pub(crate) fn run_diff(args: &DiffArgs) -> Result<(), SceneScriptError> {
    let old = load_script_file(&args.old_file)?;
    let new = load_script_file(&args.new_file)?;

    let class = classify_source_edit(&old.text, &new.text);
    let old_ast = parse_script_source(&old.text);
    let new_ast = parse_script_source(&new.text);
    let change_set = diff_property_schemas(&old_ast.properties, &new_ast.properties);

    println!("RESULT:OK");
    println!("CLASSIFY:{}", class.as_str());
    println!(
        "CHANGESET_JSON:{}",
        serde_json::to_string(&change_set).expect("change set json")
    );
    Ok(())
}

#[cfg(test)]
mod oneshot_tests {
    use super::*;

    #[test]
    fn check_requires_exactly_one_input() {
        let error = resolve_check_inputs(&CheckArgs {
            scripts_dir: None,
            script: None,
        })
        .expect_err("no input should fail");
        assert_eq!(error.code, "CLI_SOURCE_PATH");

        let error = resolve_check_inputs(&CheckArgs {
            scripts_dir: Some("a".to_string()),
            script: Some("b.scene".to_string()),
        })
        .expect_err("two inputs should fail");
        assert_eq!(error.code, "CLI_SOURCE_PATH");
    }

    #[test]
    fn check_single_script_with_errors_exits_non_zero() {
        let dir = std::env::temp_dir().join(format!("ss-cli-check-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("bad.scene");
        std::fs::write(&path, "props { a: number }").expect("write script");

        let code = run_check(&CheckArgs {
            scripts_dir: None,
            script: Some(path.to_string_lossy().into_owned()),
        })
        .expect("check should run");
        assert_eq!(code, 1);
    }
}
