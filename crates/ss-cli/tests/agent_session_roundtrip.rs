use std::io::Write;
use std::process::{Command, Stdio};

use ss_test_fixtures::scripts_fixture;

fn run_agent(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_ss-cli");
    Command::new(bin)
        .arg("agent")
        .args(args)
        .output()
        .expect("agent command should run")
}

fn parse_state_out(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("STATE_OUT:").map(|value| value.to_string()))
}

#[test]
fn agent_edit_flow_patches_after_reload() {
    let fixture = scripts_fixture("rotator");
    let state_1 = std::env::temp_dir().join("ss-cli-agent-edit-1.json");
    let state_2 = std::env::temp_dir().join("ss-cli-agent-edit-2.json");
    let state_3 = std::env::temp_dir().join("ss-cli-agent-edit-3.json");
    let state_4 = std::env::temp_dir().join("ss-cli-agent-edit-4.json");

    let open = run_agent(&[
        "open",
        "--state-out",
        state_1.to_str().expect("path should be utf-8"),
    ]);
    assert!(open.status.success(), "open failed");
    let open_stdout = String::from_utf8_lossy(&open.stdout);
    assert!(open_stdout.contains("RESULT:OK"));
    assert!(parse_state_out(&open_stdout).is_some());

    let bind = run_agent(&[
        "bind",
        "--state-in",
        state_1.to_str().expect("path should be utf-8"),
        "--script-path",
        "rotator.scene",
        "--object",
        "cube",
        "--state-out",
        state_2.to_str().expect("path should be utf-8"),
    ]);
    assert!(bind.status.success(), "bind failed");
    assert!(String::from_utf8_lossy(&bind.stdout).contains("BOUND:rotator.scene=cube"));

    let first_edit = run_agent(&[
        "edit",
        "--state-in",
        state_2.to_str().expect("path should be utf-8"),
        "--script-path",
        "rotator.scene",
        "--source-file",
        fixture
            .join("rotator.scene")
            .to_str()
            .expect("path should be utf-8"),
        "--state-out",
        state_3.to_str().expect("path should be utf-8"),
    ]);
    assert!(first_edit.status.success(), "first edit failed");
    let first_stdout = String::from_utf8_lossy(&first_edit.stdout);
    assert!(first_stdout.contains("RESULT:OK"));
    assert!(first_stdout.contains("OUTCOME:reloaded"));
    assert!(first_stdout.contains("CALL_JSON:{\"call\":\"reload\""));
    assert!(first_stdout.contains("WRITE:rotator.scene"));

    let second_edit = run_agent(&[
        "edit",
        "--state-in",
        state_3.to_str().expect("path should be utf-8"),
        "--script-path",
        "rotator.scene",
        "--source-file",
        fixture
            .join("step2.scene")
            .to_str()
            .expect("path should be utf-8"),
        "--state-out",
        state_4.to_str().expect("path should be utf-8"),
    ]);
    assert!(second_edit.status.success(), "second edit failed");
    let second_stdout = String::from_utf8_lossy(&second_edit.stdout);
    assert!(second_stdout.contains("OUTCOME:patched"));
    assert!(second_stdout.contains("CHANGESET_JSON:"));
    assert!(second_stdout.contains("\"changedFields\":[\"defaultValue\"]"));
}

#[test]
fn agent_diag_reports_typo_suggestion() {
    let fixture = scripts_fixture("typo-suggest");
    let state_1 = std::env::temp_dir().join("ss-cli-agent-diag-1.json");
    let state_2 = std::env::temp_dir().join("ss-cli-agent-diag-2.json");

    let open = run_agent(&[
        "open",
        "--state-out",
        state_1.to_str().expect("path should be utf-8"),
    ]);
    assert!(open.status.success(), "open failed");

    let edit = run_agent(&[
        "edit",
        "--state-in",
        state_1.to_str().expect("path should be utf-8"),
        "--script-path",
        "porps.scene",
        "--source-file",
        fixture
            .join("porps.scene")
            .to_str()
            .expect("path should be utf-8"),
        "--state-out",
        state_2.to_str().expect("path should be utf-8"),
    ]);
    assert!(edit.status.success(), "edit failed");
    assert!(String::from_utf8_lossy(&edit.stdout).contains("DIAGNOSTIC_JSON:"));

    let diag = run_agent(&[
        "diag",
        "--state-in",
        state_2.to_str().expect("path should be utf-8"),
        "--script-path",
        "porps.scene",
    ]);
    assert!(diag.status.success(), "diag failed");
    let diag_stdout = String::from_utf8_lossy(&diag.stdout);
    assert!(diag_stdout.contains("RESULT:OK"));
    assert!(diag_stdout.contains("\"suggestion\":\"props\""));
}

#[test]
fn agent_bind_missing_state_returns_error_envelope() {
    let output = run_agent(&[
        "bind",
        "--state-in",
        "/path/does/not/exist.json",
        "--script-path",
        "a.scene",
        "--object",
        "cube",
        "--state-out",
        "/tmp/none.json",
    ]);
    assert!(!output.status.success(), "bind should fail for missing state");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RESULT:ERROR"));
    assert!(stdout.contains("ERROR_CODE:CLI_STATE_NOT_FOUND"));
}

#[test]
fn check_passes_clean_fixtures_and_fails_typo_fixture() {
    let bin = env!("CARGO_BIN_EXE_ss-cli");

    let clean = Command::new(bin)
        .arg("check")
        .arg("--scripts-dir")
        .arg(scripts_fixture("rotator"))
        .output()
        .expect("check should run");
    assert!(clean.status.success(), "clean fixture should pass check");
    assert!(String::from_utf8_lossy(&clean.stdout).contains("RESULT:OK"));

    let typo = Command::new(bin)
        .arg("check")
        .arg("--scripts-dir")
        .arg(scripts_fixture("typo-suggest"))
        .output()
        .expect("check should run");
    assert!(!typo.status.success(), "typo fixture should fail check");
    let typo_stdout = String::from_utf8_lossy(&typo.stdout);
    assert!(typo_stdout.contains("FILE:porps.scene"));
    assert!(typo_stdout.contains("DIAGNOSTIC_JSON:"));
    assert!(typo_stdout.contains("RESULT:CHECK_FAILED"));
}

#[test]
fn diff_classifies_metadata_and_structural_edits() {
    let bin = env!("CARGO_BIN_EXE_ss-cli");
    let fixture = scripts_fixture("rotator");

    let metadata = Command::new(bin)
        .arg("diff")
        .arg("--old-file")
        .arg(fixture.join("rotator.scene"))
        .arg("--new-file")
        .arg(fixture.join("step2.scene"))
        .output()
        .expect("diff should run");
    assert!(metadata.status.success(), "metadata diff failed");
    let metadata_stdout = String::from_utf8_lossy(&metadata.stdout);
    assert!(metadata_stdout.contains("CLASSIFY:metadataOnly"));
    assert!(metadata_stdout.contains("CHANGESET_JSON:"));

    let structural = Command::new(bin)
        .arg("diff")
        .arg("--old-file")
        .arg(fixture.join("step2.scene"))
        .arg("--new-file")
        .arg(fixture.join("step3.scene"))
        .output()
        .expect("diff should run");
    assert!(structural.status.success(), "structural diff failed");
    assert!(String::from_utf8_lossy(&structural.stdout).contains("CLASSIFY:structural"));
}

#[test]
fn session_supports_commands_and_quit() {
    let bin = env!("CARGO_BIN_EXE_ss-cli");

    let mut child = Command::new(bin)
        .arg("session")
        .arg("--debounce-ms")
        .arg("10")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("session should spawn");

    {
        let stdin = child.stdin.as_mut().expect("stdin should be piped");
        stdin
            .write_all(
                b":bind rotator.scene cube\n\
:edit rotator.scene\n\
script Rotator {\n\
  props { speed: number }\n\
}\n\
.\n\
:tick 10\n\
:diag rotator.scene\n\
:schema rotator.scene\n\
:quit\n",
            )
            .expect("should write commands");
    }

    let output = child.wait_with_output().expect("session should complete");
    assert!(output.status.success(), "session should exit with success");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SESSION:READY"));
    assert!(stdout.contains("BOUND:rotator.scene=cube"));
    assert!(stdout.contains("OUTCOME:reloaded"));
    assert!(stdout.contains("SCHEMA_JSON:"));
    assert!(stdout.contains("SESSION:BYE"));
}
