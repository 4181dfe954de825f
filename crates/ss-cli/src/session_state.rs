use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use ss_core::{ChangeSet, SceneScriptError, SyncSnapshotV1};
use ss_sync::{SceneRuntime, SourceStore};

use crate::error_map::{map_cli_state_invalid, map_cli_state_read, map_cli_state_write};

pub(crate) const SESSION_STATE_SCHEMA: &str = "sync-session.v1";

/// One CLI invocation worth of state: the engine snapshot plus the fake
/// scene held between invocations (bindings and the persisted files).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionStateV1 {
    pub(crate) schema_version: String,
    pub(crate) snapshot: SyncSnapshotV1,
    pub(crate) bindings: BTreeMap<String, Vec<String>>,
    pub(crate) files: BTreeMap<String, String>,
}

impl SessionStateV1 {
    pub(crate) fn empty() -> Self {
        Self {
            schema_version: SESSION_STATE_SCHEMA.to_string(),
            snapshot: SyncSnapshotV1::empty(),
            bindings: BTreeMap::new(),
            files: BTreeMap::new(),
        }
    }
}

pub(crate) fn load_state(path: &str) -> Result<SessionStateV1, SceneScriptError> {
    if !Path::new(path).exists() {
        return Err(SceneScriptError::new(
            "CLI_STATE_NOT_FOUND",
            format!("State file not found: {path}"),
        ));
    }
    let raw = std::fs::read_to_string(path).map_err(map_cli_state_read)?;
    let state: SessionStateV1 = serde_json::from_str(&raw).map_err(map_cli_state_invalid)?;
    if state.schema_version != SESSION_STATE_SCHEMA {
        return Err(SceneScriptError::new(
            "CLI_STATE_SCHEMA",
            format!("Unsupported session state schema: {}", state.schema_version),
        ));
    }
    Ok(state)
}

pub(crate) fn save_state(path: &str, state: &SessionStateV1) -> Result<(), SceneScriptError> {
    let raw = serde_json::to_string_pretty(state).map_err(|error| {
        SceneScriptError::new("CLI_STATE_WRITE", error.to_string())
    })?;
    std::fs::write(path, raw).map_err(map_cli_state_write)
}

/// Runtime calls the engine made during a pass, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "call", rename_all = "camelCase")]
pub(crate) enum RuntimeCall {
    Detach { path: String, object: String },
    Reload { path: String },
    NotifySchema { path: String, change_set: ChangeSet },
}

/// In-process stand-in for a live scene. Bindings are mutated the way a real
/// runtime would mutate them, and every call is recorded for the report.
#[derive(Default)]
pub(crate) struct SessionRuntime {
    bindings: Mutex<BTreeMap<String, Vec<String>>>,
    calls: Mutex<Vec<RuntimeCall>>,
}

impl SessionRuntime {
    pub(crate) fn with_bindings(bindings: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            bindings: Mutex::new(bindings),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn bind(&self, path: &str, object: &str) {
        let mut bindings = self.bindings.lock().expect("bindings lock");
        let objects = bindings.entry(path.to_string()).or_default();
        if !objects.iter().any(|bound| bound == object) {
            objects.push(object.to_string());
        }
    }

    pub(crate) fn bindings(&self) -> BTreeMap<String, Vec<String>> {
        self.bindings.lock().expect("bindings lock").clone()
    }

    pub(crate) fn take_calls(&self) -> Vec<RuntimeCall> {
        std::mem::take(&mut *self.calls.lock().expect("calls lock"))
    }
}

impl SceneRuntime for SessionRuntime {
    fn bound_objects(&self, path: &str) -> Vec<String> {
        self.bindings
            .lock()
            .expect("bindings lock")
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    fn detach_script(&self, object: &str, path: &str) -> Result<(), SceneScriptError> {
        let mut bindings = self.bindings.lock().expect("bindings lock");
        if let Some(objects) = bindings.get_mut(path) {
            objects.retain(|bound| bound != object);
        }
        self.calls.lock().expect("calls lock").push(RuntimeCall::Detach {
            path: path.to_string(),
            object: object.to_string(),
        });
        Ok(())
    }

    fn reload_script(&self, path: &str) -> Result<(), SceneScriptError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(RuntimeCall::Reload { path: path.to_string() });
        Ok(())
    }

    fn notify_property_schema_changed(&self, path: &str, change_set: &ChangeSet) {
        self.calls
            .lock()
            .expect("calls lock")
            .push(RuntimeCall::NotifySchema {
                path: path.to_string(),
                change_set: change_set.clone(),
            });
    }
}

/// Source store backed by the session state's file map.
#[derive(Default)]
pub(crate) struct MemoryStore {
    files: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub(crate) fn with_files(files: BTreeMap<String, String>) -> Self {
        Self {
            files: Mutex::new(files),
        }
    }

    pub(crate) fn files(&self) -> BTreeMap<String, String> {
        self.files.lock().expect("files lock").clone()
    }
}

impl SourceStore for MemoryStore {
    fn write_file(&self, path: &str, content: &str) -> Result<(), SceneScriptError> {
        self.files
            .lock()
            .expect("files lock")
            .insert(path.to_string(), content.to_string());
        Ok(())
    }
}

/// Builds the engine wiring for one invocation from loaded state.
pub(crate) struct SessionHarness {
    pub(crate) runtime: Arc<SessionRuntime>,
    pub(crate) store: Arc<MemoryStore>,
}

impl SessionHarness {
    pub(crate) fn from_state(state: &SessionStateV1) -> Self {
        Self {
            runtime: Arc::new(SessionRuntime::with_bindings(state.bindings.clone())),
            store: Arc::new(MemoryStore::with_files(state.files.clone())),
        }
    }

    pub(crate) fn into_state(self, snapshot: SyncSnapshotV1) -> SessionStateV1 {
        SessionStateV1 {
            schema_version: SESSION_STATE_SCHEMA.to_string(),
            snapshot,
            bindings: self.runtime.bindings(),
            files: self.store.files(),
        }
    }
}

#[cfg(test)]
mod session_state_tests {
    use super::*;

    fn temp_state_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!(
            "ss-cli-state-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir.join("state.json").to_string_lossy().into_owned()
    }

    #[test]
    fn state_round_trips_through_disk() {
        let path = temp_state_path("roundtrip");
        let mut state = SessionStateV1::empty();
        state
            .bindings
            .insert("rotator.scene".to_string(), vec!["cube".to_string()]);

        save_state(&path, &state).expect("save should succeed");
        let loaded = load_state(&path).expect("load should succeed");
        assert_eq!(loaded, state);
    }

    #[test]
    fn load_reports_missing_state_file() {
        let error = load_state("/nonexistent/state.json").expect_err("missing file should fail");
        assert_eq!(error.code, "CLI_STATE_NOT_FOUND");
    }

    #[test]
    fn load_rejects_unknown_schema() {
        let path = temp_state_path("schema");
        let mut state = SessionStateV1::empty();
        state.schema_version = "other.v1".to_string();
        let raw = serde_json::to_string(&state).expect("serialize state");
        std::fs::write(&path, raw).expect("write state");

        let error = load_state(&path).expect_err("unknown schema should fail");
        assert_eq!(error.code, "CLI_STATE_SCHEMA");
    }

    #[test]
    fn load_rejects_malformed_json() {
        let path = temp_state_path("malformed");
        std::fs::write(&path, "{not json").expect("write state");
        let error = load_state(&path).expect_err("malformed state should fail");
        assert_eq!(error.code, "CLI_STATE_INVALID");
    }

    #[test]
    fn session_runtime_records_calls_and_mutates_bindings() {
        let runtime = SessionRuntime::default();
        runtime.bind("a.scene", "cube");
        runtime.bind("a.scene", "cube");
        assert_eq!(runtime.bound_objects("a.scene"), vec!["cube".to_string()]);

        runtime
            .detach_script("cube", "a.scene")
            .expect("detach should succeed");
        assert!(runtime.bound_objects("a.scene").is_empty());

        let calls = runtime.take_calls();
        assert_eq!(
            calls,
            vec![RuntimeCall::Detach {
                path: "a.scene".to_string(),
                object: "cube".to_string(),
            }]
        );
        assert!(runtime.take_calls().is_empty());
    }

    #[test]
    fn runtime_call_serializes_with_call_tag() {
        let call = RuntimeCall::Reload {
            path: "a.scene".to_string(),
        };
        let json = serde_json::to_string(&call).expect("serialize call");
        assert_eq!(json, r#"{"call":"reload","path":"a.scene"}"#);
    }
}
