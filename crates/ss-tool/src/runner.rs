use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use ss_api::{create_live_sync, CreateLiveSyncOptions};
use ss_core::{ChangeSet, SceneScriptError, Severity};
use ss_sync::{PassReport, SceneRuntime, SourceStore};

use crate::source::{read_scene_sources_from_dir, read_test_case};
use crate::{ExpectedEvent, SsToolError, TestAction, TestCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub passes: usize,
}

/// Records runtime calls as observed events, mutating bindings the way the
/// live scene would.
#[derive(Default)]
struct ToolRuntime {
    bindings: Mutex<BTreeMap<String, Vec<String>>>,
    calls: Mutex<Vec<ExpectedEvent>>,
}

impl ToolRuntime {
    fn bind(&self, path: &str, object: &str) {
        let mut bindings = self.bindings.lock().expect("bindings lock");
        let objects = bindings.entry(path.to_string()).or_default();
        if !objects.iter().any(|bound| bound == object) {
            objects.push(object.to_string());
        }
    }

    fn take_calls(&self) -> Vec<ExpectedEvent> {
        std::mem::take(&mut *self.calls.lock().expect("calls lock"))
    }
}

impl SceneRuntime for ToolRuntime {
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
        self.calls.lock().expect("calls lock").push(ExpectedEvent::Detach {
            path: path.to_string(),
            object: object.to_string(),
        });
        Ok(())
    }

    fn reload_script(&self, path: &str) -> Result<(), SceneScriptError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(ExpectedEvent::Reload {
                path: path.to_string(),
            });
        Ok(())
    }

    fn notify_property_schema_changed(&self, path: &str, change_set: &ChangeSet) {
        self.calls
            .lock()
            .expect("calls lock")
            .push(ExpectedEvent::Notify {
                path: path.to_string(),
                added: change_set.added.len(),
                removed: change_set.removed.len(),
                modified: change_set.modified.len(),
                renamed: change_set.renamed.len(),
            });
    }
}

#[derive(Default)]
struct ToolStore;

impl SourceStore for ToolStore {
    fn write_file(&self, _path: &str, _content: &str) -> Result<(), SceneScriptError> {
        Ok(())
    }
}

pub fn run_case(case_dir: &Path, case: &TestCase) -> Result<RunReport, SsToolError> {
    let sources = read_scene_sources_from_dir(case_dir)?;

    let runtime = Arc::new(ToolRuntime::default());
    let mut engine = create_live_sync(CreateLiveSyncOptions {
        runtime: runtime.clone(),
        store: Arc::new(ToolStore),
        debounce: Some(case.debounce),
    });

    let mut observed_events = Vec::new();
    let mut passes = 0usize;

    for action in &case.actions {
        match action {
            TestAction::Bind { path, object } => {
                runtime.bind(path, object);
            }
            TestAction::Edit {
                path,
                source,
                source_file,
            } => {
                let text = resolve_edit_source(path, source, source_file, &sources)?;
                engine.on_edit(path, text);
            }
            TestAction::Tick { ticks } => {
                let reports = engine.advance(*ticks);
                record_reports(&runtime, &reports, &mut observed_events, &mut passes);
            }
            TestAction::Flush { path } => {
                let reports = engine.flush(path.as_deref());
                record_reports(&runtime, &reports, &mut observed_events, &mut passes);
            }
        }
    }

    Ok(RunReport {
        observed_events,
        passes,
    })
}

fn resolve_edit_source<'a>(
    path: &str,
    source: &'a Option<String>,
    source_file: &Option<String>,
    sources: &'a BTreeMap<String, String>,
) -> Result<&'a str, SsToolError> {
    match (source, source_file) {
        (Some(text), None) => Ok(text.as_str()),
        (None, Some(name)) => sources
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SsToolError::UnknownSourceFile { name: name.clone() }),
        _ => Err(SsToolError::EditSource {
            path: path.to_string(),
        }),
    }
}

fn record_reports(
    runtime: &ToolRuntime,
    reports: &[PassReport],
    observed_events: &mut Vec<ExpectedEvent>,
    passes: &mut usize,
) {
    for report in reports {
        *passes += 1;
        observed_events.push(ExpectedEvent::Pass {
            path: report.path.clone(),
            outcome: report.outcome.kind_name().to_string(),
        });
        observed_events.extend(runtime.take_calls());
        for write in &report.writes {
            observed_events.push(ExpectedEvent::Write {
                path: write.clone(),
            });
        }
        if !report.diagnostics.is_empty() {
            let errors = report
                .diagnostics
                .iter()
                .filter(|diagnostic| diagnostic.severity == Severity::Error)
                .count();
            observed_events.push(ExpectedEvent::Diagnostics {
                path: report.path.clone(),
                errors,
                warnings: report.diagnostics.len() - errors,
            });
        }
    }
}

pub fn assert_case(case_dir: &Path, case_path: &Path) -> Result<(), SsToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(case_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(SsToolError::EventSerialize)?;
        return Err(SsToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(SsToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(SsToolError::EventSerialize)?;
            return Err(SsToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(())
}
