use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ss_core::{
    ChangeSet, Diagnostic, EditClass, SceneScriptError, ScriptAst, ScriptSnapshotEntry,
    SyncSnapshotV1, SYNC_SNAPSHOT_SCHEMA,
};
use ss_parser::parse_script;
use ss_schema::{classify_edit, diff_properties};

use crate::reporter::DiagnosticsReporter;
use crate::runtime::{SceneRuntime, SourceStore};
use crate::watcher::{EditWatcher, FiredEdit, DEFAULT_DEBOUNCE};

/// Bytes persisted for a removed script; re-parsing them yields an empty AST.
pub const EMPTY_MARKER: &str = "";

#[derive(Clone)]
pub struct LiveSyncEngineOptions {
    pub runtime: Arc<dyn SceneRuntime>,
    pub store: Arc<dyn SourceStore>,
    pub debounce: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PassOutcome {
    Patched { change_set: ChangeSet },
    Reloaded,
    Removed { detached: usize },
    Failed { error: SceneScriptError },
}

impl PassOutcome {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Patched { .. } => "patched",
            Self::Reloaded => "reloaded",
            Self::Removed { .. } => "removed",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub path: String,
    pub generation: u64,
    pub outcome: PassOutcome,
    pub diagnostics: Vec<Diagnostic>,
    pub runtime_errors: Vec<SceneScriptError>,
    pub writes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct ScriptRecord {
    source: String,
    ast: ScriptAst,
}

/// Per-path coordinator: parses debounced edits, classifies them against the
/// preceding snapshot, and drives the host runtime through patch, reload, or
/// removal. Synchronous and single-threaded; one pass runs to completion at a
/// time.
pub struct LiveSyncEngine {
    runtime: Arc<dyn SceneRuntime>,
    store: Arc<dyn SourceStore>,
    watcher: EditWatcher,
    reporter: DiagnosticsReporter,
    scripts: BTreeMap<String, ScriptRecord>,
}

// The runtime and store seams are trait objects, so Debug is written by hand.
impl fmt::Debug for LiveSyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveSyncEngine")
            .field("watcher", &self.watcher)
            .field("scripts", &self.scripts)
            .finish_non_exhaustive()
    }
}

impl LiveSyncEngine {
    pub fn new(options: LiveSyncEngineOptions) -> Self {
        Self {
            runtime: options.runtime,
            store: options.store,
            watcher: EditWatcher::new(options.debounce.unwrap_or(DEFAULT_DEBOUNCE)),
            reporter: DiagnosticsReporter::new(),
            scripts: BTreeMap::new(),
        }
    }

    /// Rebuilds an engine from a snapshot, republishing diagnostics from the
    /// stored ASTs. Pending debounced edits are not part of a snapshot.
    pub fn resume(
        options: LiveSyncEngineOptions,
        snapshot: SyncSnapshotV1,
    ) -> Result<Self, SceneScriptError> {
        if snapshot.schema_version != SYNC_SNAPSHOT_SCHEMA {
            return Err(SceneScriptError::new(
                "SYNC_SNAPSHOT_SCHEMA",
                format!(
                    "Unsupported sync snapshot schema: {}",
                    snapshot.schema_version
                ),
            ));
        }

        let mut engine = Self::new(options);
        for (path, entry) in snapshot.scripts {
            engine
                .reporter
                .publish(&path, entry.ast.diagnostics.clone());
            engine.scripts.insert(
                path,
                ScriptRecord {
                    source: entry.source,
                    ast: entry.ast,
                },
            );
        }
        Ok(engine)
    }

    /// Schedules a pipeline pass for `path`; a newer edit for the same path
    /// cancels the pending one. Never blocks and has no other side effects.
    pub fn on_edit(&mut self, path: &str, text: &str) -> u64 {
        self.watcher.on_edit(path, text)
    }

    /// Advances the debounce clock and runs one pass per fired edit.
    pub fn advance(&mut self, ticks: u64) -> Vec<PassReport> {
        let fired = self.watcher.advance(ticks);
        fired.into_iter().map(|edit| self.run_pass(edit)).collect()
    }

    /// Runs pending passes immediately: one path, or all when `path` is None.
    pub fn flush(&mut self, path: Option<&str>) -> Vec<PassReport> {
        let fired = match path {
            Some(path) => self.watcher.flush(path).into_iter().collect(),
            None => self.watcher.flush_all(),
        };
        fired.into_iter().map(|edit| self.run_pass(edit)).collect()
    }

    pub fn diagnostics(&self, path: &str) -> &[Diagnostic] {
        self.reporter.get(path)
    }

    pub fn schema(&self, path: &str) -> Option<&ScriptAst> {
        self.scripts.get(path).map(|record| &record.ast)
    }

    pub fn has_pending(&self, path: &str) -> bool {
        self.watcher.has_pending(path)
    }

    pub fn snapshot(&self) -> SyncSnapshotV1 {
        SyncSnapshotV1 {
            schema_version: SYNC_SNAPSHOT_SCHEMA.to_string(),
            scripts: self
                .scripts
                .iter()
                .map(|(path, record)| {
                    (
                        path.clone(),
                        ScriptSnapshotEntry {
                            source: record.source.clone(),
                            ast: record.ast.clone(),
                        },
                    )
                })
                .collect(),
        }
    }

    fn run_pass(&mut self, edit: FiredEdit) -> PassReport {
        let ast = parse_script(&edit.text);
        // Published regardless of outcome, replacing the prior list.
        self.reporter.publish(&edit.path, ast.diagnostics.clone());

        let mut runtime_errors = Vec::new();
        let mut writes = Vec::new();

        let outcome = if ast.is_empty {
            self.run_removal(&edit.path, &mut runtime_errors, &mut writes)
        } else {
            let (previous_source, previous_properties) = match self.scripts.get(&edit.path) {
                Some(record) => (record.source.as_str(), record.ast.properties.as_slice()),
                None => ("", &[][..]),
            };
            match classify_edit(previous_source, &edit.text) {
                EditClass::MetadataOnly => {
                    let change_set = diff_properties(previous_properties, &ast.properties);
                    self.runtime
                        .notify_property_schema_changed(&edit.path, &change_set);
                    PassOutcome::Patched { change_set }
                }
                EditClass::Structural => {
                    self.run_reload(&edit.path, &edit.text, &mut runtime_errors, &mut writes)
                }
            }
        };

        // The just-parsed AST and source become the preceding snapshot for the
        // next pass, failed passes included.
        self.scripts.insert(
            edit.path.clone(),
            ScriptRecord {
                source: edit.text,
                ast: ast.clone(),
            },
        );

        PassReport {
            path: edit.path,
            generation: edit.generation,
            outcome,
            diagnostics: ast.diagnostics,
            runtime_errors,
            writes,
        }
    }

    fn run_removal(
        &mut self,
        path: &str,
        runtime_errors: &mut Vec<SceneScriptError>,
        writes: &mut Vec<String>,
    ) -> PassOutcome {
        let mut detached = 0usize;
        for object in self.runtime.bound_objects(path) {
            match self.runtime.detach_script(&object, path) {
                Ok(()) => detached += 1,
                // Per-object failures never abort the remaining objects.
                Err(error) => runtime_errors.push(error),
            }
        }
        match self.store.write_file(path, EMPTY_MARKER) {
            Ok(()) => {
                writes.push(path.to_string());
                PassOutcome::Removed { detached }
            }
            Err(error) => PassOutcome::Failed { error },
        }
    }

    fn run_reload(
        &mut self,
        path: &str,
        text: &str,
        runtime_errors: &mut Vec<SceneScriptError>,
        writes: &mut Vec<String>,
    ) -> PassOutcome {
        match self.store.write_file(path, text) {
            Ok(()) => {
                writes.push(path.to_string());
                if let Err(error) = self.runtime.reload_script(path) {
                    runtime_errors.push(error);
                }
                PassOutcome::Reloaded
            }
            Err(error) => PassOutcome::Failed { error },
        }
    }
}
