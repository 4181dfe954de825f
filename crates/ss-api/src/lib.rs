use std::sync::Arc;

use ss_core::{ChangeSet, EditClass, PropertyDeclaration, SceneScriptError, ScriptAst, SyncSnapshotV1};
use ss_sync::{LiveSyncEngine, LiveSyncEngineOptions, SceneRuntime, SourceStore};

#[derive(Clone)]
pub struct CreateLiveSyncOptions {
    pub runtime: Arc<dyn SceneRuntime>,
    pub store: Arc<dyn SourceStore>,
    pub debounce: Option<u64>,
}

pub fn create_live_sync(options: CreateLiveSyncOptions) -> LiveSyncEngine {
    LiveSyncEngine::new(LiveSyncEngineOptions {
        runtime: options.runtime,
        store: options.store,
        debounce: options.debounce,
    })
}

pub fn resume_live_sync(
    options: CreateLiveSyncOptions,
    snapshot: SyncSnapshotV1,
) -> Result<LiveSyncEngine, SceneScriptError> {
    LiveSyncEngine::resume(
        LiveSyncEngineOptions {
            runtime: options.runtime,
            store: options.store,
            debounce: options.debounce,
        },
        snapshot,
    )
}

pub fn parse_script_source(text: &str) -> ScriptAst {
    ss_parser::parse_script(text)
}

pub fn diff_property_schemas(
    old: &[PropertyDeclaration],
    new: &[PropertyDeclaration],
) -> ChangeSet {
    ss_schema::diff_properties(old, new)
}

pub fn classify_source_edit(old_source: &str, new_source: &str) -> EditClass {
    ss_schema::classify_edit(old_source, new_source)
}
