use ss_core::{ChangeSet, SceneScriptError};

pub type ObjectId = String;

/// The live scene runtime, owned by the host. The engine queries the current
/// binding set immediately before acting and never caches it across passes.
pub trait SceneRuntime: Send + Sync {
    fn bound_objects(&self, path: &str) -> Vec<ObjectId>;

    fn detach_script(&self, object: &str, path: &str) -> Result<(), SceneScriptError>;

    /// Re-executes the module and reattaches it to every previously bound
    /// object, resetting script-local state but preserving object identity.
    fn reload_script(&self, path: &str) -> Result<(), SceneScriptError>;

    /// Fire-and-forget: live property UIs update bindings without
    /// reinitializing script state.
    fn notify_property_schema_changed(&self, path: &str, change_set: &ChangeSet);
}

/// Write capability used to persist sources and the empty-marker. Regular
/// user-initiated saves stay with the editor, outside this crate.
pub trait SourceStore: Send + Sync {
    fn write_file(&self, path: &str, content: &str) -> Result<(), SceneScriptError>;
}
