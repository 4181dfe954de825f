pub mod change_set;
pub mod error;
pub mod snapshot;
pub mod types;

pub use change_set::{ChangeSet, EditClass, PropertyField, PropertyModification, PropertyRename};
pub use error::SceneScriptError;
pub use snapshot::{ScriptSnapshotEntry, SyncSnapshotV1, SYNC_SNAPSHOT_SCHEMA};
pub use types::{
    Diagnostic, ObjectKind, PropType, PropertyDeclaration, ScriptAst, Severity, SourceLocation,
    SourceSpan, DEFAULT_SECTION,
};
