mod engine;
mod reporter;
mod runtime;
mod watcher;

pub use engine::{
    LiveSyncEngine, LiveSyncEngineOptions, PassOutcome, PassReport, EMPTY_MARKER,
};
pub use reporter::DiagnosticsReporter;
pub use runtime::{ObjectId, SceneRuntime, SourceStore};
pub use watcher::{EditWatcher, FiredEdit, DEFAULT_DEBOUNCE};
