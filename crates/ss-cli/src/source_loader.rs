use std::path::Path;

use ss_core::SceneScriptError;
use walkdir::WalkDir;

use crate::error_map::{map_cli_source_read, map_cli_source_scan};

pub(crate) const SCENE_EXTENSION: &str = "scene";

/// A discovered scene script: its path relative to the scanned root (forward
/// slashes on every platform) and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadedScript {
    pub(crate) relative_path: String,
    pub(crate) text: String,
}

pub(crate) fn load_script_file(path: &str) -> Result<LoadedScript, SceneScriptError> {
    let text = std::fs::read_to_string(path).map_err(map_cli_source_read)?;
    Ok(LoadedScript {
        relative_path: path.replace('\\', "/"),
        text,
    })
}

/// Walks `root` for `.scene` files, sorted by relative path.
pub(crate) fn scan_scripts_dir(root: &str) -> Result<Vec<LoadedScript>, SceneScriptError> {
    let root_path = Path::new(root);
    if !root_path.is_dir() {
        return Err(SceneScriptError::new(
            "CLI_SOURCE_PATH",
            format!("Scripts directory not found: {root}"),
        ));
    }

    let mut scripts = Vec::new();
    for entry in WalkDir::new(root_path).sort_by_file_name() {
        let entry = entry.map_err(|error| {
            SceneScriptError::new("CLI_SOURCE_SCAN", error.to_string())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some(SCENE_EXTENSION) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root_path)
            .map_err(map_cli_source_scan)?;
        let text =
            std::fs::read_to_string(entry.path()).map_err(map_cli_source_read)?;
        scripts.push(LoadedScript {
            relative_path: relative.to_string_lossy().replace('\\', "/"),
            text,
        });
    }
    scripts.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(scripts)
}
