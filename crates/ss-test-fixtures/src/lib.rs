use std::path::PathBuf;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn scripts_fixtures_dir() -> PathBuf {
    workspace_root().join("fixtures").join("scripts")
}

pub fn scripts_fixture(name: &str) -> PathBuf {
    scripts_fixtures_dir().join(name)
}
