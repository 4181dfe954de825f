use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{SsToolError, TestCase, TESTCASE_SCHEMA_V1};

pub fn read_scene_sources_from_dir(
    case_dir: &Path,
) -> Result<BTreeMap<String, String>, SsToolError> {
    let mut sources = BTreeMap::new();

    for entry in WalkDir::new(case_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("scene") {
            continue;
        }

        let relative = path
            .strip_prefix(case_dir)
            .expect("walkdir path should start with case dir")
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).map_err(|source| SsToolError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        sources.insert(relative, content);
    }

    if sources.is_empty() {
        return Err(SsToolError::SourceEmpty {
            path: case_dir.to_path_buf(),
        });
    }

    Ok(sources)
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, SsToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| SsToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| SsToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(SsToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
