use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ScriptAst;

pub const SYNC_SNAPSHOT_SCHEMA: &str = "sync-snapshot.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSnapshotEntry {
    pub source: String,
    pub ast: ScriptAst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshotV1 {
    pub schema_version: String,
    pub scripts: BTreeMap<String, ScriptSnapshotEntry>,
}

impl SyncSnapshotV1 {
    pub fn empty() -> Self {
        Self {
            schema_version: SYNC_SNAPSHOT_SCHEMA.to_string(),
            scripts: BTreeMap::new(),
        }
    }
}
