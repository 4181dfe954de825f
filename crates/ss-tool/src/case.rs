use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "ss-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default = "default_debounce")]
    pub debounce: u64,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
}

fn default_debounce() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Bind {
        path: String,
        object: String,
    },
    /// Schedules an edit; a later `tick` or `flush` runs the pass. The source
    /// is given inline or as a file name from the case directory.
    Edit {
        path: String,
        #[serde(default)]
        source: Option<String>,
        #[serde(default, rename = "sourceFile")]
        source_file: Option<String>,
    },
    Tick {
        ticks: u64,
    },
    Flush {
        #[serde(default)]
        path: Option<String>,
    },
}

impl TestAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bind { .. } => "bind",
            Self::Edit { .. } => "edit",
            Self::Tick { .. } => "tick",
            Self::Flush { .. } => "flush",
        }
    }
}

/// Pipeline events in the order they were observed. `Pass` opens the block
/// for one pass; the runtime calls, writes, and diagnostics follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Pass {
        path: String,
        outcome: String,
    },
    Detach {
        path: String,
        object: String,
    },
    Reload {
        path: String,
    },
    Notify {
        path: String,
        added: usize,
        removed: usize,
        modified: usize,
        renamed: usize,
    },
    Write {
        path: String,
    },
    Diagnostics {
        path: String,
        errors: usize,
        warnings: usize,
    },
}
