use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn synthetic() -> Self {
        Self {
            start: SourceLocation { line: 1, column: 0 },
            end: SourceLocation { line: 1, column: 0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Script,
    Mesh,
    Camera,
    Light,
    Scene,
    Transform,
}

impl ObjectKind {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "script" => Some(Self::Script),
            "mesh" => Some(Self::Mesh),
            "camera" => Some(Self::Camera),
            "light" => Some(Self::Light),
            "scene" => Some(Self::Scene),
            "transform" => Some(Self::Transform),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Mesh => "mesh",
            Self::Camera => "camera",
            Self::Light => "light",
            Self::Scene => "scene",
            Self::Transform => "transform",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PropType {
    Boolean,
    Number,
    Float,
    String,
    Range,
    Select,
    Unknown { raw: String },
}

impl PropType {
    pub fn parse(token: &str) -> Self {
        match token {
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            "float" => Self::Float,
            "string" => Self::String,
            "range" => Self::Range,
            "select" => Self::Select,
            _ => Self::Unknown {
                raw: token.to_string(),
            },
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown { .. })
    }
}

pub const DEFAULT_SECTION: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    pub name: String,
    pub prop_type: PropType,
    pub section: String,
    pub default_value: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            severity: Severity::Error,
            suggestion: None,
        }
    }

    pub fn warning(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            severity: Severity::Warning,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptAst {
    pub name: String,
    pub object_kind: ObjectKind,
    pub properties: Vec<PropertyDeclaration>,
    pub diagnostics: Vec<Diagnostic>,
    pub is_empty: bool,
}

impl ScriptAst {
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            object_kind: ObjectKind::Script,
            properties: Vec::new(),
            diagnostics: Vec::new(),
            is_empty: true,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }
}
