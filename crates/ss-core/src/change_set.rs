use serde::{Deserialize, Serialize};

use crate::types::PropertyDeclaration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyField {
    PropType,
    Section,
    DefaultValue,
    Min,
    Max,
    Description,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyModification {
    pub old: PropertyDeclaration,
    pub new: PropertyDeclaration,
    pub changed_fields: Vec<PropertyField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRename {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub added: Vec<PropertyDeclaration>,
    pub removed: Vec<PropertyDeclaration>,
    pub modified: Vec<PropertyModification>,
    pub renamed: Vec<PropertyRename>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.modified.is_empty()
            && self.renamed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditClass {
    MetadataOnly,
    Structural,
}

impl EditClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetadataOnly => "metadataOnly",
            Self::Structural => "structural",
        }
    }
}
