use std::collections::BTreeMap;

use ss_core::{
    ChangeSet, PropertyDeclaration, PropertyField, PropertyModification, PropertyRename,
};

/// Schema equality covers (name, propType, section, defaultValue, min, max,
/// description). `options` is carried in the AST but does not participate.
pub fn diff_properties(old: &[PropertyDeclaration], new: &[PropertyDeclaration]) -> ChangeSet {
    let old_by_name: BTreeMap<&str, &PropertyDeclaration> = old
        .iter()
        .map(|property| (property.name.as_str(), property))
        .collect();
    let new_by_name: BTreeMap<&str, &PropertyDeclaration> = new
        .iter()
        .map(|property| (property.name.as_str(), property))
        .collect();

    let mut added: Vec<PropertyDeclaration> = new
        .iter()
        .filter(|property| !old_by_name.contains_key(property.name.as_str()))
        .cloned()
        .collect();
    let mut removed: Vec<PropertyDeclaration> = old
        .iter()
        .filter(|property| !new_by_name.contains_key(property.name.as_str()))
        .cloned()
        .collect();

    let modified: Vec<PropertyModification> = new
        .iter()
        .filter_map(|new_property| {
            let old_property = old_by_name.get(new_property.name.as_str())?;
            let changed_fields = changed_fields(old_property, new_property);
            if changed_fields.is_empty() {
                return None;
            }
            Some(PropertyModification {
                old: (*old_property).clone(),
                new: new_property.clone(),
                changed_fields,
            })
        })
        .collect();

    // Single removed + single added of the same type reads as a rename. A
    // heuristic pairing, deliberately never generalized to multiple pairs.
    let mut renamed = Vec::new();
    if removed.len() == 1 && added.len() == 1 && removed[0].prop_type == added[0].prop_type {
        renamed.push(PropertyRename {
            from: removed[0].name.clone(),
            to: added[0].name.clone(),
        });
        removed.clear();
        added.clear();
    }

    ChangeSet {
        added,
        removed,
        modified,
        renamed,
    }
}

fn changed_fields(old: &PropertyDeclaration, new: &PropertyDeclaration) -> Vec<PropertyField> {
    let mut fields = Vec::new();
    if old.prop_type != new.prop_type {
        fields.push(PropertyField::PropType);
    }
    if old.section != new.section {
        fields.push(PropertyField::Section);
    }
    if old.default_value != new.default_value {
        fields.push(PropertyField::DefaultValue);
    }
    if old.min != new.min {
        fields.push(PropertyField::Min);
    }
    if old.max != new.max {
        fields.push(PropertyField::Max);
    }
    if old.description != new.description {
        fields.push(PropertyField::Description);
    }
    fields
}
