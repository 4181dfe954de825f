use ss_core::EditClass;
use ss_parser::strip_property_blocks;

/// Compares the two sources with every property-block body blanked out. Any
/// difference that survives the stripping touches executable logic and is
/// conservatively treated as structural.
pub fn classify_edit(old_source: &str, new_source: &str) -> EditClass {
    if strip_property_blocks(old_source) == strip_property_blocks(new_source) {
        EditClass::MetadataOnly
    } else {
        EditClass::Structural
    }
}
