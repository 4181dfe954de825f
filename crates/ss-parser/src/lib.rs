mod blocks;
mod script;

pub use blocks::{
    location_at, scan_property_blocks, strip_property_blocks, BlockLabel, PropertyBlock,
    PROPS_KEYWORD,
};
pub use script::parse_script;
