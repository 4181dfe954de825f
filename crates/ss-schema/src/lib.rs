mod classifier;
mod differ;

pub use classifier::classify_edit;
pub use differ::diff_properties;
