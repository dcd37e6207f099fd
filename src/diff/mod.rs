pub mod edit;
pub mod operations;

pub use edit::{Replacement, TagEdit, DEFAULT_NEW, DEFAULT_OLD, DEFAULT_TARGET};
pub use operations::{line_changes, unified_preview, LineChanges};
