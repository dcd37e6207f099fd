pub mod edit_command;

pub use edit_command::{apply_tag_edit, EditOptions, EditOutcome};
