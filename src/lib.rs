// retag - applies one literal tag edit to one source file

pub mod commands;
pub mod core;
pub mod diff;
pub mod error;
pub mod logging;
pub mod utils;

pub use commands::{apply_tag_edit, EditOptions, EditOutcome};
pub use diff::TagEdit;
pub use error::{RetagError, RetagResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The fixed line printed after a successful edit
pub fn confirmation_line(outcome: &EditOutcome) -> String {
    format!("retag: patched {}", outcome.path.display())
}
