pub mod config;

pub use config::{ConfigLoader, ConfigSource, EditConfig, EditorConfig, RetagConfig};
