use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::diff::TagEdit;
use crate::error::RetagError;

/// Directory holding project configuration, relative to the project root
pub const PROJECT_CONFIG_DIR: &str = ".retag";
/// Configuration file name, both per-project and global
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration for retag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetagConfig {
    /// Edit overrides; unset fields keep the built-in edit
    pub edit: EditConfig,
    /// How the file is written
    pub editor: EditorConfig,
}

/// Edit configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    pub target: Option<PathBuf>,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether to keep a `.backup` copy of the original
    pub backup_files: bool,
    /// Whether to write through a temp file and rename
    pub atomic_write: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            backup_files: false,
            atomic_write: true,
        }
    }
}

impl RetagConfig {
    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&config_str)
            .map_err(|e| RetagError::config_error(e.to_string(), path).into())
    }

    /// The edit this configuration describes
    pub fn tag_edit(&self) -> TagEdit {
        let builtin = TagEdit::builtin();
        TagEdit {
            target: self.edit.target.clone().unwrap_or(builtin.target),
            old: self.edit.old.clone().unwrap_or(builtin.old),
            new: self.edit.new.clone().unwrap_or(builtin.new),
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    Global(PathBuf),
    Defaults,
}

/// Resolves configuration: explicit file, then project, then global, then defaults
pub struct ConfigLoader {
    explicit: Option<PathBuf>,
    project_root: PathBuf,
    global_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            explicit: None,
            project_root: project_root.into(),
            global_dir: dirs::config_dir().map(|dir| dir.join("retag")),
        }
    }

    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn with_global_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.global_dir = dir;
        self
    }

    pub fn project_config_path(&self) -> PathBuf {
        self.project_root
            .join(PROJECT_CONFIG_DIR)
            .join(CONFIG_FILE_NAME)
    }

    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_dir.as_ref().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Load the first configuration found. An explicit path must exist.
    pub fn load(&self) -> Result<(RetagConfig, ConfigSource)> {
        if let Some(path) = &self.explicit {
            info!("Loading configuration from {}", path.display());
            let config = RetagConfig::from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        let project_path = self.project_config_path();
        if project_path.is_file() {
            info!("Loading project configuration from {}", project_path.display());
            let config = RetagConfig::from_file(&project_path)?;
            return Ok((config, ConfigSource::Project(project_path)));
        }

        if let Some(global_path) = self.global_config_path() {
            if global_path.is_file() {
                info!("Loading global configuration from {}", global_path.display());
                let config = RetagConfig::from_file(&global_path)?;
                return Ok((config, ConfigSource::Global(global_path)));
            }
        }

        debug!("No configuration file found, using built-in defaults");
        Ok((RetagConfig::default(), ConfigSource::Defaults))
    }
}
