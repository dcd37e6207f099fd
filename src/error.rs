use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for retag
#[derive(Error, Debug)]
pub enum RetagError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {} is not writable", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("File is not valid UTF-8 text: {}", path.display())]
    Encoding { path: PathBuf },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error in {}: {message}", path.display())]
    Config { message: String, path: PathBuf },
}

impl RetagError {
    /// Map an IO error to the most specific variant for `path`
    pub fn io_error(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::InvalidData => Self::Encoding { path },
            _ => Self::Io { source: err, path },
        }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::Io { path, .. }
            | Self::Encoding { path }
            | Self::Config { path, .. } => Some(path),
            Self::InvalidArgument { .. } => None,
        }
    }
}

/// Result alias for retag operations
pub type RetagResult<T> = std::result::Result<T, RetagError>;
