//! Error types for config loading, validation and resolution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// A file referenced from the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencedFile {
    Entry,
    External,
    Over,
}

impl fmt::Display for ReferencedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entry => "Entry",
            Self::External => "External",
            Self::Over => "Over",
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SAMMI Next extension config file not found in the root dir ({})", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid config from {}:\n{errors}", path.display())]
    Invalid {
        path: PathBuf,
        errors: ValidationError,
    },

    #[error("{kind} file not found: {}", path.display())]
    FileMissing { kind: ReferencedFile, path: PathBuf },

    #[error("Failed to load config from {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("Invalid output settings: {0}")]
    Figment(#[from] figment::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn load(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::Load {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
