use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GradebookError>;

#[derive(Error, Debug)]
pub enum GradebookError {
    /// A record failed the required-field checks at append time.
    #[error("{0}")]
    Validation(String),

    /// Malformed grade bands or configuration file.
    #[error("{0}")]
    Configuration(String),

    #[error("failed to access {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table file {}: {message}", .path.display())]
    MalformedTable { path: PathBuf, message: String },
}

impl GradebookError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Error code reported over IPC.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Configuration(_) => "bad_config",
            Self::Storage { .. } => "storage_failed",
            Self::MalformedTable { .. } => "storage_malformed",
        }
    }
}
