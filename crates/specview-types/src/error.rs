use std::path::PathBuf;

use thiserror::Error;

/// Errors produced at the artifact and configuration boundary.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("artifact root must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid fork policy: {0}")]
    Policy(#[from] toml::de::Error),

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Convenience alias for results at the artifact boundary.
pub type Result<T> = std::result::Result<T, TypeError>;
