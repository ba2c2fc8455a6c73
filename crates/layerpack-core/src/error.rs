//! Error types for layerpack-core

use thiserror::Error;

/// Errors that can occur while packaging dependency layers
#[derive(Error, Debug)]
pub enum LayerError {
    /// A subprocess could not be launched at all (binary missing, permission denied)
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The container engine reported a problem
    #[error("docker error: {0}")]
    Docker(String),

    /// The operator declined to continue past an ambiguous diagnostic
    #[error("aborted by operator")]
    UserAborted,

    /// Configuration could not be resolved
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive creation error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LayerError>;
