//! Error types for the engine

use crate::client::ClientError;
use crate::control::InvalidTransition;
use crate::parser::ParseError;
use deltapi_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort an operation before or around a run
///
/// Failures of individual HTTP calls are not errors at this level: they are
/// recorded in the action's result and the run moves on.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An action file does not exist
    #[error("action file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read a file
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the next line from a line source
    #[error("failed to read action line: {0}")]
    ReadLine(#[source] std::io::Error),

    /// A line could not be turned into an action
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Failed to write a report
    #[error("failed to write report {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report (de)serialization failed
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The run controller was not in a state that allows the request
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// An HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] ClientError),

    /// The run configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}
