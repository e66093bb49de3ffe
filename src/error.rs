//! Error types for the tdrl crate

use thiserror::Error;

/// Main error type for the tdrl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid config line {line_number}: '{line}' (expected exactly one 'KEY=VALUE')")]
    ConfigParse { line_number: usize, line: String },

    #[error("config key not found: {key}")]
    MissingConfigKey { key: String },

    #[error("invalid value '{value}' for config key {key} (expected {expected})")]
    InvalidConfigValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("invalid agent name '{name}'. Expected one of: {expected}")]
    UnknownAgent { name: String, expected: String },

    #[error("invalid environment name '{name}'. Expected one of: {expected}")]
    UnknownEnvironment { name: String, expected: String },

    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("invalid maze in '{context}': {message}")]
    InvalidMaze { context: String, message: String },

    #[error(
        "q-table shape mismatch: stored {stored_states}x{stored_actions}, \
         environment expects {expected_states}x{expected_actions}"
    )]
    QTableShape {
        stored_states: usize,
        stored_actions: usize,
        expected_states: usize,
        expected_actions: usize,
    },

    #[error("unsupported q-table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }

    pub(crate) fn invalid_parameter(name: &str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
