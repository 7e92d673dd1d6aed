//! Error types for the export and import pipelines

use thiserror::Error;

use crate::config::MessageType;

/// Failure of an export or import call
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid setting, raised before any I/O
    #[error("{0}")]
    Config(String),

    /// Blob fetch or store failed
    #[error("Storage operation on {target} failed: {message}")]
    Storage { target: String, message: String },

    /// Payload is not valid for the selected message type
    #[error("Failed to decode {message_type} payload: {diagnostic}")]
    Decode {
        message_type: MessageType,
        diagnostic: String,
    },

    /// Template application failed; carries the engine diagnostic
    #[error("{0}")]
    Transform(String),

    #[error("Failed to encode {message_type} payload: {message}")]
    Encode {
        message_type: MessageType,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn decode(message_type: MessageType, diagnostic: impl ToString) -> Self {
        PipelineError::Decode {
            message_type,
            diagnostic: diagnostic.to_string(),
        }
    }

    pub(crate) fn encode(message_type: MessageType, message: impl ToString) -> Self {
        PipelineError::Encode {
            message_type,
            message: message.to_string(),
        }
    }
}

/// Failure reported by a blob store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Blob {container}/{blob} does not exist")]
    NotFound { container: String, blob: String },

    #[error("Invalid connection string: {0}")]
    InvalidConnection(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure reported by a transform engine
#[derive(Debug, Error)]
#[error("{diagnostic}")]
pub struct TransformError {
    pub diagnostic: String,
}

impl TransformError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }
}

impl From<TransformError> for PipelineError {
    fn from(e: TransformError) -> Self {
        PipelineError::Transform(e.diagnostic)
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
