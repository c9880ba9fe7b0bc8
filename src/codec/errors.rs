use std::fmt;
use thiserror::Error;
use tracing::{debug, error};

/// Exception frame sent by the server instead of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerException {
    pub code: i32,
    pub name: String,
    pub message: String,
    pub stack_trace: String,
    pub nested: Option<Box<ServerException>>,
}

impl fmt::Display for ServerException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {}): {}", self.name, self.code, self.message)?;
        if let Some(nested) = &self.nested {
            write!(f, "; caused by {}", nested)?;
        }
        Ok(())
    }
}

/// Errors raised while decoding or encoding native protocol data.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    #[error("Protocol limit exceeded: {0}")]
    ProtocolLimitExceeded(String),

    #[error("Protocol state error: {0}")]
    ProtocolStateError(String),

    #[error("Server reported error: {0}")]
    ServerReported(ServerException),

    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    #[error("Cannot represent {kind} values as {representation}")]
    UnsupportedRepresentation {
        kind: String,
        representation: String,
    },
}

impl CodecError {
    /// Errors after which the connection's byte stream can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CodecError::UnsupportedType(_)
                | CodecError::ProtocolLimitExceeded(_)
                | CodecError::ProtocolStateError(_)
        )
    }

    pub fn log_error(&self) {
        match self {
            CodecError::UnsupportedType(spec) => {
                error!("Unsupported column type: {}", spec);
            }
            CodecError::ProtocolLimitExceeded(e) => {
                error!("Protocol limit exceeded: {}", e);
                debug!("Protocol limit details: {:?}", self);
            }
            CodecError::ProtocolStateError(e) => {
                error!("Protocol state error: {}", e);
                debug!("Protocol state details: {:?}", self);
            }
            CodecError::ServerReported(e) => {
                error!("Server reported error {}: {}", e.code, e.message);
                debug!("Server stack trace: {}", e.stack_trace);
            }
            CodecError::ValueOutOfRange(e) => {
                error!("Value out of range: {}", e);
            }
            CodecError::UnsupportedRepresentation {
                kind,
                representation,
            } => {
                error!("Cannot represent {} values as {}", kind, representation);
            }
        }
    }
}

impl From<ServerException> for CodecError {
    fn from(e: ServerException) -> Self {
        CodecError::ServerReported(e)
    }
}
