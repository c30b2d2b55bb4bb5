//! Error type shared by every binding operation

use crate::dtype::DType;
use crate::ffi::{AfErr, LoadError, Status};
use afbind_config::ConfigError;
use thiserror::Error;

/// Binding errors
#[derive(Error, Debug)]
pub enum Error {
    /// A dtype argument is not a member of the engine's dtype enumeration.
    /// Raised before any foreign call.
    #[error("Invalid dtype: {0}")]
    InvalidDType(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A foreign call returned a nonzero status
    #[error("{op} failed with {status} ({code}): {message}")]
    Engine {
        op: &'static str,
        status: Status,
        code: AfErr,
        message: String,
    },

    #[error("Type mismatch: array holds {actual}, requested {expected}")]
    DTypeMismatch { expected: DType, actual: DType },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Engine status, if this error came from a foreign call
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Engine { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for binding operations
pub type Result<T> = std::result::Result<T, Error>;
