use thiserror::Error;

pub type Result<T> = std::result::Result<T, BloomError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BloomError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Bloom capacity exceeded: {count} > {capacity}")]
    CapacityExceeded { count: usize, capacity: usize },

    #[error("Malformed serialization: {0}")]
    MalformedSerialization(String),

    #[error("Digest algorithm not available: {0}")]
    DigestUnavailable(String),

    #[error("Incompatible filters: {reason}")]
    IncompatibleFilters { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BloomError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        BloomError::MalformedSerialization(msg.into())
    }
}

impl From<hex::FromHexError> for BloomError {
    fn from(err: hex::FromHexError) -> Self {
        BloomError::MalformedSerialization(err.to_string())
    }
}

// Conversion from serde_json::Error to BloomError
impl From<serde_json::Error> for BloomError {
    fn from(err: serde_json::Error) -> Self {
        BloomError::SerializationError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for BloomError {
    fn from(err: std::num::ParseIntError) -> Self {
        BloomError::MalformedSerialization(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for BloomError {
    fn from(err: std::num::ParseFloatError) -> Self {
        BloomError::MalformedSerialization(err.to_string())
    }
}
