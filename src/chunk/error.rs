//! chunk stream error types

use thiserror::Error;

use crate::conditions::ConditionError;

/// error returned by chunk reading and by the parsers the reader dispatches to
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a chunk file (bad magic)")]
    BadMagic,

    /// the stream ended early or a field could not be decoded
    #[error("malformed chunk: {0}")]
    MalformedChunk(String),

    #[error("unknown condition type: {0}")]
    UnknownConditionType(i32),

    #[error("unknown parameter type: {0}")]
    UnknownParameterType(i32),

    /// a chunk header references a label id missing from the label table
    #[error("unknown chunk label id: {0}")]
    UnknownLabel(u32),

    /// a parser was handed a receiving object of the wrong type
    #[error("parser expected a {0} as the receiving object")]
    UnexpectedTarget(&'static str),
}

impl ChunkError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedChunk(message.into())
    }
}

impl From<ConditionError> for ChunkError {
    fn from(e: ConditionError) -> Self {
        match e {
            ConditionError::UnknownConditionType(ty) => Self::UnknownConditionType(ty.as_i32()),
            other => Self::MalformedChunk(other.to_string()),
        }
    }
}
