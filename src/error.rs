//! Error taxonomy for lazy sequences.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeqError>;

/// Failures raised by sequence access. All of them are local to the call
/// that produced them; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqError {
    /// Negative, unrepresentable or otherwise malformed index. Nothing was
    /// pulled from the source.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// A finite source ran dry before the request could be served. The cache
    /// keeps every value produced up to that point.
    #[error("source exhausted after producing {produced} values")]
    ExhaustedSource { produced: usize },

    /// Sorted membership miss.
    #[error("{0} is not in the sequence")]
    NotFound(String),
}

impl SeqError {
    pub fn invalid_index(msg: impl Into<String>) -> Self {
        SeqError::InvalidIndex(msg.into())
    }

    pub fn not_found(x: impl std::fmt::Debug) -> Self {
        SeqError::NotFound(format!("{x:?}"))
    }
}
