//! Error types for the transform and decode stages.

use thiserror::Error;

/// Failures while turning raw history into a tag stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// A submission lacks a field needed to identify its problem
    #[error("malformed submission record #{position}: missing {field}")]
    MalformedRecord { position: usize, field: &'static str },

    /// Nothing usable remained after tokenization and filtering
    #[error("no usable tag history for '{handle}'")]
    EmptyAfterFilter { handle: String },
}

/// Failures while running the recommendation decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The predicted id has no token in the vocabulary
    #[error("predicted id {id} has no matching vocabulary token (step {step})")]
    NoMatchingToken { id: u32, step: usize },

    /// The scoring backend could not produce a distribution
    #[error("sequence scorer unavailable: {0}")]
    ScorerUnavailable(String),
}

/// Error reported by a [`SequenceScorer`](crate::SequenceScorer) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ScorerError(pub String);

impl ScorerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ScorerError> for DecodeError {
    fn from(err: ScorerError) -> Self {
        DecodeError::ScorerUnavailable(err.0)
    }
}
