//! Failure taxonomy for history fetching.

use thiserror::Error;

/// Errors returned by a [`HistoryFetcher`](crate::HistoryFetcher).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The submissions query reported a non-OK status
    #[error("handle '{handle}' not found: {comment}")]
    NoSuchHandle { handle: String, comment: String },

    /// The submissions query succeeded but returned nothing
    #[error("handle '{handle}' has no submissions")]
    EmptyHistory { handle: String },

    /// The ratings query failed or returned no events
    #[error("rating history unavailable for '{handle}': {reason}")]
    RatingUnavailable { handle: String, reason: String },

    /// The submissions query could not be completed
    #[error("upstream request failed after {attempts} attempt(s): {reason}")]
    Transport { attempts: u32, reason: String },
}
