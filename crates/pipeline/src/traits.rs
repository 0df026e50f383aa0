//! Core traits for the recommendation pipeline.
//!
//! - [`StreamFilter`]: a composable stage that reshapes a user's tag stream
//! - [`SequenceScorer`]: the one capability the decoder needs from the
//!   trained model

use crate::error::ScorerError;
use crate::tokens::TagToken;
use data_loader::TokenId;
use std::future::Future;

/// A stage applied to a user's tag tokens after expansion.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across concurrent requests
/// - Filters take ownership of the tokens and return the filtered Vec
/// - Filters must be deterministic: identical input, identical output
pub trait StreamFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to an ordered token sequence.
    fn apply(&self, tokens: Vec<TagToken>) -> Vec<TagToken>;
}

/// Scores a fixed-length window of token ids.
///
/// Implementations return one score per vocabulary id, where index `i` is
/// the model's score for id `i` being the next token.
pub trait SequenceScorer: Send + Sync {
    fn score(
        &self,
        window: &[TokenId],
    ) -> impl Future<Output = Result<Vec<f32>, ScorerError>> + Send;
}
