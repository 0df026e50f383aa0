//! Autoregressive recommendation decoder.
//!
//! Each decode step scores the user's recent context with the sequence
//! model, takes the highest-scoring vocabulary id, and feeds the resulting
//! token back into the context for the next step.
//!
//! ## State
//! - context: the user's tokens, most recent first, followed by every token
//!   emitted so far
//! - window: the last `max_window` context ids, left-padded with 0
//! - emitted: tokens produced so far, one per step

use crate::error::DecodeError;
use crate::tokens::UserTagStream;
use crate::traits::SequenceScorer;
use data_loader::{PADDING_ID, TagVocabulary, TokenId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Window length the deployed model was trained with.
pub const MAX_WINDOW: usize = 963;

/// Number of tokens produced per request.
pub const DECODE_STEPS: usize = 10;

/// Mutable per-request decode state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationSequence {
    /// Context ids; tokens unknown to the vocabulary are already dropped
    context: Vec<TokenId>,
    emitted: Vec<String>,
}

impl RecommendationSequence {
    /// Seed the context with the stream reversed (most recent first).
    pub fn new(stream: &UserTagStream, vocab: &TagVocabulary) -> Self {
        let text = stream.to_strings();
        let context = vocab.encode(text.iter().rev().map(String::as_str));
        Self {
            context,
            emitted: Vec::new(),
        }
    }

    /// The last `max_window` context ids, left-padded to exactly `max_window`.
    pub fn window(&self, max_window: usize) -> Vec<TokenId> {
        let recent = &self.context[self.context.len().saturating_sub(max_window)..];
        let mut window = vec![PADDING_ID; max_window - recent.len()];
        window.extend_from_slice(recent);
        window
    }

    /// Append a predicted token to both the context and the output.
    pub fn push(&mut self, id: TokenId, token: &str) {
        self.context.push(id);
        self.emitted.push(token.to_string());
    }

    pub fn context_len(&self) -> usize {
        self.context.len()
    }

    pub fn emitted(&self) -> &[String] {
        &self.emitted
    }

    pub fn into_emitted(self) -> Vec<String> {
        self.emitted
    }
}

/// Index of the highest score. Ties go to the lowest id; NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Runs a fixed number of decode steps against an injected scorer.
pub struct RecommendationDecoder<S> {
    vocab: Arc<TagVocabulary>,
    scorer: S,
    max_window: usize,
    steps: usize,
}

impl<S: SequenceScorer> RecommendationDecoder<S> {
    pub fn new(vocab: Arc<TagVocabulary>, scorer: S) -> Self {
        Self {
            vocab,
            scorer,
            max_window: MAX_WINDOW,
            steps: DECODE_STEPS,
        }
    }

    /// Configure the window length (default: 963)
    pub fn with_max_window(mut self, max_window: usize) -> Self {
        self.max_window = max_window;
        self
    }

    /// Configure the number of decode steps (default: 10)
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn vocab(&self) -> &TagVocabulary {
        &self.vocab
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn max_window(&self) -> usize {
        self.max_window
    }

    /// Produce exactly `steps` recommended tokens for a stream.
    #[instrument(skip_all, fields(stream_len = stream.len()))]
    pub async fn decode(&self, stream: &UserTagStream) -> Result<Vec<String>, DecodeError> {
        let mut sequence = RecommendationSequence::new(stream, &self.vocab);
        debug!(
            known = sequence.context_len(),
            unknown = stream.len() - sequence.context_len(),
            "Seeded decode context"
        );

        for step in 0..self.steps {
            let window = sequence.window(self.max_window);
            let scores = self.scorer.score(&window).await?;
            let best = argmax(&scores).ok_or_else(|| {
                DecodeError::ScorerUnavailable("scorer returned no usable scores".to_string())
            })?;

            let id = best as TokenId;
            let token = self
                .vocab
                .get_token(id)
                .ok_or(DecodeError::NoMatchingToken { id, step })?;
            debug!(step, id, token, "Decoded token");
            sequence.push(id, token);
        }

        Ok(sequence.into_emitted())
    }
}
