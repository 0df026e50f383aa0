//! Feature pipeline and recommendation decoder.
//!
//! This crate provides:
//! - Profile building from raw submissions (attempt counts, dedup, rating lookup)
//! - Tag tokenization and the StreamFilter / FilterPipeline composition
//! - FeatureTransformer tying the above together into a UserTagStream
//! - RecommendationDecoder running the autoregressive decode loop
//!
//! ## Architecture
//! The pipeline processes a request in stages:
//! 1. `build_profile` collapses submissions into one attempt per problem
//! 2. Each attempt's tags expand into rating-suffixed tokens
//! 3. Filters reshape the token stream (per-tag cap)
//! 4. The decoder scores sliding windows of the stream through an injected
//!    `SequenceScorer` and emits one token per step
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FeatureTransformer, RecommendationDecoder};
//!
//! let stream = FeatureTransformer::new().transform(&submissions, &ratings)?;
//! let decoder = RecommendationDecoder::new(vocab.clone(), scorer);
//! let recommendations = decoder.decode(&stream).await?;
//! ```

pub mod decoder;
pub mod error;
pub mod features;
pub mod filter_pipeline;
pub mod filters;
pub mod profile;
pub mod tokens;
pub mod traits;

// Re-export main types
pub use decoder::{DECODE_STEPS, MAX_WINDOW, RecommendationDecoder, RecommendationSequence};
pub use error::{DecodeError, ScorerError, TransformError};
pub use features::FeatureTransformer;
pub use filter_pipeline::FilterPipeline;
pub use profile::{AttemptRecord, UserProfile, build_profile};
pub use tokens::{TagToken, UserTagStream};
pub use traits::{SequenceScorer, StreamFilter};
