//! # Data Loader Crate
//!
//! Domain types for a user's Codeforces history and the tag vocabulary the
//! recommendation model was trained on.
//!
//! ## Main Components
//!
//! - **types**: Upstream records (SubmissionRecord, Problem, RatingEvent, Verdict)
//! - **parser**: Parse vocabulary artifacts (JSON word index or `token id` lines)
//! - **vocab**: TagVocabulary with forward and reverse indices
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::TagVocabulary;
//! use std::path::Path;
//!
//! let vocab = TagVocabulary::load_from_file(Path::new("tag_vocabulary.json"))?;
//! let id = vocab.get_id("dp1800");
//! let token = vocab.get_token(id.unwrap());
//! ```

pub mod error;
pub mod parser;
pub mod types;
pub mod vocab;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    ContestId,
    Timestamp,
    TokenId,
    // Core types
    Problem,
    RatingEvent,
    SubmissionRecord,
    Verdict,
};
pub use vocab::{MAX_TOKEN_ID, PADDING_ID, TagVocabulary};
