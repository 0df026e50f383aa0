//! Filter implementations for the tag stream.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod tag_cap;

// Re-export for convenience
pub use tag_cap::{MAX_TAG_OCCURRENCES, TagCapFilter};
