//! Filter capping how often any single token may appear.
//!
//! Keeps a user's stream from being dominated by one frequently-practised
//! topic: only the first `max_occurrences` copies of each distinct token
//! survive, and survivors keep their original relative order.

use crate::tokens::TagToken;
use crate::traits::StreamFilter;
use std::collections::HashMap;

/// Default cap used by the feature transformer.
pub const MAX_TAG_OCCURRENCES: usize = 2;

/// Keeps at most `max_occurrences` copies of each distinct token.
///
/// ## Algorithm
/// Single pass with a HashMap counting copies seen so far; a token is kept
/// while its count is below the cap.
pub struct TagCapFilter {
    max_occurrences: usize,
}

impl TagCapFilter {
    pub fn new(max_occurrences: usize) -> Self {
        Self { max_occurrences }
    }
}

impl Default for TagCapFilter {
    fn default() -> Self {
        Self::new(MAX_TAG_OCCURRENCES)
    }
}

impl StreamFilter for TagCapFilter {
    fn name(&self) -> &str {
        "TagCapFilter"
    }

    fn apply(&self, tokens: Vec<TagToken>) -> Vec<TagToken> {
        let mut seen: HashMap<TagToken, usize> = HashMap::new();
        tokens
            .into_iter()
            .filter(|token| {
                let count = seen.entry(token.clone()).or_insert(0);
                *count += 1;
                *count <= self.max_occurrences
            })
            .collect()
    }
}
