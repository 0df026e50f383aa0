//! The FilterPipeline chains stream filters.
//!
//! Filters are applied in the order they were added, each receiving the
//! previous filter's output.

use crate::tokens::TagToken;
use crate::traits::StreamFilter;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(TagCapFilter::new(MAX_TAG_OCCURRENCES));
///
/// let capped = pipeline.apply(tokens);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn StreamFilter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl StreamFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the tokens.
    pub fn apply(&self, tokens: Vec<TagToken>) -> Vec<TagToken> {
        let mut current = tokens;
        for filter in &self.filters {
            let input_count = current.len();
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} ({} -> {} tokens)",
                filter.name(),
                input_count,
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
