//! Feature transformation: raw history to a user's tag stream.
//!
//! This module turns the submissions and rating changes fetched for a user
//! into the ordered tag tokens consumed by the decoder.

use crate::error::TransformError;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::TagCapFilter;
use crate::profile::{AttemptRecord, UserProfile, build_profile};
use crate::tokens::{TagToken, UserTagStream};
use data_loader::{RatingEvent, SubmissionRecord};
use rayon::prelude::*;
use tracing::debug;

/// Builds a [`UserTagStream`] from raw history.
///
/// ## Algorithm
/// 1. Build the attempt profile (flatten, count, dedup, resolve ratings)
/// 2. Expand each attempt's tags into tokens suffixed with the problem rating,
///    keeping tag order within an attempt and attempt order across attempts
/// 3. Run the filter pipeline (by default: cap each token at two copies)
///
/// The output depends only on the input order, never on wall-clock time.
pub struct FeatureTransformer {
    filters: FilterPipeline,
}

impl FeatureTransformer {
    /// Create a transformer with the default per-tag cap.
    pub fn new() -> Self {
        Self::with_filters(FilterPipeline::new().add_filter(TagCapFilter::default()))
    }

    /// Create a transformer with a custom filter pipeline.
    pub fn with_filters(filters: FilterPipeline) -> Self {
        Self { filters }
    }

    /// Transform raw history into the user's tag stream.
    pub fn transform(
        &self,
        submissions: &[SubmissionRecord],
        ratings: &[RatingEvent],
    ) -> Result<UserTagStream, TransformError> {
        let profile = build_profile(submissions, ratings)?;
        self.transform_profile(&profile)
    }

    /// Transform an already-built profile.
    pub fn transform_profile(&self, profile: &UserProfile) -> Result<UserTagStream, TransformError> {
        let expanded = expand_tags(&profile.attempts);
        let expanded_count = expanded.len();
        let filtered = self.filters.apply(expanded);

        debug!(
            handle = %profile.handle,
            attempts = profile.len(),
            expanded = expanded_count,
            kept = filtered.len(),
            "Transformed attempts into tag stream"
        );

        if filtered.is_empty() {
            return Err(TransformError::EmptyAfterFilter {
                handle: profile.handle.clone(),
            });
        }
        Ok(UserTagStream::new(filtered))
    }
}

impl Default for FeatureTransformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand every attempt's tags into tokens, in attempt order.
///
/// Attempts are expanded in parallel; the indexed collect keeps the
/// original order.
pub fn expand_tags(attempts: &[AttemptRecord]) -> Vec<TagToken> {
    let per_attempt: Vec<Vec<TagToken>> = attempts
        .par_iter()
        .map(|attempt| {
            attempt
                .tags
                .iter()
                .filter_map(|tag| TagToken::from_raw_tag(tag, attempt.problem_rating))
                .collect()
        })
        .collect();
    per_attempt.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Problem, Verdict};

    fn submission(index: &str, rating: Option<u32>, tags: &[&str]) -> SubmissionRecord {
        SubmissionRecord {
            handle: "bob".to_string(),
            problem: Problem {
                contest_id: Some(1000),
                index: Some(index.to_string()),
                name: format!("Problem {}", index).into(),
                problem_type: None,
                points: None,
                rating,
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
            verdict: Verdict::Accepted,
            creation_time: 100,
        }
    }

    #[test]
    fn test_tokens_preserve_tag_then_attempt_order() {
        let submissions = vec![
            submission("A", Some(800), &["math", "brute force"]),
            submission("B", Some(1800), &["dp", "2-sat"]),
        ];

        let stream = FeatureTransformer::new().transform(&submissions, &[]).unwrap();

        assert_eq!(
            stream.to_strings(),
            vec!["math800", "bruteforce800", "dp1800", "sat1800"]
        );
    }

    #[test]
    fn test_unrated_problem_uses_zero_suffix() {
        let submissions = vec![submission("A", None, &["greedy"])];
        let stream = FeatureTransformer::new().transform(&submissions, &[]).unwrap();
        assert_eq!(stream.to_strings(), vec!["greedy0"]);
    }

    #[test]
    fn test_cap_applies_across_attempts() {
        let submissions = vec![
            submission("A", Some(800), &["math"]),
            submission("B", Some(800), &["math"]),
            submission("C", Some(800), &["math", "greedy"]),
        ];

        let stream = FeatureTransformer::new().transform(&submissions, &[]).unwrap();

        assert_eq!(stream.to_strings(), vec!["math800", "math800", "greedy800"]);
    }

    #[test]
    fn test_duplicate_submissions_expand_once() {
        let submissions = vec![
            submission("A", Some(800), &["math"]),
            submission("A", Some(800), &["math"]),
        ];
        let stream = FeatureTransformer::new().transform(&submissions, &[]).unwrap();
        assert_eq!(stream.len(), 1);
    }

    #[test]
    fn test_untagged_history_is_empty_after_filter() {
        let submissions = vec![submission("A", Some(800), &[]), submission("B", None, &["123"])];

        let err = FeatureTransformer::new()
            .transform(&submissions, &[])
            .unwrap_err();

        assert_eq!(
            err,
            TransformError::EmptyAfterFilter {
                handle: "bob".to_string()
            }
        );
    }

    #[test]
    fn test_transform_is_deterministic() {
        let submissions: Vec<_> = (0..200)
            .map(|i| {
                let tags: &[&str] = match i % 3 {
                    0 => &["dp", "math"],
                    1 => &["graphs", "dfs and similar"],
                    _ => &["greedy"],
                };
                submission(&format!("P{}", i % 50), Some(800 + 100 * (i % 7)), tags)
            })
            .collect();
        let transformer = FeatureTransformer::new();

        let first = transformer.transform(&submissions, &[]).unwrap();
        for _ in 0..5 {
            assert_eq!(transformer.transform(&submissions, &[]).unwrap(), first);
        }
    }
}
