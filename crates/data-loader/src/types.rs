//! Core domain types for Codeforces submission history.
//!
//! These mirror the records returned by the upstream API closely enough to
//! be deserialized directly, while keeping the fields the pipeline reads
//! strongly typed:
//! - Type aliases for domain clarity (ContestId, TokenId, Timestamp)
//! - `Option<T>` wherever the upstream API may omit a field
//! - A two-state `Verdict` instead of the full upstream verdict vocabulary

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Contest number on Codeforces (0 when the problem belongs to no contest)
pub type ContestId = u32;

/// Integer id of a tag token inside the vocabulary (0 is padding)
pub type TokenId = u32;

/// Unix timestamp in seconds
pub type Timestamp = i64;

// =============================================================================
// Submission-related Types
// =============================================================================

/// The problem a submission was made against, as nested in the upstream record.
///
/// Every field except `tags` may be absent upstream; gym and problemset-only
/// problems frequently lack a contest id or a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub contest_id: Option<ContestId>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub problem_type: Option<String>,
    #[serde(default)]
    pub points: Option<f32>,
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Judged outcome of a submission. Only "accepted or not" is retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Verdict {
    Accepted,
    #[default]
    Other,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl From<Option<String>> for Verdict {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            Some("OK") => Verdict::Accepted,
            _ => Verdict::Other,
        }
    }
}

/// A single submission by a user. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Filled in by the fetcher with the requested handle
    #[serde(default)]
    pub handle: String,
    pub problem: Problem,
    #[serde(default)]
    pub verdict: Verdict,
    #[serde(rename = "creationTimeSeconds")]
    pub creation_time: Timestamp,
}

// =============================================================================
// Rating Type
// =============================================================================

/// One rating change for a user, as reported after a rated contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingEvent {
    #[serde(rename = "ratingUpdateTimeSeconds")]
    pub timestamp: Timestamp,
    pub new_rating: i32,
}
