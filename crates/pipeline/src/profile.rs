//! Per-user attempt profile built from raw submissions.
//!
//! ## Algorithm
//! 1. Flatten each submission's nested problem; missing contest id and
//!    rating become 0, missing index or name is a malformed record
//! 2. Key each problem as `contestId ++ index ++ " " ++ name`
//! 3. Count submissions per (handle, problem) before deduplicating
//! 4. Keep the first occurrence of each (handle, problem) in input order
//! 5. Resolve the user's rating at the time of that submission
//! 6. Collapse the verdict to accepted / not accepted

use crate::error::TransformError;
use data_loader::{RatingEvent, SubmissionRecord, Timestamp};
use std::collections::{HashMap, HashSet};

/// Rating reported when no rating change precedes a submission.
pub const UNRATED: i32 = 0;

/// A submission with its problem fields hoisted to the top level.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSubmission {
    pub handle: String,
    pub contest_id: u32,
    pub index: String,
    pub name: String,
    pub problem_type: Option<String>,
    pub points: Option<f32>,
    pub problem_rating: u32,
    pub tags: Vec<String>,
    pub accepted: bool,
    pub creation_time: Timestamp,
}

impl FlatSubmission {
    /// Flatten one record; `position` is only used for error reporting.
    pub fn from_record(record: &SubmissionRecord, position: usize) -> Result<Self, TransformError> {
        let problem = &record.problem;
        let index = problem
            .index
            .clone()
            .ok_or(TransformError::MalformedRecord {
                position,
                field: "problem.index",
            })?;
        let name = problem
            .name
            .clone()
            .ok_or(TransformError::MalformedRecord {
                position,
                field: "problem.name",
            })?;

        Ok(Self {
            handle: record.handle.clone(),
            contest_id: problem.contest_id.unwrap_or(0),
            index,
            name,
            problem_type: problem.problem_type.clone(),
            points: problem.points,
            problem_rating: problem.rating.unwrap_or(0),
            tags: problem.tags.clone(),
            accepted: record.verdict.is_accepted(),
            creation_time: record.creation_time,
        })
    }

    /// Dedup key for the problem, e.g. `"1520A Do Not Be Distracted!"`
    pub fn problem_key(&self) -> String {
        format!("{}{} {}", self.contest_id, self.index, self.name)
    }
}

/// One distinct problem a user attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub problem_id: String,
    pub problem_rating: u32,
    pub verdict: bool,
    pub user_rating_at_attempt: i32,
    pub attempt_count: u32,
    /// Raw tags, in upstream order
    pub tags: Vec<String>,
}

/// All distinct attempts for one handle, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub handle: String,
    pub attempts: Vec<AttemptRecord>,
}

impl UserProfile {
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn solved_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.verdict).count()
    }
}

/// Rating changes sorted by time, for "latest strictly before" lookups.
#[derive(Debug, Clone)]
pub struct RatingTimeline {
    events: Vec<RatingEvent>,
}

impl RatingTimeline {
    pub fn new(ratings: &[RatingEvent]) -> Self {
        let mut events = ratings.to_vec();
        // Stable, so events sharing a timestamp keep upstream order
        events.sort_by_key(|e| e.timestamp);
        Self { events }
    }

    /// The newRating of the latest event strictly before `time`, or [`UNRATED`].
    pub fn rating_before(&self, time: Timestamp) -> i32 {
        let idx = self.events.partition_point(|e| e.timestamp < time);
        if idx == 0 {
            UNRATED
        } else {
            self.events[idx - 1].new_rating
        }
    }
}

/// Build the attempt profile for a user's submissions.
pub fn build_profile(
    submissions: &[SubmissionRecord],
    ratings: &[RatingEvent],
) -> Result<UserProfile, TransformError> {
    let flat = submissions
        .iter()
        .enumerate()
        .map(|(position, record)| FlatSubmission::from_record(record, position))
        .collect::<Result<Vec<_>, _>>()?;

    let keyed: Vec<(String, FlatSubmission)> = flat
        .into_iter()
        .map(|submission| (submission.problem_key(), submission))
        .collect();

    // Attempt counts are taken over every submission, before dedup
    let mut attempt_counts: HashMap<(&str, &str), u32> = HashMap::new();
    for (key, submission) in &keyed {
        *attempt_counts
            .entry((submission.handle.as_str(), key.as_str()))
            .or_insert(0) += 1;
    }

    let timeline = RatingTimeline::new(ratings);
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut attempts = Vec::new();

    for (key, submission) in &keyed {
        let identity = (submission.handle.as_str(), key.as_str());
        if !seen.insert(identity) {
            continue;
        }
        attempts.push(AttemptRecord {
            problem_id: key.clone(),
            problem_rating: submission.problem_rating,
            verdict: submission.accepted,
            user_rating_at_attempt: timeline.rating_before(submission.creation_time),
            attempt_count: attempt_counts.get(&identity).copied().unwrap_or(1),
            tags: submission.tags.clone(),
        });
    }

    let handle = submissions
        .first()
        .map(|s| s.handle.clone())
        .unwrap_or_default();
    Ok(UserProfile { handle, attempts })
}
