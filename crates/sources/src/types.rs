//! Types shared between the fetcher and its callers.

use data_loader::{RatingEvent, SubmissionRecord};
use serde::Deserialize;

/// Everything the pipeline needs to know about one handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserHistory {
    pub handle: String,
    /// Submissions in upstream order (newest first)
    pub submissions: Vec<SubmissionRecord>,
    /// Rating changes in upstream order (oldest first)
    pub ratings: Vec<RatingEvent>,
}

/// Envelope wrapping every upstream API response.
///
/// `status` is `"OK"` on success; otherwise `comment` explains the failure
/// and `result` is absent.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Absent on failure; serde reads a missing `Option` as `None`
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Payload type with no `Default` impl
    #[derive(Debug, Deserialize, PartialEq)]
    struct Contest {
        id: u32,
    }

    #[test]
    fn test_failed_envelope_has_no_result() {
        let envelope: ApiEnvelope<Contest> =
            serde_json::from_str(r#"{"status": "FAILED", "comment": "handle: not found"}"#).unwrap();

        assert!(!envelope.is_ok());
        assert_eq!(envelope.comment.as_deref(), Some("handle: not found"));
        assert!(envelope.result.is_none());
    }

    #[test]
    fn test_ok_envelope_carries_result() {
        let envelope: ApiEnvelope<Vec<Contest>> =
            serde_json::from_str(r#"{"status": "OK", "result": [{"id": 1520}]}"#).unwrap();

        assert!(envelope.is_ok());
        assert_eq!(envelope.result, Some(vec![Contest { id: 1520 }]));
    }
}
