//! Codeforces history source.
//!
//! Retrieves a user's submissions and rating changes from the public
//! Codeforces API.
//!
//! ## Protocol
//! 1. `user.status` for the handle, retried on transport failures and
//!    non-2xx responses (up to `max_attempts`, `retry_delay` apart)
//! 2. Pause for `pacing_delay`; the API allows roughly one call every two
//!    seconds per client
//! 3. `user.rating` for the same handle, attempted exactly once
//!
//! A response whose envelope reports a non-OK status is never retried: the
//! API uses that to signal an unknown handle, and asking again won't help.

use crate::error::FetchError;
use crate::types::{ApiEnvelope, UserHistory};
use crate::HistoryFetcher;
use data_loader::{RatingEvent, SubmissionRecord};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

const DEFAULT_API_BASE: &str = "https://codeforces.com/api";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_SUBMISSION_COUNT: u32 = 10_000;

/// Tunables for [`CodeforcesFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub api_base: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub pacing_delay: Duration,
    pub timeout: Duration,
    /// Upper bound on submissions requested in one page
    pub submission_count: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            pacing_delay: DEFAULT_PACING_DELAY,
            timeout: DEFAULT_TIMEOUT,
            submission_count: DEFAULT_SUBMISSION_COUNT,
        }
    }
}

impl FetcherConfig {
    /// Point the fetcher at a different API root (default: codeforces.com)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Per-call timeout; a timed-out call counts as a transport failure
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure retry delay and pacing delay together
    pub fn with_delays(mut self, retry_delay: Duration, pacing_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self.pacing_delay = pacing_delay;
        self
    }
}

/// Outcome of one submissions attempt
enum Attempt<T> {
    Done(Result<T, FetchError>),
    Retry(String),
}

/// HTTP client for the Codeforces API.
#[derive(Clone)]
pub struct CodeforcesFetcher {
    config: FetcherConfig,
    client: reqwest::Client,
}

impl CodeforcesFetcher {
    /// Build the HTTP client; fails if the TLS backend cannot be initialised.
    pub fn new(config: FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), method)
    }

    fn submissions_url(&self, handle: &str) -> String {
        format!(
            "{}?handle={}&from=1&count={}",
            self.endpoint("user.status"),
            urlencoding::encode(handle),
            self.config.submission_count
        )
    }

    fn ratings_url(&self, handle: &str) -> String {
        format!(
            "{}?handle={}",
            self.endpoint("user.rating"),
            urlencoding::encode(handle)
        )
    }

    /// Fetch submissions, retrying transient failures.
    async fn fetch_submissions(&self, handle: &str) -> Result<Vec<SubmissionRecord>, FetchError> {
        let url = self.submissions_url(handle);
        let max_attempts = self.config.max_attempts.max(1);
        let mut last_reason = String::new();

        for attempt in 1..=max_attempts {
            match self.try_fetch::<Vec<SubmissionRecord>>(&url, handle).await {
                Attempt::Done(result) => return result.map(Option::unwrap_or_default),
                Attempt::Retry(reason) => {
                    warn!(handle, attempt, max_attempts, %reason, "Submissions request failed");
                    last_reason = reason;
                    if attempt < max_attempts {
                        sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(FetchError::Transport {
            attempts: max_attempts,
            reason: last_reason,
        })
    }

    /// One GET against the API, classified into done-or-retry.
    async fn try_fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        handle: &str,
    ) -> Attempt<Option<T>> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return Attempt::Retry(e.to_string()),
        };
        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => return Attempt::Retry(e.to_string()),
        };

        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(envelope) if !envelope.is_ok() => Attempt::Done(Err(FetchError::NoSuchHandle {
                handle: handle.to_string(),
                comment: envelope.comment.unwrap_or(envelope.status),
            })),
            Ok(envelope) if status.is_success() => Attempt::Done(Ok(envelope.result)),
            Ok(_) => Attempt::Retry(format!("HTTP {}", status)),
            Err(_) if !status.is_success() => Attempt::Retry(format!("HTTP {}", status)),
            Err(e) => Attempt::Done(Err(FetchError::Transport {
                attempts: 1,
                reason: format!("malformed response body: {}", e),
            })),
        }
    }

    /// Fetch rating changes with a single attempt.
    async fn fetch_ratings(&self, handle: &str) -> Result<Vec<RatingEvent>, FetchError> {
        let unavailable = |reason: String| FetchError::RatingUnavailable {
            handle: handle.to_string(),
            reason,
        };

        let url = self.ratings_url(handle);
        let ratings = match self.try_fetch::<Vec<RatingEvent>>(&url, handle).await {
            Attempt::Done(Ok(ratings)) => ratings.unwrap_or_default(),
            Attempt::Done(Err(e)) => return Err(unavailable(e.to_string())),
            Attempt::Retry(reason) => return Err(unavailable(reason)),
        };

        if ratings.is_empty() {
            return Err(unavailable("user has no rated contests".to_string()));
        }
        Ok(ratings)
    }
}

impl HistoryFetcher for CodeforcesFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, handle: &str) -> Result<UserHistory, FetchError> {
        let mut submissions = self.fetch_submissions(handle).await?;
        if submissions.is_empty() {
            return Err(FetchError::EmptyHistory {
                handle: handle.to_string(),
            });
        }
        for submission in &mut submissions {
            submission.handle = handle.to_string();
        }
        debug!(count = submissions.len(), "Fetched submissions");

        sleep(self.config.pacing_delay).await;

        let ratings = self.fetch_ratings(handle).await?;
        info!(
            submissions = submissions.len(),
            ratings = ratings.len(),
            "Fetched user history"
        );

        Ok(UserHistory {
            handle: handle.to_string(),
            submissions,
            ratings,
        })
    }
}
