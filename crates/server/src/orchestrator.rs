//! # Pipeline Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Validate the handle
//! 2. Fetch the user's submissions and rating changes
//! 3. Transform them into the user's tag stream
//! 4. Decode a fixed number of recommended tokens
//!
//! Every stage returns a typed error; the first failure ends the request
//! with no partial output. [`OrchestratorError`] is the single place those
//! failures become HTTP statuses and user-facing messages.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use axum::http::StatusCode;
use thiserror::Error;
use tracing::{info, instrument, warn};

use data_loader::TagVocabulary;
use ml_client::MLScorerClient;
use pipeline::{
    DecodeError, FeatureTransformer, RecommendationDecoder, SequenceScorer,
    TransformError, UserProfile, UserTagStream, build_profile,
};
use sources::{CodeforcesFetcher, FetchError, HistoryFetcher};

use crate::config::Config;
use crate::scorer::GrpcSequenceScorer;

/// Request-scoped failure, one variant per pipeline stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    #[error("handle must not be empty")]
    InvalidHandle,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl OrchestratorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrchestratorError::InvalidHandle => StatusCode::BAD_REQUEST,
            OrchestratorError::Fetch(FetchError::NoSuchHandle { .. }) => StatusCode::NOT_FOUND,
            OrchestratorError::Fetch(FetchError::EmptyHistory { .. })
            | OrchestratorError::Fetch(FetchError::RatingUnavailable { .. })
            | OrchestratorError::Transform(_) => StatusCode::UNPROCESSABLE_ENTITY,
            OrchestratorError::Fetch(FetchError::Transport { .. }) => StatusCode::BAD_GATEWAY,
            OrchestratorError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when the request itself is the problem (bad or unusable handle),
    /// false for upstream, model or vocabulary faults.
    pub fn is_user_fault(&self) -> bool {
        match self {
            OrchestratorError::InvalidHandle | OrchestratorError::Transform(_) => true,
            OrchestratorError::Fetch(e) => !matches!(e, FetchError::Transport { .. }),
            OrchestratorError::Decode(_) => false,
        }
    }

    /// Message returned to the caller; keeps the distinguishing reason.
    pub fn user_message(&self) -> String {
        match self {
            OrchestratorError::InvalidHandle => "Please provide a Codeforces handle.".to_string(),
            OrchestratorError::Fetch(FetchError::NoSuchHandle { handle, .. }) => {
                format!("Codeforces handle '{}' does not exist.", handle)
            }
            OrchestratorError::Fetch(FetchError::EmptyHistory { handle }) => {
                format!("'{}' has not submitted any problems yet.", handle)
            }
            OrchestratorError::Fetch(FetchError::RatingUnavailable { handle, .. }) => {
                format!("'{}' has no rated contests; a rating history is required.", handle)
            }
            OrchestratorError::Fetch(FetchError::Transport { .. }) => {
                "Codeforces could not be reached. Please try again later.".to_string()
            }
            OrchestratorError::Transform(e) => format!("Submission history is unusable: {}", e),
            OrchestratorError::Decode(e) => format!("Recommendation model failure: {}", e),
        }
    }
}

/// What the transformer produced for one handle, before decoding.
#[derive(Debug, Clone)]
pub struct StreamReport {
    pub profile: UserProfile,
    pub stream: UserTagStream,
}

/// Fetch and transform only; shared by the full request and the CLI's
/// stream inspection, which needs no model.
#[instrument(skip(fetcher, transformer))]
pub async fn inspect_history<F: HistoryFetcher>(
    fetcher: &F,
    transformer: &FeatureTransformer,
    handle: &str,
) -> Result<StreamReport, OrchestratorError> {
    if handle.trim().is_empty() {
        return Err(OrchestratorError::InvalidHandle);
    }

    let fetch_start = Instant::now();
    let history = fetcher.fetch(handle).await?;
    info!(
        submissions = history.submissions.len(),
        ratings = history.ratings.len(),
        elapsed = ?fetch_start.elapsed(),
        "Fetched history"
    );

    let transform_start = Instant::now();
    let profile = build_profile(&history.submissions, &history.ratings)?;
    let stream = transformer.transform_profile(&profile)?;
    info!(
        attempts = profile.len(),
        tokens = stream.len(),
        elapsed = ?transform_start.elapsed(),
        "Built tag stream"
    );

    Ok(StreamReport { profile, stream })
}

/// Runs Fetcher → Transformer → Decoder for one handle.
///
/// The fetcher and scorer are injected, so tests can swap in stubs for the
/// Codeforces API and the model service.
pub struct PipelineOrchestrator<F, S> {
    fetcher: F,
    transformer: FeatureTransformer,
    decoder: RecommendationDecoder<S>,
}

impl<F: HistoryFetcher, S: SequenceScorer> PipelineOrchestrator<F, S> {
    pub fn new(fetcher: F, transformer: FeatureTransformer, decoder: RecommendationDecoder<S>) -> Self {
        Self {
            fetcher,
            transformer,
            decoder,
        }
    }

    pub fn vocab(&self) -> &TagVocabulary {
        self.decoder.vocab()
    }

    /// Main entry point: recommended tokens for a handle
    #[instrument(skip(self))]
    pub async fn handle_request(&self, handle: &str) -> Result<Vec<String>, OrchestratorError> {
        let start_time = Instant::now();

        let report = inspect_history(&self.fetcher, &self.transformer, handle).await?;

        let decode_start = Instant::now();
        let recommendations = self.decoder.decode(&report.stream).await?;
        info!(
            recommended = recommendations.len(),
            elapsed = ?decode_start.elapsed(),
            "Decoded recommendations"
        );

        info!(elapsed = ?start_time.elapsed(), "Request complete");
        Ok(recommendations)
    }
}

/// The production wiring: Codeforces API plus the gRPC model service.
pub type ServiceOrchestrator = PipelineOrchestrator<CodeforcesFetcher, GrpcSequenceScorer>;

impl ServiceOrchestrator {
    /// Load the vocabulary, connect to the model service and load the model.
    ///
    /// Any failure here is fatal: the process must not serve requests
    /// without a vocabulary and a model whose window matches the decoder.
    pub async fn from_config(config: &Config) -> Result<Self> {
        info!(path = %config.vocab_path.display(), "Loading tag vocabulary");
        let vocab = Arc::new(
            TagVocabulary::load_from_file(&config.vocab_path)
                .with_context(|| format!("Loading vocabulary from {}", config.vocab_path.display()))?,
        );
        info!(tokens = vocab.token_count(), size = vocab.len(), "Vocabulary loaded");

        let mut client = MLScorerClient::connect(config.scorer_addr.clone()).await?;
        let model_path = config.model_path.to_string_lossy();
        let model = client
            .load_model(&model_path)
            .await
            .context("Loading sequence model")?;

        let vocab_size = vocab.len();
        let decoder = RecommendationDecoder::new(vocab, GrpcSequenceScorer::new(client));
        if model.max_window as usize != decoder.max_window() {
            bail!(
                "model window is {} but the decoder requires {}",
                model.max_window,
                decoder.max_window()
            );
        }
        if model.output_dim as usize != vocab_size {
            warn!(
                output_dim = model.output_dim,
                vocab_size,
                "Model output width differs from vocabulary size"
            );
        }

        let fetcher = CodeforcesFetcher::new(config.fetcher_config())
            .context("Building Codeforces HTTP client")?;
        info!(
            api_base = %fetcher.config().api_base,
            scorer = %decoder.scorer().service_address(),
            "Pipeline wired"
        );
        Ok(Self::new(fetcher, FeatureTransformer::new(), decoder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::tests::{mock_model, start_mock_model};
    use data_loader::{Problem, RatingEvent, SubmissionRecord, TokenId, Verdict};
    use pipeline::{DECODE_STEPS, ScorerError};
    use sources::UserHistory;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Fetcher returning a canned outcome
    struct StubFetcher {
        outcome: Result<UserHistory, FetchError>,
    }

    impl HistoryFetcher for StubFetcher {
        async fn fetch(&self, _handle: &str) -> Result<UserHistory, FetchError> {
            self.outcome.clone()
        }
    }

    /// Scorer peaking at a fixed id and counting its calls
    struct CountingScorer {
        peak: usize,
        size: usize,
        calls: Arc<AtomicUsize>,
    }

    impl SequenceScorer for CountingScorer {
        async fn score(&self, _window: &[TokenId]) -> Result<Vec<f32>, ScorerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut scores = vec![0.0; self.size];
            scores[self.peak] = 1.0;
            Ok(scores)
        }
    }

    fn test_vocab() -> Arc<TagVocabulary> {
        Arc::new(
            TagVocabulary::from_entries([("dp1500", 1), ("greedy1500", 2), ("math1200", 3)])
                .unwrap(),
        )
    }

    fn history() -> UserHistory {
        let submission = SubmissionRecord {
            handle: "dave".to_string(),
            problem: Problem {
                contest_id: Some(1700),
                index: Some("B".to_string()),
                name: Some("Sums".to_string()),
                problem_type: Some("PROGRAMMING".to_string()),
                points: None,
                rating: Some(1500),
                tags: vec!["dp".to_string(), "greedy".to_string()],
            },
            verdict: Verdict::Accepted,
            creation_time: 2_000,
        };
        UserHistory {
            handle: "dave".to_string(),
            submissions: vec![submission],
            ratings: vec![RatingEvent {
                timestamp: 1_000,
                new_rating: 1400,
            }],
        }
    }

    fn build_orchestrator(
        outcome: Result<UserHistory, FetchError>,
        peak: usize,
    ) -> (PipelineOrchestrator<StubFetcher, CountingScorer>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let vocab = test_vocab();
        let scorer = CountingScorer {
            peak,
            size: vocab.len(),
            calls: calls.clone(),
        };
        let orchestrator = PipelineOrchestrator::new(
            StubFetcher { outcome },
            FeatureTransformer::new(),
            RecommendationDecoder::new(vocab, scorer),
        );
        (orchestrator, calls)
    }

    // ============================================================================
    // Unit Tests: handle_request
    // ============================================================================

    #[tokio::test]
    async fn test_successful_request_returns_ten_tokens() {
        let (orchestrator, calls) = build_orchestrator(Ok(history()), 2);

        let recommendations = orchestrator.handle_request("dave").await.unwrap();

        assert_eq!(recommendations, vec!["greedy1500".to_string(); DECODE_STEPS]);
        assert_eq!(calls.load(Ordering::SeqCst), DECODE_STEPS);
    }

    #[tokio::test]
    async fn test_blank_handle_is_rejected_before_fetch() {
        let (orchestrator, calls) = build_orchestrator(Ok(history()), 2);

        let err = orchestrator.handle_request("   ").await.unwrap_err();

        assert_eq!(err, OrchestratorError::InvalidHandle);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_history_never_reaches_scorer() {
        let (orchestrator, calls) = build_orchestrator(
            Err(FetchError::EmptyHistory {
                handle: "dave".to_string(),
            }),
            2,
        );

        let err = orchestrator.handle_request("dave").await.unwrap_err();

        assert!(matches!(err, OrchestratorError::Fetch(FetchError::EmptyHistory { .. })));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.is_user_fault());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_handle_maps_to_not_found() {
        let (orchestrator, _) = build_orchestrator(
            Err(FetchError::NoSuchHandle {
                handle: "ghost".to_string(),
                comment: "handles: User with handle ghost not found".to_string(),
            }),
            2,
        );

        let err = orchestrator.handle_request("ghost").await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.user_message().contains("ghost"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_user_fault() {
        let (orchestrator, _) = build_orchestrator(
            Err(FetchError::Transport {
                attempts: 3,
                reason: "connection refused".to_string(),
            }),
            2,
        );

        let err = orchestrator.handle_request("dave").await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(!err.is_user_fault());
    }

    #[tokio::test]
    async fn test_untagged_history_is_empty_after_filter() {
        let mut untagged = history();
        untagged.submissions[0].problem.tags.clear();
        let (orchestrator, calls) = build_orchestrator(Ok(untagged), 2);

        let err = orchestrator.handle_request("dave").await.unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::Transform(TransformError::EmptyAfterFilter { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unmapped_prediction_is_integrity_fault() {
        // Id 0 is padding and has no token
        let (orchestrator, _) = build_orchestrator(Ok(history()), 0);

        let err = orchestrator.handle_request("dave").await.unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::Decode(DecodeError::NoMatchingToken { id: 0, step: 0 })
        ));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_user_fault());
    }

    #[tokio::test]
    async fn test_inspect_history_reports_profile_and_stream() {
        let fetcher = StubFetcher {
            outcome: Ok(history()),
        };

        let report = inspect_history(&fetcher, &FeatureTransformer::new(), "dave")
            .await
            .unwrap();

        assert_eq!(report.profile.len(), 1);
        assert_eq!(report.profile.attempts[0].user_rating_at_attempt, 1400);
        assert_eq!(report.stream.to_strings(), vec!["dp1500", "greedy1500"]);
    }

    // ============================================================================
    // Bootstrap Tests: from_config
    // ============================================================================

    fn write_vocab() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "dp1500 1\ngreedy1500 2\nmath1200 3").unwrap();
        file
    }

    fn config_for(addr: String, vocab_path: std::path::PathBuf) -> Config {
        Config {
            scorer_addr: addr,
            vocab_path,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_from_config_wires_vocab_and_model() {
        let vocab = write_vocab();
        let (addr, handle) = start_mock_model(mock_model(1)).await;

        let orchestrator = ServiceOrchestrator::from_config(&config_for(addr, vocab.path().to_path_buf()))
            .await
            .unwrap();

        assert_eq!(orchestrator.vocab().get_token(2), Some("greedy1500"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_from_config_rejects_window_mismatch() {
        let vocab = write_vocab();
        let mut model = mock_model(1);
        model.max_window = 512;
        let (addr, handle) = start_mock_model(model).await;

        let result = ServiceOrchestrator::from_config(&config_for(addr, vocab.path().to_path_buf())).await;

        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("512"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_from_config_fails_without_vocabulary() {
        let (addr, handle) = start_mock_model(mock_model(1)).await;
        let missing = std::env::temp_dir().join("cf-recs-no-such-vocab.json");

        let result = ServiceOrchestrator::from_config(&config_for(addr, missing)).await;

        assert!(result.is_err());

        handle.abort();
    }
}
