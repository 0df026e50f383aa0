//! gRPC-backed [`SequenceScorer`].

use data_loader::TokenId;
use ml_client::MLScorerClient;
use pipeline::{ScorerError, SequenceScorer};
use tracing::warn;

/// Scores windows by calling the model service.
#[derive(Clone)]
pub struct GrpcSequenceScorer {
    client: MLScorerClient,
}

impl GrpcSequenceScorer {
    pub fn new(client: MLScorerClient) -> Self {
        Self { client }
    }

    pub fn service_address(&self) -> &str {
        self.client.service_address()
    }
}

impl SequenceScorer for GrpcSequenceScorer {
    async fn score(&self, window: &[TokenId]) -> Result<Vec<f32>, ScorerError> {
        // Clones share the channel; each call gets its own request slot
        let mut client = self.client.clone();
        client.score_sequence(window.to_vec()).await.map_err(|e| {
            warn!(addr = %self.client.service_address(), error = %e, "Scoring call failed");
            ScorerError::new(e.to_string())
        })
    }
}
