//! Client for the model-serving process.
//!
//! The trained sequence model runs in a separate process exposed over gRPC.
//! This crate wraps the generated client and handles:
//! - Connection management to the model service
//! - Asking the service to load the model artifact at startup
//! - Sending token-id windows and receiving per-id scores
//! - Translating RPC failures into [`MLClientError`]

use anyhow::{Context, Result};
use thiserror::Error;
use tonic::transport::Channel;
use tracing::{debug, error, info};

// Include the generated protobuf code
pub mod scorer {
    tonic::include_proto!("scorer");
}

use scorer::{
    model_service_client::ModelServiceClient as GrpcModelServiceClient, LoadModelRequest,
    ScoreRequest,
};

pub use scorer::ModelInfo;

/// Errors that can occur when interacting with the model service
#[derive(Error, Debug)]
pub enum MLClientError {
    #[error("Failed to connect to model service: {0}")]
    ConnectionError(String),

    #[error("Failed to load model '{path}': {reason}")]
    LoadError { path: String, reason: String },

    #[error("Failed to score window: {0}")]
    ScoringError(String),

    #[error("Invalid response from model service: {0}")]
    InvalidResponse(String),
}

/// Client for the model service.
///
/// Cloning is cheap: clones share the underlying channel, so each request
/// can take its own copy instead of locking a shared client.
#[derive(Clone)]
pub struct MLScorerClient {
    client: GrpcModelServiceClient<Channel>,
    service_addr: String,
}

impl MLScorerClient {
    /// Connect to the model service.
    ///
    /// # Arguments
    /// * `addr` - Address of the gRPC service (e.g., "http://localhost:50051")
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        info!("Connecting to model service at {}", addr);

        let channel = Channel::from_shared(addr.clone())
            .context("Creating channel from address")?
            .connect()
            .await
            .map_err(|e| MLClientError::ConnectionError(e.to_string()))
            .context("Connecting to model service")?;

        let client = GrpcModelServiceClient::new(channel);
        Ok(MLScorerClient {
            client,
            service_addr: addr,
        })
    }

    /// Ask the service to load the model artifact at `model_path`.
    ///
    /// Returns the window length and output width the loaded model reports.
    pub async fn load_model(&mut self, model_path: &str) -> Result<ModelInfo, MLClientError> {
        info!("Loading model from {}", model_path);
        let request = tonic::Request::new(LoadModelRequest {
            model_path: model_path.to_string(),
        });

        let response = self.client.load_model(request).await.map_err(|e| {
            error!("gRPC error while loading model: {}", e);
            MLClientError::LoadError {
                path: model_path.to_string(),
                reason: e.message().to_string(),
            }
        })?;

        let info = response.into_inner();
        info!(
            max_window = info.max_window,
            output_dim = info.output_dim,
            "Model loaded"
        );
        Ok(info)
    }

    /// Score one window of token ids.
    ///
    /// # Returns
    /// One score per vocabulary id; index `i` scores id `i` as the next token
    pub async fn score_sequence(&mut self, window: Vec<u32>) -> Result<Vec<f32>, MLClientError> {
        debug!("Scoring window of {} ids", window.len());
        let request = tonic::Request::new(ScoreRequest { window });

        let response = self.client.score(request).await.map_err(|e| {
            error!("gRPC error while scoring window: {}", e);
            MLClientError::ScoringError(e.to_string())
        })?;

        let scores = response.into_inner().scores;
        if scores.is_empty() {
            error!("Model service returned no scores");
            return Err(MLClientError::InvalidResponse(
                "empty score vector".into(),
            ));
        }
        Ok(scores)
    }

    /// Get the address of the model service this client is connected to.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}
