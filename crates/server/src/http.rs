//! HTTP surface: `POST /recommend` (alias `/predict`) and `GET /health`.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, warn};

use pipeline::SequenceScorer;
use sources::HistoryFetcher;

use crate::orchestrator::{OrchestratorError, PipelineOrchestrator};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub handle: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendResponse {
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        if self.is_user_fault() {
            warn!(error = %self, "Request rejected");
        } else {
            error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Build the application router around a shared orchestrator.
pub fn router<F, S>(orchestrator: Arc<PipelineOrchestrator<F, S>>) -> Router
where
    F: HistoryFetcher + 'static,
    S: SequenceScorer + 'static,
{
    Router::new()
        .route("/recommend", post(recommend::<F, S>))
        .route("/predict", post(recommend::<F, S>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(orchestrator)
}

async fn recommend<F, S>(
    State(orchestrator): State<Arc<PipelineOrchestrator<F, S>>>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Response
where
    F: HistoryFetcher + 'static,
    S: SequenceScorer + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "Malformed request body");
            let body = ErrorResponse {
                error: rejection.body_text(),
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match orchestrator.handle_request(&request.handle).await {
        Ok(recommendations) => Json(RecommendResponse { recommendations }).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
