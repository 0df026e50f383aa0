//! Server crate for the Codeforces tag recommender.
//!
//! This crate contains the orchestrator that coordinates the pipeline
//! stages, the gRPC adapter for the model service, process configuration
//! and the HTTP routes.

pub mod config;
pub mod http;
pub mod orchestrator;
pub mod scorer;

pub use config::Config;
pub use http::router;
pub use orchestrator::{
    OrchestratorError, PipelineOrchestrator, ServiceOrchestrator, StreamReport, inspect_history,
};
pub use scorer::GrpcSequenceScorer;
