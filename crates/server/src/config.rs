//! Process configuration read from the environment.

use sources::FetcherConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_API_BASE: &str = "https://codeforces.com/api";
const DEFAULT_SCORER_ADDR: &str = "http://127.0.0.1:50051";
const DEFAULT_MODEL_PATH: &str = "problem_recommender.h5";
const DEFAULT_VOCAB_PATH: &str = "tag_vocabulary.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Root of the Codeforces API
    pub api_base: String,
    /// gRPC address of the model service
    pub scorer_addr: String,
    /// Model artifact handed to the model service at startup
    pub model_path: PathBuf,
    pub vocab_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset or unparsable
    /// values fall back to their defaults.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = lookup("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Self {
            host,
            port,
            log_level,
            api_base: lookup("CODEFORCES_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            scorer_addr: lookup("SCORER_ADDR").unwrap_or_else(|| DEFAULT_SCORER_ADDR.to_string()),
            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
                .into(),
            vocab_path: lookup("VOCAB_PATH")
                .unwrap_or_else(|| DEFAULT_VOCAB_PATH.to_string())
                .into(),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Fetcher settings: production delays against the configured API root.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::default().with_api_base(self.api_base.clone())
    }
}
