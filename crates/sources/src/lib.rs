//! # Sources Crate
//!
//! Upstream history for a competitive-programming handle.
//!
//! ## Components
//!
//! ### HistoryFetcher
//! The capability the rest of the system depends on: given a handle, return
//! the user's submissions and rating changes, or a typed [`FetchError`].
//!
//! ### CodeforcesFetcher
//! The production implementation, backed by the public Codeforces API with
//! bounded retries on the submissions call and a pacing delay before the
//! ratings call.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{CodeforcesFetcher, FetcherConfig, HistoryFetcher};
//!
//! let fetcher = CodeforcesFetcher::new(FetcherConfig::default())?;
//! let history = fetcher.fetch("tourist").await?;
//! println!("{} submissions", history.submissions.len());
//! ```

use std::future::Future;

pub mod codeforces;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use codeforces::{CodeforcesFetcher, FetcherConfig};
pub use error::FetchError;
pub use types::UserHistory;

/// Retrieves the raw history for a handle.
///
/// `Send + Sync` so one fetcher can be shared across concurrent requests.
pub trait HistoryFetcher: Send + Sync {
    fn fetch(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<UserHistory, FetchError>> + Send;
}
