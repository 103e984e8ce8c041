pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::{HttpFetcher, USER_AGENT};

/// Source of raw page bytes.
///
/// Implementations report a non-2xx response as
/// `NotFound(NotFoundReason::Unavailable { .. })` and transport failures as
/// `Network`. Nothing is retried.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
