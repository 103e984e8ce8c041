use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::{NotFoundReason, Result, ThreadreelError};
use crate::fetcher::Fetcher;

/// Sent with every request; the upstream site throttles unknown clients.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:134.0) Gecko/20100101 Firefox/134.0";

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Fetching {} failed with status {}", url, status);
            return Err(ThreadreelError::NotFound(NotFoundReason::Unavailable {
                status: status.as_u16(),
            }));
        }

        let body = response.bytes().await?.to_vec();
        Ok(body)
    }
}
