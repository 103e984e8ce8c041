use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{Result, ThreadreelError};
use crate::cache::{FileCommentsCache, FilePostsCache, NoOpCache, COMMENTS_DIR_NAME};
use crate::client::ForumClient;
use crate::config::Config;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::filter::PostFilter;
use crate::parser::Adapter;

pub struct AppContext {
    pub config: Config,
    pub client: ForumClient,
}

impl AppContext {
    /// Wire the client from `config`, caching under the user cache directory.
    pub fn new(config: Config) -> Result<Self> {
        let cache_dir = Self::default_cache_dir()?;
        Self::with_cache_dir(config, &cache_dir)
    }

    pub fn with_cache_dir(config: Config, cache_dir: &Path) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(
            Duration::from_secs(config.client.timeout_seconds),
        )?);
        Self::with_fetcher(config, cache_dir, fetcher)
    }

    pub fn with_fetcher(
        config: Config,
        cache_dir: &Path,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Result<Self> {
        let base_url = config.server.base_url();
        url::Url::parse(&base_url)?;

        let adapter = Adapter::from_tag(&config.server.server_type, &base_url)?;
        tracing::debug!("Using {} markup from {}", adapter.name(), base_url);

        let filter = PostFilter::new(&config.filter.keywords, &config.filter.subreddits);

        let mut client = ForumClient::new(&base_url, adapter, fetcher)
            .with_filter(filter)
            .with_cache_ttl(chrono::Duration::seconds(config.client.cache_ttl_seconds));

        if config.core.bypass_cache {
            tracing::info!("Cache bypassed");
            client = client
                .with_posts_cache(Box::new(NoOpCache))
                .with_comments_cache(Box::new(NoOpCache));
        } else {
            client = client
                .with_posts_cache(Box::new(FilePostsCache::new(cache_dir)))
                .with_comments_cache(Box::new(FileCommentsCache::new(
                    cache_dir.join(COMMENTS_DIR_NAME),
                )));
        }

        Ok(Self { config, client })
    }

    fn default_cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| ThreadreelError::Config("Could not find cache directory".into()))?;
        Ok(cache_dir.join("threadreel"))
    }
}
