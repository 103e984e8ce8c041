//! Retrieval pipeline: cache → fetch → parse → filter.
//!
//! ```text
//! get_*_posts(url) ──hit──▶ filter ─▶ PostsPage
//!        │miss
//!        ▼
//!     fetch ─▶ Adapter::parse_posts ─▶ stamp expiry ─▶ cache.put ─▶ filter
//! ```
//!
//! Cache errors of any kind are a miss. Fetch and parse errors are
//! returned once; nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Utc};

use crate::app::{NotFoundReason, Result, ThreadreelError};
use crate::cache::{Cache, NoOpCache};
use crate::domain::{CommentsAggregate, PostsPage};
use crate::fetcher::Fetcher;
use crate::filter::PostFilter;
use crate::html::Document;
use crate::parser::{Adapter, PageParser};

/// Appended to comment page requests so whole threads come back at once.
pub const COMMENTS_LIMIT_QUERY: &str = "limit=500";

pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// Which listing a posts page belongs to.
#[derive(Debug, Clone, Copy)]
enum Listing<'a> {
    Home,
    Subreddit(&'a str),
}

impl Listing<'_> {
    fn stamp(&self, page: &mut PostsPage) {
        match self {
            Listing::Home => {
                page.is_home = true;
                page.subreddit.clear();
            }
            Listing::Subreddit(name) => {
                page.is_home = false;
                page.subreddit = name.to_string();
            }
        }
    }
}

pub struct ForumClient {
    base_url: String,
    adapter: Adapter,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    posts_cache: Box<dyn Cache<PostsPage> + Send + Sync>,
    comments_cache: Box<dyn Cache<CommentsAggregate> + Send + Sync>,
    filter: PostFilter,
    cache_ttl: Duration,
}

impl ForumClient {
    /// A client with caching bypassed and no filters.
    pub fn new(base_url: &str, adapter: Adapter, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            adapter,
            fetcher,
            posts_cache: Box::new(NoOpCache),
            comments_cache: Box::new(NoOpCache),
            filter: PostFilter::default(),
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
        }
    }

    pub fn with_posts_cache(mut self, cache: Box<dyn Cache<PostsPage> + Send + Sync>) -> Self {
        self.posts_cache = cache;
        self
    }

    pub fn with_comments_cache(
        mut self,
        cache: Box<dyn Cache<CommentsAggregate> + Send + Sync>,
    ) -> Self {
        self.comments_cache = cache;
        self
    }

    pub fn with_filter(mut self, filter: PostFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn home_url(&self, after: Option<&str>) -> String {
        with_cursor(self.base_url.clone(), after)
    }

    pub fn subreddit_url(&self, subreddit: &str, after: Option<&str>) -> String {
        let name = subreddit.trim().trim_start_matches("r/");
        with_cursor(format!("{}/r/{}", self.base_url, name), after)
    }

    pub fn post_url(&self, post_id: &str) -> String {
        format!("{}/{}", self.base_url, post_id.trim_start_matches('/'))
    }

    pub async fn get_home_posts(&self, after: Option<&str>) -> Result<PostsPage> {
        let url = self.home_url(after);
        self.get_posts(&url, Listing::Home).await
    }

    pub async fn get_subreddit_posts(&self, subreddit: &str, after: Option<&str>) -> Result<PostsPage> {
        let url = self.subreddit_url(subreddit, after);
        let name = subreddit.trim().trim_start_matches("r/");
        self.get_posts(&url, Listing::Subreddit(name)).await
    }

    pub async fn get_post_comments(&self, post_id: &str) -> Result<CommentsAggregate> {
        let url = self.post_url(post_id);
        self.get_comments(&url).await
    }

    pub async fn get_comments(&self, url: &str) -> Result<CommentsAggregate> {
        let total = Instant::now();

        let started = Instant::now();
        let cached = self.comments_cache.get(url);
        tracing::debug!("Comments cache lookup took {} ms", started.elapsed().as_millis());
        match cached {
            Ok(thread) => return Ok(thread),
            Err(e) if e.is_cache_error() => tracing::info!("Comments cache miss for {}: {}", url, e),
            Err(e) => tracing::warn!("Comments cache lookup for {} failed: {}", url, e),
        }

        let request_url = with_query(url, COMMENTS_LIMIT_QUERY);
        let started = Instant::now();
        let body = self.fetcher.fetch(&request_url).await?;
        tracing::debug!("Fetching {} took {} ms", request_url, started.elapsed().as_millis());

        let started = Instant::now();
        let mut thread = {
            let document = Document::parse(&body);
            self.adapter.parse_comments(document.root(), url)
        };
        tracing::debug!(
            "Parsing {} comments took {} ms",
            thread.comments.len(),
            started.elapsed().as_millis()
        );

        thread.expiry = Utc::now() + self.cache_ttl;

        let started = Instant::now();
        if let Err(e) = self.comments_cache.put(&thread, url) {
            tracing::warn!("Could not cache comments for {}: {}", url, e);
        }
        tracing::debug!("Caching comments took {} ms", started.elapsed().as_millis());

        tracing::debug!("Retrieving comments took {} ms", total.elapsed().as_millis());
        Ok(thread)
    }

    /// Sweep expired entries from both stores.
    pub fn clean_cache(&self) {
        let started = Instant::now();
        self.posts_cache.clean();
        self.comments_cache.clean();
        tracing::debug!("Cleaning cache took {} ms", started.elapsed().as_millis());
    }

    async fn get_posts(&self, url: &str, listing: Listing<'_>) -> Result<PostsPage> {
        let total = Instant::now();

        let started = Instant::now();
        let cached = self.posts_cache.get(url);
        tracing::debug!("Posts cache lookup took {} ms", started.elapsed().as_millis());
        match cached {
            Ok(mut page) => {
                listing.stamp(&mut page);
                return Ok(self.filter.apply(page));
            }
            Err(e) if e.is_cache_error() => tracing::info!("Posts cache miss for {}: {}", url, e),
            Err(e) => tracing::warn!("Posts cache lookup for {} failed: {}", url, e),
        }

        let mut page = self.fetch_posts(url).await?;
        listing.stamp(&mut page);
        page.expiry = Utc::now() + self.cache_ttl;

        let started = Instant::now();
        if let Err(e) = self.posts_cache.put(&page, url) {
            tracing::warn!("Could not cache posts for {}: {}", url, e);
        }
        tracing::debug!("Caching posts took {} ms", started.elapsed().as_millis());

        let started = Instant::now();
        let page = self.filter.apply(page);
        tracing::debug!("Filtering posts took {} ms", started.elapsed().as_millis());

        tracing::debug!("Retrieving posts took {} ms", total.elapsed().as_millis());
        Ok(page)
    }

    async fn fetch_posts(&self, url: &str) -> Result<PostsPage> {
        let started = Instant::now();
        let body = self.fetcher.fetch(url).await?;
        tracing::debug!("Fetching {} took {} ms", url, started.elapsed().as_millis());

        let started = Instant::now();
        let page = {
            let document = Document::parse(&body);
            self.adapter.parse_posts(document.root())
        };
        tracing::debug!(
            "Parsing {} posts took {} ms",
            page.posts.len(),
            started.elapsed().as_millis()
        );

        // Unknown listings redirect to a generic page instead of a 404.
        if page.posts.is_empty() {
            tracing::warn!("No posts found at {}", url);
            return Err(ThreadreelError::NotFound(NotFoundReason::NoPosts));
        }

        Ok(page)
    }
}

fn with_query(url: &str, query: &str) -> String {
    if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

fn with_cursor(url: String, after: Option<&str>) -> String {
    match after.filter(|a| !a.is_empty()) {
        Some(after) => with_query(&url, &format!("after={}", urlencoding::encode(after))),
        None => url,
    }
}
