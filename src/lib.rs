//! # threadreel
//!
//! A terminal-first reader for Reddit listings and comment threads.
//!
//! ## Architecture
//!
//! threadreel follows a pipeline architecture:
//!
//! ```text
//! Cache ─hit─▶ Filter ─▶ CLI
//!   │miss
//!   ▼
//! Fetcher → Document → Adapter → Cache write → Filter ─▶ CLI
//! ```
//!
//! - [`fetcher`]: HTTP client sending a browser User-Agent
//! - [`html`]: Tolerant HTML queries by tag and class
//! - [`parser`]: Old Reddit and Redlib markup to domain models
//! - [`cache`]: TTL-stamped JSON files on disk
//!
//! ## Quick Start
//!
//! ```bash
//! # Front page
//! threadreel home
//!
//! # A subreddit, second page
//! threadreel subreddit rust --after t3_abc123
//!
//! # A thread
//! threadreel comments https://old.reddit.com/r/rust/comments/abc123/title/
//!
//! # Drop expired cache entries
//! threadreel clean
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires configuration into a
/// ready [`ForumClient`](client::ForumClient).
pub mod app;

/// TTL disk cache for listings and threads.
///
/// - [`Cache`](cache::Cache): get / put / clean
/// - [`FilePostsCache`](cache::FilePostsCache): flat directory of listings
/// - [`FileCommentsCache`](cache::FileCommentsCache): threads partitioned by subreddit
/// - [`NoOpCache`](cache::NoOpCache): bypass mode
pub mod cache;

/// Command-line interface using clap.
///
/// - `home [--after <cursor>]`
/// - `subreddit <name> [--after <cursor>]`
/// - `comments <url>`
/// - `post <id>`
/// - `clean`
pub mod cli;

/// Retrieval pipeline tying cache, fetcher, adapter and filter together.
pub mod client;

/// Configuration loaded from `~/.config/threadreel/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Post`](domain::Post) and [`PostsPage`](domain::PostsPage)
/// - [`Comment`](domain::Comment) and [`CommentsAggregate`](domain::CommentsAggregate)
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Keyword and subreddit post filter.
pub mod filter;

/// HTML document queries and body rendering.
pub mod html;

/// Markup adapters for the supported front-ends.
pub mod parser;
