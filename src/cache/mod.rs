//! TTL file cache for parsed pages.
//!
//! ```text
//! <cache dir>/
//!   <encoded listing url>.json          posts, flat
//!   comments/<subreddit>/<encoded url>.json
//! ```
//!
//! Entries carry their own `expiry`; the cache only compares it to the
//! clock. There is no locking and no atomic rename: last writer wins.

mod comments;
mod file;
mod noop;
mod posts;

pub use comments::FileCommentsCache;
pub use file::CACHE_FILE_EXTENSION;
pub use noop::NoOpCache;
pub use posts::FilePostsCache;

use crate::app::Result;

/// Directory under the cache root that holds comment threads.
pub const COMMENTS_DIR_NAME: &str = "comments";

pub trait Cache<T> {
    /// Fails with `NotFound`, `CannotOpenCacheFile`, `CannotDecodeCacheFile`
    /// or `CacheEntryExpired`; callers treat all of them as a miss.
    fn get(&self, key: &str) -> Result<T>;

    fn put(&self, value: &T, key: &str) -> Result<()>;

    /// Drop expired entries. Never fails; problems are logged.
    fn clean(&self);
}
