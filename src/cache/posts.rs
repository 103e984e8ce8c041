use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::app::Result;
use crate::cache::file::{file_name, read_entry, sweep_expired, write_entry};
use crate::cache::Cache;
use crate::domain::PostsPage;

/// Listing pages stored flat in the cache root, keyed by listing URL.
#[derive(Debug, Clone)]
pub struct FilePostsCache {
    base_dir: PathBuf,
}

impl FilePostsCache {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(file_name(key))
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Result<PostsPage> {
        read_entry(&self.entry_path(key), now)
    }

    /// Only files directly in the root are posts; subdirectories belong to
    /// other stores and are left alone.
    pub fn clean_at(&self, now: DateTime<Utc>) {
        sweep_expired::<PostsPage>(&self.base_dir, now, false);
    }
}

impl Cache<PostsPage> for FilePostsCache {
    fn get(&self, key: &str) -> Result<PostsPage> {
        self.get_at(key, Utc::now())
    }

    fn put(&self, value: &PostsPage, key: &str) -> Result<()> {
        write_entry(&self.entry_path(key), value)
    }

    fn clean(&self) {
        self.clean_at(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{NotFoundReason, ThreadreelError};
    use crate::domain::Post;
    use chrono::Duration;
    use std::fs;

    fn sample_page(expiry: DateTime<Utc>) -> PostsPage {
        PostsPage {
            posts: vec![Post {
                title: "title".into(),
                author: "author".into(),
                subreddit: "r/subreddit".into(),
                friendly_date: "5 mins ago".into(),
                post_url: "post.url".into(),
                comments_url: "comments.url".into(),
                total_comments: "5".into(),
                total_likes: "10".into(),
            }],
            description: "description".into(),
            subreddit: "subreddit".into(),
            is_home: false,
            after: "t3_after".into(),
            expiry,
        }
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePostsCache::new(dir.path());
        let expected = sample_page(Utc::now() + Duration::minutes(5));

        cache.put(&expected, "https://old.reddit.com/r/rust").unwrap();
        let got = cache.get("https://old.reddit.com/r/rust").unwrap();

        assert_eq!(got, expected);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePostsCache::new(dir.path());

        let err = cache.get("https://old.reddit.com/r/missing").unwrap_err();
        assert!(matches!(
            err,
            ThreadreelError::NotFound(NotFoundReason::NotCached)
        ));
    }

    #[test]
    fn test_get_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePostsCache::new(dir.path());
        fs::write(cache.entry_path("garbage"), "not json").unwrap();

        let err = cache.get("garbage").unwrap_err();
        assert!(matches!(err, ThreadreelError::CannotDecodeCacheFile(_)));
    }

    #[test]
    fn test_expiry_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePostsCache::new(dir.path());
        let expiry = Utc::now() + Duration::minutes(1);
        cache.put(&sample_page(expiry), "key").unwrap();

        assert!(cache.get_at("key", expiry - Duration::milliseconds(1)).is_ok());
        assert!(matches!(
            cache.get_at("key", expiry),
            Err(ThreadreelError::CacheEntryExpired)
        ));
        assert!(matches!(
            cache.get_at("key", expiry + Duration::seconds(1)),
            Err(ThreadreelError::CacheEntryExpired)
        ));
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePostsCache::new(dir.path());
        let expiry = Utc::now() + Duration::minutes(5);

        let mut first = sample_page(expiry);
        first.description = "a much longer description than the second one".into();
        cache.put(&first, "key").unwrap();

        let second = sample_page(expiry);
        cache.put(&second, "key").unwrap();

        assert_eq!(cache.get("key").unwrap(), second);
    }

    #[test]
    fn test_clean_removes_only_expired_root_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePostsCache::new(dir.path());
        let now = Utc::now();

        cache.put(&sample_page(now + Duration::hours(1)), "fresh").unwrap();
        cache.put(&sample_page(now - Duration::hours(1)), "stale").unwrap();
        fs::write(cache.entry_path("broken"), "{").unwrap();

        let nested = dir.path().join("comments").join("rust");
        fs::create_dir_all(&nested).unwrap();
        let nested_stale = nested.join("stale.json");
        fs::write(
            &nested_stale,
            serde_json::to_string(&sample_page(now - Duration::hours(1))).unwrap(),
        )
        .unwrap();

        cache.clean_at(now);

        assert!(cache.entry_path("fresh").exists());
        assert!(!cache.entry_path("stale").exists());
        assert!(cache.entry_path("broken").exists());
        assert!(nested_stale.exists());
    }
}
