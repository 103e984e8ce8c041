use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::app::Result;
use crate::cache::file::{file_name, read_entry, remove_empty_dirs, sweep_expired, write_entry};
use crate::cache::Cache;
use crate::domain::CommentsAggregate;

static SUBREDDIT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/r/([^/?#]+)").expect("static regex is valid"));

/// Comment threads partitioned into one directory per subreddit.
#[derive(Debug, Clone)]
pub struct FileCommentsCache {
    base_dir: PathBuf,
}

impl FileCommentsCache {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// `<base>/<subreddit>/<encoded url>.json`. URLs without an `/r/<name>`
    /// segment land directly in the base directory.
    pub fn entry_path(&self, url: &str) -> PathBuf {
        match subreddit_from_url(url) {
            Some(subreddit) => self.base_dir.join(subreddit).join(file_name(url)),
            None => self.base_dir.join(file_name(url)),
        }
    }

    pub fn get_at(&self, url: &str, now: DateTime<Utc>) -> Result<CommentsAggregate> {
        read_entry(&self.entry_path(url), now)
    }

    pub fn clean_at(&self, now: DateTime<Utc>) {
        sweep_expired::<CommentsAggregate>(&self.base_dir, now, true);
        remove_empty_dirs(&self.base_dir);
    }
}

impl Cache<CommentsAggregate> for FileCommentsCache {
    fn get(&self, key: &str) -> Result<CommentsAggregate> {
        self.get_at(key, Utc::now())
    }

    fn put(&self, value: &CommentsAggregate, key: &str) -> Result<()> {
        write_entry(&self.entry_path(key), value)
    }

    fn clean(&self) {
        self.clean_at(Utc::now());
    }
}

/// Name from the first `/r/<name>` segment. `.` and `..` are not names.
pub fn subreddit_from_url(url: &str) -> Option<&str> {
    SUBREDDIT_SEGMENT
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| *name != "." && *name != "..")
}
