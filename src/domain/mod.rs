pub mod comment;
pub mod post;

pub use comment::{Comment, CommentsAggregate};
pub use post::{normalize_subreddit, Post, PostsPage};

use chrono::{DateTime, Utc};

/// A cached value that knows when it goes stale.
pub trait Expiring {
    fn expiry(&self) -> DateTime<Utc>;

    /// Fresh iff `now < expiry`.
    fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry()
    }
}

impl Expiring for PostsPage {
    fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }
}

impl Expiring for CommentsAggregate {
    fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }
}
