use crate::domain::{normalize_subreddit, Post, PostsPage};

/// Drops posts by title keyword or by subreddit, both case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    keywords: Vec<String>,
    subreddits: Vec<String>,
}

impl PostFilter {
    pub fn new<K, S>(keywords: K, subreddits: S) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .filter(|k| !k.as_ref().trim().is_empty())
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            subreddits: subreddits
                .into_iter()
                .filter(|s| !s.as_ref().trim().is_empty())
                .map(|s| normalize_subreddit(s.as_ref().trim()).to_lowercase())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty() && self.subreddits.is_empty()
    }

    pub fn is_blocked(&self, post: &Post) -> bool {
        let title = post.title.to_lowercase();
        if let Some(keyword) = self.keywords.iter().find(|k| title.contains(k.as_str())) {
            tracing::debug!("Filtering post {:?} (keyword {:?})", post.title, keyword);
            return true;
        }

        let subreddit = normalize_subreddit(post.subreddit.trim()).to_lowercase();
        if self.subreddits.contains(&subreddit) {
            tracing::debug!("Filtering post {:?} (subreddit {})", post.title, post.subreddit);
            return true;
        }

        false
    }

    /// Keep the unblocked posts in their original order.
    pub fn apply(&self, mut page: PostsPage) -> PostsPage {
        if !self.is_empty() {
            page.posts.retain(|post| !self.is_blocked(post));
        }
        page
    }
}
