use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One submission in a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub friendly_date: String,
    pub post_url: String,
    pub comments_url: String,
    pub total_comments: String,
    pub total_likes: String,
}

impl Post {
    /// `<likes>  <title>` line shown in listings.
    pub fn headline(&self) -> String {
        format!(" {}  {}", self.total_likes, self.title)
    }

    pub fn byline(&self) -> String {
        let mut line = String::new();
        if !self.subreddit.trim().is_empty() {
            line.push_str(&self.subreddit);
            line.push_str("  ");
        }

        let comments = if self.total_comments.trim().is_empty() {
            "0"
        } else {
            self.total_comments.as_str()
        };
        line.push_str(&format!("{} comments  ", comments));
        line.push_str(&format!("submitted {} by {}", self.friendly_date, self.author));
        line
    }
}

/// A page of a listing, either the front page or a single subreddit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsPage {
    pub posts: Vec<Post>,
    pub description: String,
    /// Empty for the front page.
    pub subreddit: String,
    pub is_home: bool,
    /// Cursor for the next page; empty when there is none.
    pub after: String,
    pub expiry: DateTime<Utc>,
}

/// `news` and `r/news` both become `r/news`.
pub fn normalize_subreddit(subreddit: &str) -> String {
    if subreddit.starts_with("r/") {
        subreddit.to_string()
    } else {
        format!("r/{}", subreddit)
    }
}
