use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single reply. The tree shape is carried only by `depth`: a comment
/// is a child of the closest preceding comment with `depth - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub points: String,
    pub timestamp: String,
    pub depth: usize,
}

impl Comment {
    pub fn indented_text(&self) -> String {
        indent(&self.text, self.depth)
    }

    pub fn byline(&self) -> String {
        let line = format!("{}  by {}  {}", self.points, self.author, self.timestamp);
        indent(&line, self.depth)
    }
}

/// A post with its flattened comment tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentsAggregate {
    pub post_title: String,
    pub post_author: String,
    pub subreddit: String,
    pub post_points: String,
    /// Self-post body, or a one-line rendering of the linked URL.
    pub post_text: String,
    /// Linked URL for link posts, the comments page itself for self posts.
    pub post_url: String,
    pub post_timestamp: String,
    pub expiry: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

/// Prefix every line with two spaces per level.
fn indent(s: &str, depth: usize) -> String {
    if depth == 0 {
        return s.to_string();
    }
    let pad = "  ".repeat(depth);
    s.lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}
