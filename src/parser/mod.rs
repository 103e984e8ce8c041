//! Source adapters: turn a listing or thread page into the domain model.
//!
//! Two markup dialects serve the same content:
//!
//! - [`OldRedditParser`]: the classic server-rendered listing markup
//! - [`RedlibParser`]: the alternative privacy front-end
//!
//! Both produce identical [`PostsPage`] / [`CommentsAggregate`] shapes.
//! Missing sub-nodes leave a field empty instead of failing the page.
//!
//! ```text
//! bytes → Document → Adapter::parse_* → PostsPage | CommentsAggregate
//! ```

mod old_reddit;
mod redlib;

pub use old_reddit::OldRedditParser;
pub use redlib::RedlibParser;

use crate::app::{Result, ThreadreelError};
use crate::domain::{CommentsAggregate, PostsPage};
use crate::html::HtmlNode;

/// Points label used when a comment is too new to show a score.
pub const DEFAULT_COMMENT_POINTS: &str = "1 point";

pub trait PageParser {
    fn parse_posts(&self, root: HtmlNode<'_>) -> PostsPage;

    /// `url` is the comments page address, used as the canonical post URL
    /// for self posts.
    fn parse_comments(&self, root: HtmlNode<'_>, url: &str) -> CommentsAggregate;
}

/// Parser selected once from the `[server] type` setting.
#[derive(Debug, Clone)]
pub enum Adapter {
    OldReddit(OldRedditParser),
    Redlib(RedlibParser),
}

impl Adapter {
    /// Resolve a configuration tag (`old` or `redlib`, case-insensitive).
    pub fn from_tag(tag: &str, base_url: &str) -> Result<Self> {
        match tag.trim().to_lowercase().as_str() {
            "old" => Ok(Adapter::OldReddit(OldRedditParser)),
            "redlib" => Ok(Adapter::Redlib(RedlibParser::new(base_url))),
            _ => Err(ThreadreelError::UnrecognizedAdapter(tag.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Adapter::OldReddit(_) => "old",
            Adapter::Redlib(_) => "redlib",
        }
    }
}

impl PageParser for Adapter {
    fn parse_posts(&self, root: HtmlNode<'_>) -> PostsPage {
        match self {
            Adapter::OldReddit(p) => p.parse_posts(root),
            Adapter::Redlib(p) => p.parse_posts(root),
        }
    }

    fn parse_comments(&self, root: HtmlNode<'_>, url: &str) -> CommentsAggregate {
        match self {
            Adapter::OldReddit(p) => p.parse_comments(root, url),
            Adapter::Redlib(p) => p.parse_comments(root, url),
        }
    }
}

/// First whitespace-delimited token, e.g. `"12"` from `"12 comments"`.
fn first_token(s: &str) -> String {
    s.split_whitespace().next().unwrap_or("").to_string()
}

/// Value of the `after` query parameter in a pagination link.
fn after_cursor(href: &str) -> String {
    let Some((_, query)) = href.split_once('?') else {
        return String::new();
    };

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "after")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn strip_user_prefix(author: &str) -> String {
    author.strip_prefix("u/").unwrap_or(author).to_string()
}

/// `"1"` → `"1 point"`, anything else → `"<n> points"`.
fn points_label(count: &str) -> String {
    if count == "1" {
        format!("{} point", count)
    } else {
        format!("{} points", count)
    }
}
