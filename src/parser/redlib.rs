use url::Url;

use crate::domain::{Comment, CommentsAggregate, Post, PostsPage};
use crate::html::{collapse_blank_lines, hyperlink, render_node, HtmlNode};
use crate::parser::{
    after_cursor, first_token, points_label, strip_user_prefix, PageParser, DEFAULT_COMMENT_POINTS,
};

/// Parser for the alternative front-end markup (`div.post` containers,
/// `div.thread` / `blockquote.replies` comment trees).
///
/// Links in this dialect are site-relative, so the parser needs the base
/// URL to make them absolute.
#[derive(Debug, Clone)]
pub struct RedlibParser {
    base_url: String,
}

impl RedlibParser {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    fn absolute_url(&self, href: &str) -> Option<String> {
        let joined = Url::parse(&self.base_url).and_then(|base| base.join(href));
        match joined {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::debug!("Could not build url from {}: {}", href, e);
                None
            }
        }
    }

    fn parse_post(&self, container: HtmlNode<'_>) -> Post {
        let mut post = Post::default();

        for node in container.descendants() {
            if node.matches("h2", &["post_title"]) {
                for link in node.find_children("a", &[]) {
                    post.title = link.text().to_string();
                    if let Some(url) = self.absolute_url(link.attr("href")) {
                        post.post_url = url.clone();
                        post.comments_url = url;
                    }
                }
            } else if node.matches("a", &["post_author"]) {
                post.author = strip_user_prefix(node.text());
            } else if node.matches("a", &["post_subreddit"]) {
                post.subreddit = node.text().to_string();
            } else if node.matches("span", &["created"]) {
                post.friendly_date = node.text().to_string();
            } else if node.matches("a", &["post_comments"]) {
                if let Some(url) = self.absolute_url(node.attr("href")) {
                    post.comments_url = url;
                }
                post.total_comments = first_token(node.text());
                if post.total_comments.is_empty() {
                    post.total_comments = first_token(node.attr("title"));
                }
            } else if node.matches("div", &["post_score"]) {
                post.total_likes = node.text().trim().to_string();
            }
        }

        post
    }

    fn collect_comment(&self, node: HtmlNode<'_>, depth: usize, out: &mut Vec<Comment>) {
        if node.has_classes(&["deleted"]) {
            return;
        }

        out.push(self.parse_comment(node, depth));

        let replies = node
            .find_child("details", &["comment_right"])
            .and_then(|right| right.find_child("blockquote", &["replies"]));
        if let Some(replies) = replies {
            for reply in replies.find_children("div", &["comment"]) {
                self.collect_comment(reply, depth + 1, out);
            }
        }
    }

    /// Reads only the comment's own nodes; everything under
    /// `blockquote.replies` belongs to the replies.
    fn parse_comment(&self, node: HtmlNode<'_>, depth: usize) -> Comment {
        let score = node
            .find_child("div", &["comment_left"])
            .and_then(|left| left.find_child("p", &["comment_score"]));
        let points = match score {
            Some(score) if score.attr("title") != "Hidden" => points_label(score.text().trim()),
            _ => DEFAULT_COMMENT_POINTS.to_string(),
        };

        let mut comment = Comment {
            points,
            depth,
            ..Default::default()
        };

        let Some(right) = node.find_child("details", &["comment_right"]) else {
            return comment;
        };

        if let Some(summary) = right.find_child("summary", &[]) {
            if let Some(author) = summary.find_descendant("a", &["comment_author"]) {
                comment.author = strip_user_prefix(author.text());
            }

            if let Some(created) = summary.find_descendant("a", &["created"]) {
                comment.timestamp = created.text().to_string();
            }
        }

        let body = right
            .find_child("div", &["comment_body"])
            .and_then(|body| body.find_descendant("div", &["md"]));
        if let Some(body) = body {
            comment.text = collapse_blank_lines(render_node(body).trim());
        }

        comment
    }

    fn post_content(&self, main: HtmlNode<'_>) -> (String, String) {
        let self_text = main
            .find_descendant("div", &["post_body"])
            .and_then(|body| body.find_descendant("div", &["md"]));
        if let Some(md) = self_text {
            return (collapse_blank_lines(&render_node(md)), String::new());
        }

        if let Some(link) = main.find_descendant_by_id("a", "post_url") {
            let url = link.attr("href");
            return (format!("{}\n\n", hyperlink(url)), url.to_string());
        }

        (String::new(), String::new())
    }
}

impl PageParser for RedlibParser {
    fn parse_posts(&self, root: HtmlNode<'_>) -> PostsPage {
        let mut page = PostsPage::default();

        for container in root.find_descendants("div", &["post"]) {
            if container.has_classes(&["promoted"]) {
                continue;
            }
            page.posts.push(self.parse_post(container));
        }

        if let Some(description) = root.find_descendant_by_id("p", "sub_description") {
            page.description = description.text().to_string();
        }

        page.after = next_page_link(root)
            .map(|a| after_cursor(a.attr("href")))
            .unwrap_or_default();

        page
    }

    fn parse_comments(&self, root: HtmlNode<'_>, url: &str) -> CommentsAggregate {
        let mut thread = CommentsAggregate {
            post_title: page_title(root),
            post_url: url.to_string(),
            ..Default::default()
        };

        let Some(main) = root.find_descendant("main", &[]) else {
            return thread;
        };

        if let Some(header) = main.find_descendant("div", &["post", "highlighted"]) {
            if let Some(author) = header.find_descendant("a", &["post_author"]) {
                thread.post_author = strip_user_prefix(author.text());
            }
            if let Some(created) = header.find_descendant("span", &["created"]) {
                thread.post_timestamp = created.text().to_string();
            }
            if let Some(subreddit) = header.find_descendant("a", &["post_subreddit"]) {
                thread.subreddit = subreddit.text().to_string();
            }
        }

        if let Some(score) = main.find_descendant("div", &["post_score"]) {
            thread.post_points = score.text().trim().to_string();
        }

        for top in main.find_descendants("div", &["thread"]) {
            for comment in top.find_children("div", &["comment"]) {
                self.collect_comment(comment, 0, &mut thread.comments);
            }
        }

        let (post_text, post_url) = self.post_content(main);
        thread.post_text = post_text;
        if !post_url.is_empty() {
            thread.post_url = post_url;
        }

        thread
    }
}

/// The `<title>` carries a ` - r/<sub>` suffix.
fn page_title(root: HtmlNode<'_>) -> String {
    let Some(title) = root.find_descendant("title", &[]) else {
        return String::new();
    };

    let text = title.text();
    match text.find("- r/") {
        Some(index) => text[..index].trim().to_string(),
        None => text.to_string(),
    }
}

fn next_page_link(root: HtmlNode<'_>) -> Option<HtmlNode<'_>> {
    let has_cursor = |a: &HtmlNode<'_>| a.attr("href").contains("after=");

    root.find_descendant_by_id("div", "nav")
        .and_then(|nav| nav.find_descendants("a", &[]).find(has_cursor))
        .or_else(|| {
            root.find_descendant("footer", &[])
                .and_then(|footer| footer.find_descendants("a", &[]).find(has_cursor))
        })
}
