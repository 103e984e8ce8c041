use crate::domain::{Comment, CommentsAggregate, Post, PostsPage};
use crate::html::{collapse_blank_lines, hyperlink, render_node, HtmlNode};
use crate::parser::{after_cursor, first_token, PageParser, DEFAULT_COMMENT_POINTS};

/// Parser for the classic listing markup (`div.thing` containers).
#[derive(Debug, Clone, Copy, Default)]
pub struct OldRedditParser;

impl PageParser for OldRedditParser {
    fn parse_posts(&self, root: HtmlNode<'_>) -> PostsPage {
        let mut page = PostsPage::default();

        for thing in root.find_descendants("div", &["thing"]) {
            if is_promoted(thing) {
                continue;
            }
            page.posts.push(self.parse_post(thing));
        }

        page.description = root
            .find_descendants("meta", &[])
            .filter(|meta| meta.attr("name") == "description")
            .last()
            .map(|meta| meta.attr("content").to_string())
            .unwrap_or_default();

        page.after = root
            .find_descendant("span", &["next-button"])
            .and_then(|span| span.find_child("a", &[]))
            .map(|a| after_cursor(a.attr("href")))
            .unwrap_or_default();

        page
    }

    fn parse_comments(&self, root: HtmlNode<'_>, url: &str) -> CommentsAggregate {
        let link_listing = root.find_descendant("div", &["sitetable", "linklisting"]);

        let mut comments = Vec::new();
        self.collect_comments(root, 0, &mut comments);

        let (post_text, post_url) = self.post_content(root, link_listing);

        CommentsAggregate {
            post_title: post_title(root),
            post_author: link_listing
                .and_then(|l| l.find_descendant("a", &["author"]))
                .map(|a| a.text().to_string())
                .unwrap_or_default(),
            subreddit: root
                .find_descendant("span", &["pagename", "redditname"])
                .and_then(|span| span.find_descendant("a", &[]))
                .map(|a| a.text().to_string())
                .unwrap_or_default(),
            post_points: link_listing.map(post_points).unwrap_or_default(),
            post_text,
            post_url: if post_url.is_empty() {
                url.to_string()
            } else {
                post_url
            },
            post_timestamp: link_listing
                .and_then(|l| l.find_descendant("time", &["live-timestamp"]))
                .map(|t| t.text().to_string())
                .unwrap_or_default(),
            comments,
            ..Default::default()
        }
    }
}

impl OldRedditParser {
    fn parse_post(&self, thing: HtmlNode<'_>) -> Post {
        let mut post = Post::default();

        for node in thing.descendants() {
            if node.matches("a", &["title"]) {
                post.title = node.text().to_string();
                post.post_url = node.attr("href").to_string();
            } else if node.matches("a", &["author"]) {
                post.author = node.text().to_string();
            } else if node.matches("a", &["subreddit"]) {
                post.subreddit = node.text().to_string();
            } else if node.matches("time", &["live-timestamp"]) {
                post.friendly_date = node.text().to_string();
            } else if node.matches("a", &["comments"]) {
                post.comments_url = node.attr("href").to_string();
                post.total_comments = first_token(node.text());
            } else if node.matches("div", &["likes"]) {
                post.total_likes = node.text().to_string();
            }
        }

        post
    }

    /// Depth-first walk of a comment listing. Deleted comments are dropped
    /// together with their replies.
    fn collect_comments(&self, node: HtmlNode<'_>, depth: usize, out: &mut Vec<Comment>) {
        let listing = node
            .find_descendant("div", &["sitetable", "nestedlisting"])
            .or_else(|| node.find_descendant("div", &["sitetable", "listing"]));
        let Some(listing) = listing else {
            return;
        };

        for thing in listing.find_children("div", &["thing", "comment"]) {
            if thing.has_classes(&["deleted"]) {
                continue;
            }

            let Some(entry) = thing.find_child("div", &["entry"]) else {
                continue;
            };
            out.push(self.parse_comment(entry, depth));

            if let Some(child) = thing.find_child("div", &["child"]) {
                self.collect_comments(child, depth + 1, out);
            }
        }
    }

    fn parse_comment(&self, entry: HtmlNode<'_>, depth: usize) -> Comment {
        let mut comment = Comment {
            depth,
            ..Default::default()
        };

        if let Some(tagline) = entry.find_child("p", &["tagline"]) {
            if let Some(author) = tagline.find_child("a", &["author"]) {
                comment.author = author.text().to_string();
            }

            comment.points = tagline
                .find_child("span", &["score", "likes"])
                .map(|s| s.text().to_string())
                .unwrap_or_else(|| DEFAULT_COMMENT_POINTS.to_string());

            if let Some(time) = tagline.find_child("time", &["live-timestamp"]) {
                comment.timestamp = time.text().to_string();
            }
        }

        if let Some(usertext) = entry.find_child("form", &["usertext"]) {
            comment.text = collapse_blank_lines(render_node(usertext).trim());
        }

        comment
    }

    /// Self posts yield their body and no URL; link posts yield a rendered
    /// link and the external URL.
    fn post_content(&self, root: HtmlNode<'_>, link_listing: Option<HtmlNode<'_>>) -> (String, String) {
        if let Some(md) = link_listing.and_then(|l| l.find_descendant("div", &["md"])) {
            return (collapse_blank_lines(&render_node(md)), String::new());
        }

        let link = root
            .find_descendant("div", &["entry", "unvoted"])
            .and_then(|entry| entry.find_descendant("a", &["title"]));
        if let Some(link) = link {
            let url = link.attr("href");
            return (format!("{}\n\n", hyperlink(url)), url.to_string());
        }

        (String::new(), String::new())
    }
}

fn is_promoted(thing: HtmlNode<'_>) -> bool {
    thing.has_classes(&["promoted"]) || thing.has_classes(&["promotedlink"])
}

fn post_title(root: HtmlNode<'_>) -> String {
    root.find_descendants("meta", &[])
        .find(|meta| meta.attr("property") == "og:title")
        .map(|meta| meta.attr("content").to_string())
        .unwrap_or_default()
}

fn post_points(link_listing: HtmlNode<'_>) -> String {
    link_listing
        .find_descendant("div", &["score", "likes"])
        .or_else(|| link_listing.find_descendant("div", &["score", "unvoted"]))
        .or_else(|| link_listing.find_descendant("div", &["score"]))
        .map(|score| score.text().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::Document;

    const LISTING: &str = r#"<html><head>
        <meta name="description" content="The front page of the internet">
    </head><body>
    <div id="siteTable" class="sitetable linklisting">
        <div class="thing link promoted promotedlink">
            <a class="title" href="https://ads.example.com">Buy things</a>
            <a class="author">advertiser</a>
        </div>
        <div class="thing link">
            <div class="score likes">120</div>
            <a class="title" href="https://blog.rust-lang.org/2.0">Rust 2.0 announced</a>
            <p class="tagline">submitted <time class="live-timestamp">3 hours ago</time>
                by <a class="author">ferris</a> to <a class="subreddit">r/rust</a></p>
            <a class="comments" href="https://old.reddit.com/r/rust/comments/abc/rust_20/">42 comments</a>
        </div>
        <div class="thing link self">
            <div class="score likes">7</div>
            <a class="title" href="/r/golang/comments/def/question/">A question</a>
            <p class="tagline"><time class="live-timestamp">1 day ago</time>
                <a class="author">gopher</a> <a class="subreddit">r/golang</a></p>
            <a class="comments" href="https://old.reddit.com/r/golang/comments/def/question/">comment</a>
        </div>
    </div>
    <div class="nav-buttons"><span class="nextprev">
        <span class="next-button"><a href="https://old.reddit.com/?count=25&amp;after=t3_def">next</a></span>
    </span></div>
    </body></html>"#;

    const THREAD: &str = r#"<html><head>
        <meta property="og:title" content="Rust 2.0 announced">
    </head><body>
    <span class="pagename redditname"><a href="/r/rust/">rust</a></span>
    <div class="sitetable linklisting">
        <div class="thing link self">
            <div class="score unvoted">120</div>
            <div class="entry unvoted">
                <a class="title" href="/r/rust/comments/abc/rust_20/">Rust 2.0 announced</a>
                <p class="tagline"><time class="live-timestamp">3 hours ago</time> by <a class="author">ferris</a></p>
                <form class="usertext"><div class="usertext-body"><div class="md"><p>First line</p><p></p><p></p><p></p><p>Last line</p></div></div></form>
            </div>
        </div>
    </div>
    <div class="commentarea">
    <div class="sitetable nestedlisting">
        <div class="thing comment">
            <div class="entry unvoted">
                <p class="tagline"><a class="author">alice</a><span class="score likes">5 points</span><time class="live-timestamp">2 hours ago</time></p>
                <form class="usertext"><div class="md"><p>top one</p></div></form>
            </div>
            <div class="child"><div class="sitetable listing">
                <div class="thing comment">
                    <div class="entry unvoted">
                        <p class="tagline"><a class="author">bob</a><time class="live-timestamp">1 hour ago</time></p>
                        <form class="usertext"><div class="md"><p>reply</p></div></form>
                    </div>
                    <div class="child"><div class="sitetable listing">
                        <div class="thing comment">
                            <div class="entry unvoted">
                                <p class="tagline"><a class="author">carol</a><span class="score likes">2 points</span></p>
                                <form class="usertext"><div class="md"><p>deep reply</p></div></form>
                            </div>
                        </div>
                    </div></div>
                </div>
                <div class="thing comment">
                    <div class="entry unvoted">
                        <p class="tagline"><a class="author">dave</a><span class="score likes">3 points</span></p>
                        <form class="usertext"><div class="md"><p>second reply</p></div></form>
                    </div>
                </div>
            </div></div>
        </div>
        <div class="thing comment deleted">
            <div class="entry unvoted">
                <p class="tagline"><a class="author">[deleted]</a></p>
            </div>
            <div class="child"><div class="sitetable listing">
                <div class="thing comment">
                    <div class="entry unvoted">
                        <p class="tagline"><a class="author">orphan</a></p>
                    </div>
                </div>
            </div></div>
        </div>
        <div class="thing comment">
            <div class="entry unvoted">
                <p class="tagline"><a class="author">erin</a><span class="score likes">1 point</span></p>
                <form class="usertext"><div class="md"><p>last top</p></div></form>
            </div>
        </div>
    </div>
    </div>
    </body></html>"#;

    const LINK_THREAD: &str = r#"<html><body>
    <div class="sitetable linklisting">
        <div class="thing link">
            <div class="score likes">9</div>
            <div class="entry unvoted">
                <a class="title" href="https://example.com/article">An article</a>
                <p class="tagline"><a class="author">writer</a></p>
            </div>
        </div>
    </div>
    </body></html>"#;

    #[test]
    fn test_parse_posts_skips_promoted() {
        let doc = Document::parse(LISTING.as_bytes());
        let page = OldRedditParser.parse_posts(doc.root());

        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].title, "Rust 2.0 announced");
        assert_eq!(page.posts[1].title, "A question");
        assert!(page.posts.iter().all(|p| p.author != "advertiser"));
    }

    #[test]
    fn test_parse_posts_fields() {
        let doc = Document::parse(LISTING.as_bytes());
        let page = OldRedditParser.parse_posts(doc.root());
        let post = &page.posts[0];

        assert_eq!(post.post_url, "https://blog.rust-lang.org/2.0");
        assert_eq!(post.author, "ferris");
        assert_eq!(post.subreddit, "r/rust");
        assert_eq!(post.friendly_date, "3 hours ago");
        assert_eq!(
            post.comments_url,
            "https://old.reddit.com/r/rust/comments/abc/rust_20/"
        );
        assert_eq!(post.total_comments, "42");
        assert_eq!(post.total_likes, "120");
    }

    #[test]
    fn test_parse_posts_page_metadata() {
        let doc = Document::parse(LISTING.as_bytes());
        let page = OldRedditParser.parse_posts(doc.root());

        assert_eq!(page.description, "The front page of the internet");
        assert_eq!(page.after, "t3_def");
    }

    #[test]
    fn test_comment_count_without_number() {
        let doc = Document::parse(LISTING.as_bytes());
        let page = OldRedditParser.parse_posts(doc.root());
        assert_eq!(page.posts[1].total_comments, "comment");
    }

    #[test]
    fn test_parse_posts_empty_page() {
        let doc = Document::parse(b"<html><body><p>search results</p></body></html>");
        let page = OldRedditParser.parse_posts(doc.root());
        assert!(page.posts.is_empty());
        assert_eq!(page.after, "");
    }

    #[test]
    fn test_comment_depths_follow_reply_tree() {
        let doc = Document::parse(THREAD.as_bytes());
        let thread = OldRedditParser.parse_comments(doc.root(), "https://old.reddit.com/r/rust/comments/abc/");

        let depths: Vec<usize> = thread.comments.iter().map(|c| c.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);

        let authors: Vec<&str> = thread.comments.iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, vec!["alice", "bob", "carol", "dave", "erin"]);
    }

    #[test]
    fn test_deleted_comment_and_replies_are_dropped() {
        let doc = Document::parse(THREAD.as_bytes());
        let thread = OldRedditParser.parse_comments(doc.root(), "https://old.reddit.com/r/rust/comments/abc/");

        assert!(thread
            .comments
            .iter()
            .all(|c| c.author != "[deleted]" && c.author != "orphan"));
    }

    #[test]
    fn test_missing_score_defaults_to_one_point() {
        let doc = Document::parse(THREAD.as_bytes());
        let thread = OldRedditParser.parse_comments(doc.root(), "https://old.reddit.com/r/rust/comments/abc/");

        assert_eq!(thread.comments[0].points, "5 points");
        assert_eq!(thread.comments[1].points, DEFAULT_COMMENT_POINTS);
        assert_eq!(thread.comments[1].timestamp, "1 hour ago");
        assert_eq!(thread.comments[0].text, "top one");
    }

    #[test]
    fn test_self_post_uses_comments_url() {
        let url = "https://old.reddit.com/r/rust/comments/abc/";
        let doc = Document::parse(THREAD.as_bytes());
        let thread = OldRedditParser.parse_comments(doc.root(), url);

        assert_eq!(thread.post_title, "Rust 2.0 announced");
        assert_eq!(thread.post_author, "ferris");
        assert_eq!(thread.post_timestamp, "3 hours ago");
        assert_eq!(thread.subreddit, "rust");
        assert_eq!(thread.post_points, "120");
        assert_eq!(thread.post_url, url);
        assert_eq!(thread.post_text, "First line\n\nLast line\n");
    }

    #[test]
    fn test_link_post_uses_external_url() {
        let doc = Document::parse(LINK_THREAD.as_bytes());
        let thread = OldRedditParser.parse_comments(doc.root(), "https://old.reddit.com/r/x/comments/1/");

        assert_eq!(thread.post_url, "https://example.com/article");
        assert_eq!(
            thread.post_text,
            format!("{}\n\n", hyperlink("https://example.com/article"))
        );
        assert_eq!(thread.post_points, "9");
        assert!(thread.comments.is_empty());
    }
}
