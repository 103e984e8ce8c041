//! Plain-text rendering of post and comment bodies.

use std::sync::LazyLock;

use crossterm::style::Stylize;
use regex::Regex;
use scraper::{ElementRef, Node};

use super::HtmlNode;

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n\n+").expect("static regex is valid"));

/// Style a URL the way links are shown in the terminal.
pub fn hyperlink(url: &str) -> String {
    url.blue().italic().to_string()
}

/// Render an anchor inline.
///
/// External links become `text <styled url>`. Relative links and links
/// whose text already is the URL collapse to just the styled text.
pub fn render_anchor(node: HtmlNode<'_>) -> String {
    let url = node.attr("href");
    let link_text = node.text();

    let external = url.starts_with("http") || url.starts_with("www");
    if !external || url == link_text {
        return hyperlink(link_text);
    }

    format!("{} {}", link_text, hyperlink(url))
}

/// Render every child of `node` on its own line.
pub fn render_node(node: HtmlNode<'_>) -> String {
    let mut content = String::new();
    render_children(node, &mut content, true);
    content
}

/// Squeeze runs of three or more newlines into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

fn render_children(node: HtmlNode<'_>, out: &mut String, line_per_child: bool) {
    for child in node.0.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    render_element(HtmlNode(element), out);
                }
            }
            _ => {}
        }

        if line_per_child {
            out.push('\n');
        }
    }
}

fn render_element(element: HtmlNode<'_>, out: &mut String) {
    match element.tag() {
        "a" => out.push_str(&render_anchor(element)),
        "li" => out.push_str(element.text()),
        _ => render_children(element, out, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::Document;

    fn body(html: &str) -> String {
        let doc = Document::parse(html.as_bytes());
        let md = doc.root().find_descendant("div", &["md"]).unwrap();
        render_node(md)
    }

    #[test]
    fn test_external_anchor_keeps_text_and_url() {
        let doc = Document::parse(br#"<a href="https://example.com/x">docs</a>"#);
        let anchor = doc.root().find_descendant("a", &[]).unwrap();
        assert_eq!(
            render_anchor(anchor),
            format!("docs {}", hyperlink("https://example.com/x"))
        );
    }

    #[test]
    fn test_relative_anchor_renders_only_text() {
        let doc = Document::parse(br#"<a href="/r/rust">r/rust</a>"#);
        let anchor = doc.root().find_descendant("a", &[]).unwrap();
        assert_eq!(render_anchor(anchor), hyperlink("r/rust"));
    }

    #[test]
    fn test_self_referential_anchor_renders_once() {
        let doc = Document::parse(br#"<a href="https://example.com">https://example.com</a>"#);
        let anchor = doc.root().find_descendant("a", &[]).unwrap();
        assert_eq!(render_anchor(anchor), hyperlink("https://example.com"));
    }

    #[test]
    fn test_render_node_walks_children_line_by_line() {
        let rendered = body(
            r#"<div class="md"><p>Hello <em>there</em></p><p>see <a href="https://a.io">this</a> now</p></div>"#,
        );
        assert_eq!(
            rendered,
            format!("Hello there\nsee this {} now\n", hyperlink("https://a.io"))
        );
    }

    #[test]
    fn test_list_items_use_shallow_text() {
        let rendered = body(r#"<div class="md"><ul><li>one <b>bold</b></li><li>two</li></ul></div>"#);
        assert_eq!(rendered, "one two\n");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n\nc"), "a\n\nb\n\nc");
        assert_eq!(collapse_blank_lines("a\nb"), "a\nb");
    }
}
