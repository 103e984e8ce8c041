//! Tolerant queries over a parsed HTML document.
//!
//! Listing pages are external input and routinely miss nodes or shuffle
//! their structure, so nothing in here fails: lookups return `Option`,
//! attribute reads return `""` when the attribute is absent.
//!
//! Every query walks the subtree from scratch. There is no index.

pub mod render;

use scraper::{ElementRef, Html};

pub use render::{collapse_blank_lines, hyperlink, render_anchor, render_node};

/// An owned parse tree. Nodes borrowed from it live as long as the document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw page bytes. Invalid UTF-8 is replaced, never rejected.
    pub fn parse(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        Self {
            html: Html::parse_document(&text),
        }
    }

    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode(self.html.root_element())
    }
}

/// Read-only handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl<'a> HtmlNode<'a> {
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }

    /// Value of `key`, or the empty string when the attribute is absent.
    pub fn attr(&self, key: &str) -> &'a str {
        self.0.value().attr(key).unwrap_or("")
    }

    pub fn id(&self) -> &'a str {
        self.attr("id")
    }

    /// Whitespace-split `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &'a str> {
        self.attr("class").split_whitespace()
    }

    /// True when every name in `wanted` is in the class list. An empty
    /// `wanted` matches any class list.
    pub fn has_classes(&self, wanted: &[&str]) -> bool {
        wanted
            .iter()
            .all(|w| self.classes().any(|c| c == w.trim()))
    }

    /// First direct text child only. Nested text is not concatenated; use
    /// [`render_node`] for that.
    pub fn text(&self) -> &'a str {
        self.0
            .children()
            .find_map(|child| child.value().as_text().map(|t| &**t))
            .unwrap_or("")
    }

    pub fn matches(&self, tag: &str, classes: &[&str]) -> bool {
        self.tag() == tag && self.has_classes(classes)
    }

    /// Element children in document order.
    pub fn children(self) -> impl Iterator<Item = HtmlNode<'a>> {
        self.0.children().filter_map(ElementRef::wrap).map(HtmlNode)
    }

    /// Element descendants in pre-order, excluding `self`.
    pub fn descendants(self) -> impl Iterator<Item = HtmlNode<'a>> {
        self.0
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(HtmlNode)
    }

    pub fn find_descendant(self, tag: &str, classes: &[&str]) -> Option<HtmlNode<'a>> {
        self.descendants().find(|n| n.matches(tag, classes))
    }

    /// Lazily yields every matching descendant in document order.
    pub fn find_descendants<'q>(
        self,
        tag: &'q str,
        classes: &'q [&'q str],
    ) -> impl Iterator<Item = HtmlNode<'a>> + 'q
    where
        'a: 'q,
    {
        self.descendants().filter(move |n| n.matches(tag, classes))
    }

    pub fn find_descendant_by_id(self, tag: &str, id: &str) -> Option<HtmlNode<'a>> {
        self.descendants()
            .find(|n| n.tag() == tag && (id.is_empty() || n.id() == id))
    }

    /// Like [`find_descendant`](Self::find_descendant) but never looks past
    /// direct children.
    pub fn find_child(self, tag: &str, classes: &[&str]) -> Option<HtmlNode<'a>> {
        self.children().find(|n| n.matches(tag, classes))
    }

    pub fn find_children<'q>(
        self,
        tag: &'q str,
        classes: &'q [&'q str],
    ) -> impl Iterator<Item = HtmlNode<'a>> + 'q
    where
        'a: 'q,
    {
        self.children().filter(move |n| n.matches(tag, classes))
    }
}
