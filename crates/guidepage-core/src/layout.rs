//! Headless vertical layout.
//!
//! Only the vertical axis matters to the page components (scroll spy bands, scroll-into-view,
//! TOC auto-scroll), so a [`Rect`] is a top offset plus a height. [`BlockLayout`] approximates a
//! browser's normal flow closely enough for those components to behave; embedders with a real
//! renderer supply their own [`LayoutEngine`].
use crate::dom::Document;
use crate::dom::NodeData;
use crate::dom::NodeId;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub top: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }

    /// Edge-adjacent rectangles count as intersecting, like an `IntersectionObserver` with
    /// threshold 0.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.top <= other.bottom() && other.top <= self.bottom()
    }
}

pub trait LayoutEngine {
    /// Assigns a [`Rect`] to `root` and every element below it. `root` is placed at offset 0, so
    /// rects are relative to `root`.
    fn layout(&self, doc: &mut Document, root: NodeId);
}

/// Elements whose element children are laid out as stacked rows.
const FLOW_CONTAINERS: &[&str] = &[
    "html", "body", "main", "nav", "aside", "section", "article", "header", "footer", "div", "ul",
    "ol", "blockquote", "table", "thead", "tbody", "tfoot", "tr", "details", "figure", "dl",
];

/// Block-level elements; an otherwise inline container holding one of these becomes a flow
/// container (e.g. a `<li>` with a nested list).
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "ul", "ol", "li", "table", "div", "blockquote",
    "hr", "iframe", "section", "nav", "dd", "dt", "figure",
];

const HIDDEN_ELEMENTS: &[&str] = &[
    "head", "script", "style", "template", "title", "meta", "link", "noscript",
];

#[derive(Clone, Debug)]
pub struct BlockLayout {
    pub line_height: u32,
    pub columns_per_line: usize,
    pub block_gap: u32,
    pub iframe_height: u32,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            line_height: 24,
            columns_per_line: 80,
            block_gap: 16,
            iframe_height: 150,
        }
    }
}

impl LayoutEngine for BlockLayout {
    fn layout(&self, doc: &mut Document, root: NodeId) {
        self.place(doc, root, 0);
    }
}

impl BlockLayout {
    fn place(&self, doc: &mut Document, node: NodeId, top: u32) -> u32 {
        let height = match doc.data(node) {
            NodeData::Comment(_) => 0,
            NodeData::Text(t) => self.text_height(t, false),
            NodeData::Document => self.place_rows(doc, node, top),
            NodeData::Element(el) => {
                let tag = el.tag.clone();
                let tag = tag.as_str();
                if HIDDEN_ELEMENTS.contains(&tag) {
                    0
                } else if tag == "iframe" {
                    self.iframe_height
                } else if tag == "hr" || tag == "img" {
                    self.line_height
                } else if FLOW_CONTAINERS.contains(&tag) || self.has_block_child(doc, node) {
                    self.place_rows(doc, node, top)
                } else {
                    let text = doc.text_content(node);
                    let h = self.text_height(&text, tag == "pre");
                    self.place_inline(doc, node, Rect::new(top, h));
                    h
                }
            }
        };
        doc.set_rect(node, Rect::new(top, height));
        height
    }

    fn place_rows(&self, doc: &mut Document, node: NodeId, top: u32) -> u32 {
        let children = doc.children(node).to_vec();
        let mut y = top;
        let mut prev_block = false;
        for child in children {
            if let NodeData::Text(t) = doc.data(child)
                && t.trim().is_empty()
            {
                continue;
            }
            let is_block = doc
                .tag_name(child)
                .is_some_and(|tag| BLOCK_ELEMENTS.contains(&tag));
            if is_block && prev_block {
                y = y.saturating_add(self.block_gap);
            }
            let h = self.place(doc, child, y);
            if h > 0 {
                y = y.saturating_add(h);
                prev_block = is_block;
            }
        }
        y - top
    }

    /// Inline descendants share their block's line box.
    fn place_inline(&self, doc: &mut Document, node: NodeId, rect: Rect) {
        for child in doc.descendants(node) {
            doc.set_rect(child, rect);
        }
    }

    fn has_block_child(&self, doc: &Document, node: NodeId) -> bool {
        doc.children(node).iter().any(|&c| {
            doc.tag_name(c)
                .is_some_and(|tag| BLOCK_ELEMENTS.contains(&tag))
        })
    }

    fn text_height(&self, text: &str, preformatted: bool) -> u32 {
        let lines = if preformatted {
            text.trim_end_matches('\n').lines().count().max(1)
        } else {
            // display columns, one extra per word for the separating space
            let cols = text
                .split_whitespace()
                .map(|w| UnicodeWidthStr::width(w) + 1)
                .sum::<usize>();
            if cols == 0 {
                return 0;
            }
            cols.div_ceil(self.columns_per_line.max(1))
        };
        (lines as u32).saturating_mul(self.line_height)
    }
}
