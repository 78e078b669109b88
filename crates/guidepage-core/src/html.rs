//! HTML parsing into (and serialization out of) a [`Document`].
//!
//! Parsing goes through html5ever's `RcDom` and is then copied into the arena, so the tree we
//! hold has exactly the shape a browser would build for the same markup.
use crate::dom::Document;
use crate::dom::ElementData;
use crate::dom::NodeData;
use crate::dom::NodeId;
use crate::error::DomError;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::Handle;
use markup5ever_rcdom::NodeData as RcNodeData;
use markup5ever_rcdom::RcDom;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn parse_rcdom(html: &str) -> Result<RcDom, DomError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    Ok(dom)
}

fn find_child(handle: &Handle, tag: &str) -> Option<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .find(|c| matches!(&c.data, RcNodeData::Element { name, .. } if &*name.local == tag))
        .cloned()
}

impl Document {
    /// Parses a complete HTML document.
    pub fn parse(html: &str) -> Result<Self, DomError> {
        let dom = parse_rcdom(html)?;
        let mut doc = Document::empty();
        let root = doc.root();
        for child in dom.document.children.borrow().iter() {
            doc.import(child, root);
        }
        tracing::trace!(nodes = doc.len(), "parsed HTML document");
        Ok(doc)
    }

    /// Replaces the children of `node` with the parsed `html` fragment (`element.innerHTML = html`).
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<(), DomError> {
        let dom = parse_rcdom(&format!("<!DOCTYPE html><body>{html}"))?;
        self.remove_children(node);
        let body = find_child(&dom.document, "html").and_then(|h| find_child(&h, "body"));
        if let Some(body) = body {
            for child in body.children.borrow().iter() {
                self.import(child, node);
            }
        }
        Ok(())
    }

    fn import(&mut self, handle: &Handle, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.import(child, parent);
                }
            }
            RcNodeData::Text { contents } => {
                let id = self.create_text(&contents.borrow());
                self.append_child(parent, id);
            }
            RcNodeData::Comment { contents } => {
                let id = self.create_comment(contents);
                self.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, .. } => {
                let mut el = ElementData::new(&*name.local);
                for attr in attrs.borrow().iter() {
                    el.set_attribute(&attr.name.local, &attr.value);
                }
                let id = self.create_element_with(el);
                self.append_child(parent, id);
                for child in handle.children.borrow().iter() {
                    self.import(child, id);
                }
            }
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
        }
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &c in self.children(node) {
            self.write_node(c, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Serializes the whole document, doctype included.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>");
        for &c in self.children(self.root()) {
            self.write_node(c, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match self.data(node) {
            NodeData::Document => {
                for &c in self.children(node) {
                    self.write_node(c, out);
                }
            }
            NodeData::Text(t) => {
                let raw = self
                    .parent(node)
                    .and_then(|p| self.tag_name(p))
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    out.push_str(t);
                } else {
                    out.push_str(&escape_text(t));
                }
            }
            NodeData::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (k, v) in el.attributes() {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(v));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                for &c in self.children(node) {
                    self.write_node(c, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

pub fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_document_with_ids() {
        let doc = Document::parse(
            "<!DOCTYPE html><html><head><title>t</title></head>\
             <body><main id=\"content\"><p>Loading</p></main></body></html>",
        )
        .unwrap();
        let content = doc.get_element_by_id("content").unwrap();
        assert_eq!(doc.tag_name(content), Some("main"));
        assert_eq!(doc.text_content(content), "Loading");
        assert!(doc.head().is_some());
    }

    #[test]
    fn inner_html_replaces_children() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<p>old</p>").unwrap();
        doc.set_inner_html(body, "<h2 id=\"intro\">Intro <code>x</code></h2><p>a &amp; b</p>")
            .unwrap();
        assert_eq!(doc.children(body).len(), 2);
        let h2 = doc.get_element_by_id("intro").unwrap();
        assert_eq!(doc.text_content(h2), "Intro x");
        assert_eq!(
            doc.inner_html(body),
            "<h2 id=\"intro\">Intro <code>x</code></h2><p>a &amp; b</p>"
        );
    }

    #[test]
    fn fragment_preserves_preformatted_whitespace() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<pre><code>fn main() {\n    x();\n}\n</code></pre>")
            .unwrap();
        let code = doc.elements_by_tag(body, &["code"])[0];
        assert_eq!(doc.text_content(code), "fn main() {\n    x();\n}\n");
    }

    #[test]
    fn serializes_void_elements_and_escapes_attributes() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<p>a<br>b</p><a title='say \"hi\"' href=\"#x\">x</a>")
            .unwrap();
        assert_eq!(
            doc.inner_html(body),
            "<p>a<br>b</p><a title=\"say &quot;hi&quot;\" href=\"#x\">x</a>"
        );
    }

    #[test]
    fn to_html_round_trips_structure() {
        let doc = Document::parse("<html><body><div id=\"x\"></div></body></html>").unwrap();
        let html = doc.to_html();
        assert!(html.starts_with("<!DOCTYPE html><html><head></head><body>"));
        assert!(html.contains("<div id=\"x\"></div>"));
    }
}
