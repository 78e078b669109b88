use guidepage_core::Document;
use guidepage_core::NodeId;

pub const TOC_HEADER_CLASS: &str = "toc-header";
pub const TOC_LEVELS: &[&str] = &["h2", "h3"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// `h2`/`h3` headings under `content`, in document order, whether or not they have an id.
pub fn toc_headings(doc: &Document, content: NodeId) -> Vec<NodeId> {
    doc.elements_by_tag(content, TOC_LEVELS)
}

fn heading_level(doc: &Document, heading: NodeId) -> u8 {
    doc.tag_name(heading)
        .and_then(|tag| tag.strip_prefix('h'))
        .and_then(|n| n.parse().ok())
        .unwrap_or(2)
}

/// Rebuilds every container in `containers` as a list of links to the `h2`/`h3` headings under
/// `content`.
///
/// Each container keeps its first `.toc-header` element (moved to be its first child); everything
/// else in it is replaced. Headings without an id get no link. When `content` has no such headings
/// at all, the containers are left untouched.
pub fn build_toc(doc: &mut Document, content: NodeId, containers: &[NodeId]) -> Vec<TocEntry> {
    let headings = toc_headings(doc, content);
    if headings.is_empty() {
        return Vec::new();
    }

    let entries: Vec<TocEntry> = headings
        .iter()
        .filter_map(|&h| {
            let id = doc.attribute(h, "id").filter(|id| !id.is_empty())?;
            Some(TocEntry {
                id: id.to_string(),
                text: doc.text_content(h),
                level: heading_level(doc, h),
            })
        })
        .collect();

    for &container in containers {
        let header = doc.find_descendant(container, |el| el.has_class(TOC_HEADER_CLASS));
        doc.remove_children(container);
        if let Some(header) = header {
            doc.append_child(container, header);
        }
        for entry in &entries {
            let link = doc.create_element("a");
            doc.set_attribute(link, "href", &format!("#{}", entry.id));
            doc.set_attribute(link, "data-level", &entry.level.to_string());
            doc.set_text_content(link, &entry.text);
            doc.append_child(container, link);
        }
    }

    tracing::debug!(
        entries = entries.len(),
        containers = containers.len(),
        "built table of contents"
    );
    entries
}

/// The `a[href^="#"]` links inside `container`.
pub fn toc_links(doc: &Document, container: NodeId) -> Vec<NodeId> {
    doc.filter_descendants(container, |el| {
        el.tag == "a" && el.attribute("href").is_some_and(|h| h.starts_with('#'))
    })
}

/// First link in `container` pointing at `#id`.
pub fn find_link(doc: &Document, container: NodeId, id: &str) -> Option<NodeId> {
    let href = format!("#{id}");
    doc.find_descendant(container, |el| {
        el.tag == "a" && el.attribute("href") == Some(href.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<nav id=\"toc\"><div class=\"toc-header\">Contents</div><a href=\"#old\">Old</a></nav>\
        <nav id=\"mobile-toc\"><p>stale</p></nav>\
        <main id=\"content\"><h1 id=\"title\">Title</h1><h2 id=\"intro\">Intro <code>x</code></h2>\
        <h3 id=\"\">No id</h3><h3 id=\"deep\">Deep</h3><h4 id=\"skip\">Skip</h4><h2>Bare</h2></main>";

    fn page(html: &str) -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, html).unwrap();
        let content = doc.get_element_by_id("content").unwrap();
        let toc = doc.get_element_by_id("toc").unwrap();
        let mobile = doc.get_element_by_id("mobile-toc").unwrap();
        (doc, content, toc, mobile)
    }

    #[test]
    fn links_every_identified_h2_h3() {
        let (mut doc, content, toc, mobile) = page(PAGE);
        let entries = build_toc(&mut doc, content, &[toc, mobile]);

        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["intro", "deep"]);
        assert_eq!(entries[0].text, "Intro x");
        assert_eq!(entries[1].level, 3);

        assert_eq!(toc_links(&doc, toc).len(), 2);
        assert_eq!(toc_links(&doc, mobile).len(), 2);
        assert_eq!(
            doc.inner_html(toc),
            "<div class=\"toc-header\">Contents</div>\
             <a href=\"#intro\" data-level=\"2\">Intro x</a>\
             <a href=\"#deep\" data-level=\"3\">Deep</a>"
        );
        assert_eq!(
            doc.inner_html(mobile),
            "<a href=\"#intro\" data-level=\"2\">Intro x</a>\
             <a href=\"#deep\" data-level=\"3\">Deep</a>"
        );
    }

    #[test]
    fn no_headings_leaves_containers_alone() {
        let (mut doc, content, toc, mobile) = page(
            "<nav id=\"toc\"><a href=\"#old\">Old</a></nav><nav id=\"mobile-toc\"></nav>\
             <main id=\"content\"><h1>Only a title</h1><p>text</p></main>",
        );
        let before = doc.inner_html(toc);
        assert!(build_toc(&mut doc, content, &[toc, mobile]).is_empty());
        assert_eq!(doc.inner_html(toc), before);
    }

    #[test]
    fn rebuild_replaces_previous_links() {
        let (mut doc, content, toc, mobile) = page(PAGE);
        build_toc(&mut doc, content, &[toc, mobile]);
        build_toc(&mut doc, content, &[toc, mobile]);
        assert_eq!(toc_links(&doc, toc).len(), 2);
        assert_eq!(
            doc.filter_descendants(toc, |el| el.has_class(TOC_HEADER_CLASS)).len(),
            1
        );
    }

    #[test]
    fn find_link_matches_exact_href() {
        let (mut doc, content, toc, mobile) = page(PAGE);
        build_toc(&mut doc, content, &[toc, mobile]);
        let link = find_link(&doc, mobile, "deep").unwrap();
        assert_eq!(doc.text_content(link), "Deep");
        assert!(find_link(&doc, mobile, "dee").is_none());
    }
}
