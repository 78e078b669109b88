use crate::dom::Document;
use crate::dom::NodeId;
use crate::error::DomError;

pub const HIGHLIGHTED_CLASS: &str = "highlighted";

/// Produces highlighted HTML for a code block.
///
/// Implementations return markup for the *inside* of the `<code>` element, already escaped.
/// `None` leaves the block untouched (unknown language, nothing to do).
pub trait CodeHighlighter {
    fn highlight(&self, language: Option<&str>, code: &str) -> Option<String>;
}

pub struct NoHighlight;

impl CodeHighlighter for NoHighlight {
    fn highlight(&self, _language: Option<&str>, _code: &str) -> Option<String> {
        None
    }
}

/// Language named by a `language-*` (or `lang-*`) class.
pub fn code_language(doc: &Document, code: NodeId) -> Option<String> {
    let class = doc.attribute(code, "class")?;
    class.split_ascii_whitespace().find_map(|c| {
        c.strip_prefix("language-")
            .or_else(|| c.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}

/// Highlights every `pre > code` block under `scope` that is not already highlighted.
///
/// Returns how many blocks were rewritten.
pub fn highlight_all(
    doc: &mut Document,
    scope: NodeId,
    highlighter: &dyn CodeHighlighter,
) -> Result<usize, DomError> {
    let blocks: Vec<NodeId> = doc
        .elements_by_tag(scope, &["code"])
        .into_iter()
        .filter(|&code| doc.parent(code).is_some_and(|p| doc.is_tag(p, "pre")))
        .filter(|&code| !doc.has_class(code, HIGHLIGHTED_CLASS))
        .collect();

    let mut count = 0;
    for code in blocks {
        let language = code_language(doc, code);
        let text = doc.text_content(code);
        let Some(html) = highlighter.highlight(language.as_deref(), &text) else {
            continue;
        };
        doc.set_inner_html(code, &html)?;
        doc.add_class(code, HIGHLIGHTED_CLASS);
        count += 1;
    }
    if count > 0 {
        tracing::debug!(blocks = count, "highlighted code blocks");
    }
    Ok(count)
}
