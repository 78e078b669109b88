//! Markdown to sanitized HTML for guide pages.
//!
//! - [`render::MarkdownRenderer`]: pulldown-cmark with heading anchors and scrollable tables.
//! - [`slug`]: heading text to anchor ids, de-duplicated per render.
//! - [`sanitize::Sanitizer`]: ammonia allow-list tuned for guide content.
//!
//! The usual pipeline is `render` then `clean`; [`render_sanitized`] does both.
pub mod render;
pub mod sanitize;
pub mod slug;

pub use render::MarkdownRenderer;
pub use render::RenderOptions;
pub use render::RenderedHeading;
pub use render::RenderedMarkdown;
pub use sanitize::Sanitizer;
pub use slug::SlugRegistry;
pub use slug::slugify;

/// Renders `markdown` and sanitizes the result. Heading metadata is left as rendered.
pub fn render_sanitized(
    renderer: &MarkdownRenderer,
    sanitizer: &Sanitizer,
    markdown: &str,
) -> RenderedMarkdown {
    let rendered = renderer.render(markdown);
    RenderedMarkdown {
        html: sanitizer.clean(&rendered.html),
        headings: rendered.headings,
    }
}
