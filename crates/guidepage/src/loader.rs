use crate::config::DEFAULT_SOURCE_LINK;
use crate::config::PageConfig;
use crate::error::LoadError;
use crate::source::ContentSource;
use crate::source::fetch_first;
use crate::source::sources_from_locations;
use guidepage_core::Document;
use guidepage_core::DomError;
use guidepage_core::NodeId;
use guidepage_core::html::escape_attribute;
use guidepage_markdown::MarkdownRenderer;
use guidepage_markdown::RenderedHeading;
use guidepage_markdown::Sanitizer;
use std::time::Duration;

pub const ERROR_CLASS: &str = "error";

/// The static panel shown in place of the guide when it cannot be loaded.
pub fn error_panel_html(source_link: &str) -> String {
    format!(
        "<div class=\"{ERROR_CLASS}\">\
         <h2>Error Loading Guide</h2>\
         <p>Could not load the guide content. Please try:</p>\
         <ul>\
         <li><a href=\"{}\">View on GitHub</a></li>\
         <li>Refresh the page</li>\
         </ul>\
         </div>",
        escape_attribute(source_link)
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedContent {
    /// Position of the winning source in the configured order.
    pub source_index: usize,
    pub source: String,
    pub headings: Vec<RenderedHeading>,
}

/// Fetches guide markdown from the first available source and injects it, rendered and
/// sanitized, into the content region.
pub struct ContentLoader {
    sources: Vec<Box<dyn ContentSource>>,
    renderer: MarkdownRenderer,
    sanitizer: Sanitizer,
    request_timeout: Option<Duration>,
    source_link: String,
}

impl ContentLoader {
    pub fn new(sources: Vec<Box<dyn ContentSource>>) -> Self {
        Self {
            sources,
            renderer: MarkdownRenderer::default(),
            sanitizer: Sanitizer::new(),
            request_timeout: None,
            source_link: DEFAULT_SOURCE_LINK.to_string(),
        }
    }

    pub fn from_config(config: &PageConfig, client: &reqwest::Client) -> Self {
        let sources = sources_from_locations(&config.sources, config.location.as_ref(), client);
        Self::new(sources)
            .with_renderer(MarkdownRenderer::new(config.render))
            .with_request_timeout(config.request_timeout())
            .with_source_link(config.source_link.clone())
    }

    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_source_link(mut self, link: impl Into<String>) -> Self {
        self.source_link = link.into();
        self
    }

    pub fn with_sources(mut self, sources: Vec<Box<dyn ContentSource>>) -> Self {
        self.sources = sources;
        self
    }

    pub fn sources(&self) -> &[Box<dyn ContentSource>] {
        &self.sources
    }

    pub fn source_link(&self) -> &str {
        &self.source_link
    }

    /// Renders `markdown`, sanitizes it and replaces the children of `region` with the result.
    pub fn inject(
        &self,
        doc: &mut Document,
        region: NodeId,
        markdown: &str,
    ) -> Result<Vec<RenderedHeading>, DomError> {
        let rendered = self.renderer.render(markdown);
        let clean = self.sanitizer.clean(&rendered.html);
        doc.set_inner_html(region, &clean)?;
        Ok(rendered.headings)
    }

    /// Fetch, render, sanitize, inject. On error `region` is left untouched; see
    /// [`ContentLoader::show_error`].
    pub async fn load(
        &self,
        doc: &mut Document,
        region: NodeId,
    ) -> Result<LoadedContent, LoadError> {
        let fetched = fetch_first(&self.sources, self.request_timeout).await?;
        let headings = self.inject(doc, region, &fetched.body)?;
        Ok(LoadedContent {
            source_index: fetched.index,
            source: fetched.source,
            headings,
        })
    }

    pub fn show_error(&self, doc: &mut Document, region: NodeId) -> Result<(), DomError> {
        doc.set_inner_html(region, &error_panel_html(&self.source_link))
    }
}

impl std::fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources: Vec<String> = self.sources.iter().map(|s| s.describe()).collect();
        f.debug_struct("ContentLoader")
            .field("sources", &sources)
            .field("renderer", &self.renderer)
            .field("request_timeout", &self.request_timeout)
            .field("source_link", &self.source_link)
            .finish_non_exhaustive()
    }
}
