use async_trait::async_trait;
use guidepage::ContentSource;
use guidepage::FetchError;
use guidepage::LoadState;
use guidepage::PageConfig;
use guidepage::PageController;
use guidepage::guidepage_core::Document;
use guidepage::guidepage_core::NodeId;
use guidepage::guidepage_core::highlight::CodeHighlighter;
use guidepage::guidepage_core::html::escape_text;
use guidepage::guidepage_core::input::KeyCode;
use guidepage::guidepage_core::input::KeyEvent;
use guidepage::guidepage_core::input::PageEvent;
use guidepage::guidepage_core::menu::MenuState;
use guidepage::guidepage_core::storage::JsonFileStorage;
use guidepage::guidepage_core::theme::ThemeMode;
use guidepage::shell::default_document;
use guidepage::toc::toc_links;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use url::Url;

const GUIDE: &str = "# Mastery Guide\n\n\
## Intro\n\nWelcome.\n\n\
## Setup\n\n```rust\nfn main() {}\n```\n\n\
### Install\n\n| tool | version |\n|---|---|\n| cargo | 1.88 |\n\n\
## Intro\n\nAgain.\n\n\
<iframe src=\"https://www.youtube.com/embed/abc\"></iframe>\n\n\
<script>steal()</script>\n";

/// The guide followed by enough text that every heading can reach the top of an 800px viewport.
fn guide() -> String {
    let mut md = GUIDE.to_string();
    for i in 0..60 {
        md.push_str(&format!("\nFiller paragraph {i}.\n"));
    }
    md
}

/// Serves a fixed body (or a fixed failure) and counts how often it was asked.
#[derive(Clone)]
struct StaticSource {
    body: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StaticSource {
    fn ok(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            body: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => Err(FetchError::Status {
                url: self.describe(),
                status: 404,
            }),
        }
    }
}

fn controller(sources: &[StaticSource], config: PageConfig) -> PageController {
    let boxed: Vec<Box<dyn ContentSource>> = sources
        .iter()
        .cloned()
        .map(|s| Box::new(s) as Box<dyn ContentSource>)
        .collect();
    PageController::new(default_document().unwrap(), config).with_sources(boxed)
}

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).unwrap()
}

#[tokio::test]
async fn first_source_wins_and_second_is_never_requested() {
    let primary = StaticSource::ok(guide());
    let fallback = StaticSource::ok("# other");
    let mut page = controller(&[primary.clone(), fallback.clone()], PageConfig::default());

    let LoadState::Loaded(loaded) = page.start().await.clone() else {
        panic!("expected the guide to load");
    };
    assert_eq!(loaded.source_index, 0);
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test]
async fn fallback_is_used_when_primary_fails() {
    let primary = StaticSource::failing();
    let fallback = StaticSource::ok(guide());
    let mut page = controller(&[primary.clone(), fallback.clone()], PageConfig::default());

    page.start().await;
    assert!(matches!(page.load_state(), LoadState::Loaded(l) if l.source_index == 1));
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[tokio::test]
async fn all_sources_failing_shows_error_panel_only() {
    let mut page = controller(
        &[StaticSource::failing(), StaticSource::failing()],
        PageConfig::default(),
    );
    page.start().await;
    assert_eq!(page.load_state(), &LoadState::Failed);

    let doc = page.document();
    let content = by_id(doc, "content");
    let html = doc.inner_html(content);
    assert!(html.starts_with("<div class=\"error\"><h2>Error Loading Guide</h2>"));
    assert!(html.contains(
        "href=\"https://github.com/TheDecipherist/claude-code-mastery/blob/main/GUIDE.md\""
    ));
    assert!(!html.contains("class=\"loading\""));
    assert!(page.toc().is_empty());
    assert_eq!(toc_links(doc, by_id(doc, "toc")).len(), 0);

    // nothing was scheduled: no spy ever starts
    assert_eq!(page.time_until_next_timer(), None);
    page.settle();
    assert!(page.scroll_spy().is_none());
}

#[tokio::test]
async fn rendered_guide_is_sanitized_and_wrapped() {
    let mut page = controller(&[StaticSource::ok(guide())], PageConfig::default());
    page.start().await;

    let doc = page.document();
    let html = doc.inner_html(by_id(doc, "content"));
    assert!(html.contains("<h2 id=\"intro\">Intro</h2>"));
    assert!(html.contains("<h2 id=\"intro-2\">Intro</h2>"));
    assert!(html.contains("<div class=\"table-container\"><table>"));
    assert!(html.contains("<iframe src=\"https://www.youtube.com/embed/abc\">"));
    assert!(!html.contains("steal"));
    assert!(!html.contains("<script"));
}

#[tokio::test]
async fn toc_lists_h2_h3_in_both_containers() {
    let mut page = controller(&[StaticSource::ok(guide())], PageConfig::default());
    page.start().await;

    let ids: Vec<_> = page.toc().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["intro", "setup", "install", "intro-2"]);

    let doc = page.document();
    for container in ["toc", "mobile-toc"] {
        let node = by_id(doc, container);
        let links = toc_links(doc, node);
        assert_eq!(links.len(), 4);
        assert_eq!(doc.attribute(links[2], "href"), Some("#install"));
        assert_eq!(doc.attribute(links[2], "data-level"), Some("3"));
        let first = doc.children(node)[0];
        assert!(doc.has_class(first, "toc-header"));
    }
}

#[tokio::test]
async fn scroll_spy_starts_after_delay_and_follows_scrolling() {
    let mut page = controller(&[StaticSource::ok(guide())], PageConfig::default());
    page.start().await;

    page.advance(Duration::from_millis(99));
    assert!(page.scroll_spy().is_none());
    page.advance(Duration::from_millis(1));
    assert!(page.scroll_spy().is_some());

    let doc = page.document();
    let setup_top = doc.rect(by_id(doc, "setup")).unwrap().top;
    // park the top of the observation band (10% of 800px) on the "setup" heading
    page.dispatch(&PageEvent::Scroll { y: setup_top - 80 });
    assert_eq!(page.active_section(), Some("setup"));

    let doc = page.document();
    for container in ["toc", "mobile-toc"] {
        let active: Vec<_> = toc_links(doc, by_id(doc, container))
            .into_iter()
            .filter(|&l| doc.has_class(l, "active"))
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(doc.attribute(active[0], "href"), Some("#setup"));
    }
}

#[tokio::test]
async fn url_fragment_scrolls_after_150ms() {
    let config = PageConfig::default()
        .with_location(Url::parse("https://example.com/docs/index.html#install").unwrap());
    let mut page = controller(&[StaticSource::ok(guide())], config);
    page.start().await;

    let install_top = {
        let doc = page.document();
        doc.rect(by_id(doc, "install")).unwrap().top
    };
    assert!(install_top > 0);

    page.advance(Duration::from_millis(149));
    assert_eq!(page.viewport().y, 0);
    page.advance(Duration::from_millis(1));
    assert_eq!(page.viewport().y, install_top);
}

#[tokio::test]
async fn unknown_fragment_schedules_nothing() {
    let config = PageConfig::default()
        .with_location(Url::parse("https://example.com/index.html#nowhere").unwrap());
    let mut page = controller(&[StaticSource::ok(guide())], config);
    page.start().await;
    page.settle();
    assert_eq!(page.viewport().y, 0);
}

#[tokio::test]
async fn theme_toggle_round_trips_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut page = controller(&[StaticSource::ok(guide())], PageConfig::default())
        .with_storage(Box::new(JsonFileStorage::open(&path).unwrap()));
    page.start().await;
    assert_eq!(page.theme(), ThemeMode::Light);

    let toggle = by_id(page.document(), "theme-toggle");
    assert!(page.dispatch(&PageEvent::Click(toggle)));
    assert_eq!(page.theme(), ThemeMode::Dark);
    assert_eq!(page.storage().get("theme").as_deref(), Some("dark"));

    page.dispatch(&PageEvent::Click(toggle));
    assert_eq!(page.theme(), ThemeMode::Light);
    page.dispatch(&PageEvent::Click(toggle));

    // a new session restores the stored choice before anything is clicked
    let mut next = controller(&[StaticSource::ok(guide())], PageConfig::default())
        .with_storage(Box::new(JsonFileStorage::open(&path).unwrap()));
    next.init();
    assert_eq!(next.theme(), ThemeMode::Dark);
    let html = next.document().document_element().unwrap();
    assert_eq!(next.document().attribute(html, "data-theme"), Some("dark"));
}

#[tokio::test]
async fn escape_closes_open_menu() {
    let mut page = controller(&[StaticSource::ok(guide())], PageConfig::default());
    page.start().await;

    let toggle = by_id(page.document(), "menu-toggle");
    page.dispatch(&PageEvent::Click(toggle));
    assert_eq!(page.menu_state(), Some(MenuState::Open));

    assert!(page.dispatch(&PageEvent::KeyDown(KeyEvent::new(KeyCode::Esc))));
    assert_eq!(page.menu_state(), Some(MenuState::Closed));

    let doc = page.document();
    for id in ["menu-toggle", "mobile-menu", "mobile-menu-overlay"] {
        assert!(!doc.has_class(by_id(doc, id), "active"), "#{id} still active");
    }
    assert!(!doc.has_class(doc.body().unwrap(), "menu-open"));
    assert_eq!(doc.attribute(toggle, "aria-expanded"), Some("false"));
}

#[tokio::test]
async fn mobile_toc_link_closes_menu_and_jumps() {
    let mut page = controller(&[StaticSource::ok(guide())], PageConfig::default());
    page.start().await;
    page.settle();

    let toggle = by_id(page.document(), "menu-toggle");
    page.dispatch(&PageEvent::Click(toggle));

    let link = {
        let doc = page.document();
        toc_links(doc, by_id(doc, "mobile-toc"))[1]
    };
    assert!(page.dispatch(&PageEvent::Click(link)));
    assert_eq!(page.menu_state(), Some(MenuState::Closed));

    let setup_top = {
        let doc = page.document();
        doc.rect(by_id(doc, "setup")).unwrap().top
    };
    assert_eq!(page.viewport().y, setup_top);
    assert_eq!(
        page.config().location.as_ref().and_then(|l| l.fragment()),
        None,
        "pages without a location keep none"
    );
}

#[tokio::test]
async fn missing_elements_are_silent() {
    let doc = Document::parse("<!DOCTYPE html><html><body><p>bare</p></body></html>").unwrap();
    let source = StaticSource::ok(guide());
    let sources: Vec<Box<dyn ContentSource>> = vec![Box::new(source.clone())];
    let mut page = PageController::new(doc, PageConfig::default()).with_sources(sources);

    assert_eq!(page.start().await, &LoadState::NoContentRegion);
    assert_eq!(source.calls(), 0);
    assert_eq!(page.menu_state(), None);

    let p = page.document().elements_by_tag(page.document().root(), &["p"])[0];
    assert!(!page.dispatch(&PageEvent::Click(p)));
    assert!(!page.dispatch(&PageEvent::KeyDown(KeyEvent::new(KeyCode::Esc))));
}

struct Marker;

impl CodeHighlighter for Marker {
    fn highlight(&self, language: Option<&str>, code: &str) -> Option<String> {
        Some(format!(
            "<span class=\"hl-{}\">{}</span>",
            language?,
            escape_text(code)
        ))
    }
}

#[tokio::test]
async fn highlighter_runs_over_code_blocks() {
    let mut page = controller(&[StaticSource::ok(guide())], PageConfig::default())
        .with_highlighter(Box::new(Marker));
    page.start().await;

    let doc = page.document();
    let html = doc.inner_html(by_id(doc, "content"));
    assert!(html.contains("<code class=\"language-rust highlighted\"><span class=\"hl-rust\">"));
}
