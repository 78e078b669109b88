//! The page controller: one value that owns the page and everything wired into it.
//!
//! Startup mirrors what a guide page does once its DOM is ready:
//!
//! 1. [`PageController::init`]: restore the stored theme, attach the theme toggle and the mobile
//!    menu.
//! 2. [`PageController::load`]: fetch the guide from the first available source, render and
//!    sanitize it into the content region, highlight code, build the TOCs, then schedule the
//!    scroll spy and the initial jump to the URL fragment.
//!
//! After that the embedder feeds [`PageEvent`]s through [`PageController::dispatch`] and moves
//! the virtual clock with [`PageController::advance`] so deferred work runs.
use crate::config::PageConfig;
use crate::error::LoadError;
use crate::loader::ContentLoader;
use crate::loader::LoadedContent;
use crate::scroll_spy::ScrollSpy;
use crate::source::ContentSource;
use crate::toc::TocEntry;
use crate::toc::build_toc;
use guidepage_core::Document;
use guidepage_core::NodeId;
use guidepage_core::highlight::CodeHighlighter;
use guidepage_core::highlight::highlight_all;
use guidepage_core::input::PageEvent;
use guidepage_core::layout::BlockLayout;
use guidepage_core::layout::LayoutEngine;
use guidepage_core::menu::MenuState;
use guidepage_core::menu::MobileMenu;
use guidepage_core::storage::MemoryStorage;
use guidepage_core::storage::Storage;
use guidepage_core::theme::ThemeMode;
use guidepage_core::theme::ThemeToggle;
use guidepage_core::theme::current_theme;
use guidepage_core::theme::restore_theme;
use guidepage_core::timer::TimerQueue;
use guidepage_core::viewport::ViewportState;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotStarted,
    Loaded(LoadedContent),
    /// The error panel is showing.
    Failed,
    /// The page has no content region; nothing was fetched.
    NoContentRegion,
}

/// Work scheduled on the controller's virtual clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    StartScrollSpy,
    ScrollIntoView(NodeId),
}

pub struct PageController {
    config: PageConfig,
    doc: Document,
    storage: Box<dyn Storage>,
    loader: ContentLoader,
    highlighter: Option<Box<dyn CodeHighlighter>>,
    layout: Box<dyn LayoutEngine>,
    theme: Option<ThemeToggle>,
    menu: Option<MobileMenu>,
    content: Option<NodeId>,
    toc: Vec<TocEntry>,
    spy: Option<ScrollSpy>,
    timers: TimerQueue<Deferred>,
    viewport: ViewportState,
    state: LoadState,
}

impl PageController {
    pub fn new(doc: Document, config: PageConfig) -> Self {
        let client = reqwest::Client::new();
        let loader = ContentLoader::from_config(&config, &client);
        let viewport = ViewportState::new(config.viewport_height);
        Self {
            config,
            doc,
            storage: Box::new(MemoryStorage::new()),
            loader,
            highlighter: None,
            layout: Box::new(BlockLayout::default()),
            theme: None,
            menu: None,
            content: None,
            toc: Vec::new(),
            spy: None,
            timers: TimerQueue::new(),
            viewport,
            state: LoadState::NotStarted,
        }
    }

    pub fn with_storage(mut self, storage: Box<dyn Storage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn CodeHighlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn with_layout(mut self, layout: Box<dyn LayoutEngine>) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the sources built from [`PageConfig::sources`].
    pub fn with_sources(mut self, sources: Vec<Box<dyn ContentSource>>) -> Self {
        self.loader = self.loader.with_sources(sources);
        self
    }

    /// Restores the theme and attaches the interactive components that exist on the page.
    pub fn init(&mut self) {
        let ids = &self.config.ids;
        if let Some(mode) = restore_theme(
            &mut self.doc,
            self.storage.as_ref(),
            &self.config.theme_storage_key,
        ) {
            tracing::debug!(theme = %mode, "restored theme");
        }
        self.theme = ThemeToggle::attach(
            &self.doc,
            &ids.theme_toggle,
            self.config.theme_storage_key.clone(),
        );
        self.menu = MobileMenu::attach(
            &self.doc,
            &ids.menu_toggle,
            &ids.mobile_menu,
            &ids.mobile_menu_overlay,
        );
        tracing::debug!(
            theme_toggle = self.theme.is_some(),
            mobile_menu = self.menu.is_some(),
            "page initialized"
        );
    }

    /// Loads the guide into the content region. Failures end in the error panel; they are
    /// reported through [`PageController::load_state`], never returned.
    pub async fn load(&mut self) -> &LoadState {
        let Some(region) = self.doc.get_element_by_id(&self.config.ids.content) else {
            tracing::debug!(id = %self.config.ids.content, "no content region, skipping load");
            self.state = LoadState::NoContentRegion;
            return &self.state;
        };
        self.content = Some(region);

        self.state = match self.load_into(region).await {
            Ok(loaded) => LoadState::Loaded(loaded),
            Err(err) => {
                tracing::error!(error = %err, "error loading guide");
                if let Err(err) = self.loader.show_error(&mut self.doc, region) {
                    tracing::error!(error = %err, "failed to show error panel");
                }
                LoadState::Failed
            }
        };
        &self.state
    }

    /// [`PageController::init`] followed by [`PageController::load`].
    pub async fn start(&mut self) -> &LoadState {
        self.init();
        self.load().await
    }

    async fn load_into(&mut self, region: NodeId) -> Result<LoadedContent, LoadError> {
        let loaded = self.loader.load(&mut self.doc, region).await?;

        if let Some(highlighter) = &self.highlighter {
            let root = self.doc.root();
            highlight_all(&mut self.doc, root, highlighter.as_ref())?;
        }

        self.layout.layout(&mut self.doc, region);
        let content_h = self.doc.rect(region).map_or(0, |r| r.height);
        self.viewport.set_content(content_h);

        let containers = self.toc_containers();
        self.toc = build_toc(&mut self.doc, region, &containers);
        for container in containers {
            self.layout.layout(&mut self.doc, container);
        }

        self.timers.schedule(
            Duration::from_millis(self.config.scroll_spy.start_delay_ms),
            Deferred::StartScrollSpy,
        );
        if let Some(fragment) = self.config.fragment()
            && let Some(target) = self.doc.get_element_by_id(fragment)
        {
            self.timers.schedule(
                Duration::from_millis(self.config.hash_scroll_delay_ms),
                Deferred::ScrollIntoView(target),
            );
        }
        Ok(loaded)
    }

    fn toc_containers(&self) -> Vec<NodeId> {
        [&self.config.ids.toc, &self.config.ids.mobile_toc]
            .into_iter()
            .filter_map(|id| self.doc.get_element_by_id(id))
            .collect()
    }

    /// Delivers one event to every listener on the page. Returns whether any of them acted.
    pub fn dispatch(&mut self, event: &PageEvent) -> bool {
        let mut handled = false;
        match event {
            PageEvent::Click(target) => {
                if let Some(theme) = &self.theme
                    && theme.handles_click(&self.doc, *target)
                {
                    theme.toggle(&mut self.doc, self.storage.as_mut());
                    handled = true;
                }
            }
            PageEvent::Scroll { y } => {
                self.viewport.scroll_to(*y);
                self.observe_sections();
                handled = true;
            }
            PageEvent::Resize { height } => {
                self.viewport.set_viewport(*height);
                self.observe_sections();
                handled = true;
            }
            PageEvent::KeyDown(_) => {}
        }

        if let Some(menu) = &self.menu {
            handled |= menu.handle_event(&mut self.doc, event);
        }

        // default action of a same-page link, after the listeners
        if let PageEvent::Click(target) = event {
            handled |= self.follow_anchor(*target);
        }
        handled
    }

    /// Moves the virtual clock forward and runs whatever came due.
    pub fn advance(&mut self, by: Duration) {
        for task in self.timers.advance(by) {
            match task {
                Deferred::StartScrollSpy => self.start_scroll_spy(),
                Deferred::ScrollIntoView(target) => self.scroll_into_view(target),
            }
        }
    }

    /// Runs every pending deferred task.
    pub fn settle(&mut self) {
        while let Some(next) = self.timers.time_until_next() {
            self.advance(next);
        }
    }

    fn start_scroll_spy(&mut self) {
        let Some(content) = self.content else {
            return;
        };
        let desktop = self.doc.get_element_by_id(&self.config.ids.toc);
        let mobile = self.doc.get_element_by_id(&self.config.ids.mobile_toc);
        self.spy = ScrollSpy::start(&self.doc, content, desktop, mobile, &self.config.scroll_spy);
        self.observe_sections();
    }

    fn observe_sections(&mut self) {
        if let Some(spy) = &mut self.spy {
            spy.observe(&mut self.doc, &self.viewport);
        }
    }

    /// Scrolls the page so `target` sits at the top of the viewport. Only content nodes have
    /// page geometry.
    pub fn scroll_into_view(&mut self, target: NodeId) {
        let in_content = self
            .content
            .is_some_and(|content| self.doc.contains(content, target));
        let Some(rect) = self.doc.rect(target).filter(|_| in_content) else {
            tracing::debug!(?target, "scroll target has no page position");
            return;
        };
        self.viewport.scroll_to(rect.top);
        self.observe_sections();
    }

    fn follow_anchor(&mut self, target: NodeId) -> bool {
        let mut cur = Some(target);
        let mut href = None;
        while let Some(node) = cur {
            if self.doc.is_tag(node, "a") {
                href = self.doc.attribute(node, "href").map(str::to_string);
                break;
            }
            cur = self.doc.parent(node);
        }
        let Some(fragment) = href.as_deref().and_then(|h| h.strip_prefix('#')) else {
            return false;
        };

        if fragment.is_empty() {
            self.viewport.to_top();
            self.observe_sections();
        } else if let Some(node) = self.doc.get_element_by_id(fragment) {
            self.scroll_into_view(node);
        } else {
            return false;
        }
        if let Some(location) = &mut self.config.location {
            location.set_fragment(Some(fragment));
        }
        true
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn theme(&self) -> ThemeMode {
        current_theme(&self.doc)
    }

    /// `None` when the page has no mobile menu.
    pub fn menu_state(&self) -> Option<MenuState> {
        self.menu.as_ref().map(|m| m.state(&self.doc))
    }

    pub fn scroll_spy(&self) -> Option<&ScrollSpy> {
        self.spy.as_ref()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.spy.as_ref().and_then(ScrollSpy::active)
    }

    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    pub fn content_region(&self) -> Option<NodeId> {
        self.content
    }
}
