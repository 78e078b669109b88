//! Highlights the TOC link of the section currently being read.
//!
//! Sections are watched through an [`IntersectionObserver`] whose band is the viewport shrunk by
//! a top and a bottom margin (by default the band sits between 10% and 15% of the viewport
//! height). Whenever a section enters the band, its links in both TOCs become `active`.
use crate::config::ScrollSpyConfig;
use crate::toc::find_link;
use crate::toc::toc_links;
use guidepage_core::Document;
use guidepage_core::NodeId;
use guidepage_core::layout::Rect;
use guidepage_core::viewport::ViewportState;

pub const ACTIVE_CLASS: &str = "active";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

/// Threshold-0 intersection tracking against a margin-adjusted viewport band.
///
/// The first observation reports every target; later ones report only targets whose
/// intersecting state flipped. Entries come out in the order targets were observed.
#[derive(Clone, Debug)]
pub struct IntersectionObserver {
    top_margin_percent: u32,
    bottom_margin_percent: u32,
    targets: Vec<NodeId>,
    last: Vec<Option<bool>>,
}

impl IntersectionObserver {
    pub fn new(top_margin_percent: u32, bottom_margin_percent: u32) -> Self {
        Self {
            top_margin_percent,
            bottom_margin_percent,
            targets: Vec::new(),
            last: Vec::new(),
        }
    }

    pub fn observe(&mut self, target: NodeId) {
        if !self.targets.contains(&target) {
            self.targets.push(target);
            self.last.push(None);
        }
    }

    pub fn disconnect(&mut self) {
        self.targets.clear();
        self.last.clear();
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn band(&self, viewport: &ViewportState) -> Rect {
        viewport.inset(self.top_margin_percent, self.bottom_margin_percent)
    }

    pub fn check(&mut self, doc: &Document, viewport: &ViewportState) -> Vec<IntersectionEntry> {
        let band = self.band(viewport);
        let mut entries = Vec::new();
        for (target, last) in self.targets.iter().zip(self.last.iter_mut()) {
            let is_intersecting = doc.rect(*target).is_some_and(|r| r.intersects(&band));
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: *target,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

#[derive(Clone, Debug)]
pub struct ScrollSpy {
    observer: IntersectionObserver,
    desktop_toc: Option<NodeId>,
    mobile_toc: Option<NodeId>,
    desktop_links: Vec<NodeId>,
    mobile_links: Vec<NodeId>,
    active: Option<String>,
}

impl ScrollSpy {
    /// Captures the current TOC links and starts watching every `h2[id]`/`h3[id]` under `content`.
    /// `None` when there is no such section.
    pub fn start(
        doc: &Document,
        content: NodeId,
        desktop_toc: Option<NodeId>,
        mobile_toc: Option<NodeId>,
        config: &ScrollSpyConfig,
    ) -> Option<Self> {
        let sections = doc.filter_descendants(content, |el| {
            matches!(el.tag.as_str(), "h2" | "h3") && el.attribute("id").is_some()
        });
        if sections.is_empty() {
            return None;
        }

        let mut observer =
            IntersectionObserver::new(config.top_margin_percent, config.bottom_margin_percent);
        for section in &sections {
            observer.observe(*section);
        }
        let links = |toc: Option<NodeId>| toc.map(|t| toc_links(doc, t)).unwrap_or_default();

        tracing::debug!(sections = sections.len(), "scroll spy started");
        Some(Self {
            observer,
            desktop_toc,
            mobile_toc,
            desktop_links: links(desktop_toc),
            mobile_links: links(mobile_toc),
            active: None,
        })
    }

    pub fn sections(&self) -> &[NodeId] {
        self.observer.targets()
    }

    /// Id of the section most recently activated.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Runs one observation and activates the links of every section that entered the band, in
    /// order; the last one stays active. Returns whether anything was activated.
    pub fn observe(&mut self, doc: &mut Document, viewport: &ViewportState) -> bool {
        let entries = self.observer.check(doc, viewport);
        let mut changed = false;
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(id) = doc.attribute(entry.target, "id").map(str::to_string) else {
                continue;
            };
            self.activate(doc, &id, viewport.viewport_h);
            changed = true;
        }
        changed
    }

    /// Marks the links to `#id` active in both TOCs, clearing every other captured link, and
    /// scrolls the desktop TOC so its link stays in view.
    pub fn activate(&mut self, doc: &mut Document, id: &str, viewport_h: u32) {
        for &link in self.desktop_links.iter().chain(self.mobile_links.iter()) {
            doc.remove_class(link, ACTIVE_CLASS);
        }

        if let Some(toc) = self.desktop_toc
            && let Some(link) = find_link(doc, toc, id)
        {
            doc.add_class(link, ACTIVE_CLASS);
            let offset = doc.rect(link).map_or(0, |r| r.top);
            let client_height = doc
                .rect(toc)
                .map_or(viewport_h, |r| r.height.min(viewport_h));
            if offset > client_height {
                doc.set_scroll_top(toc, offset - client_height / 2);
            }
        }
        if let Some(toc) = self.mobile_toc
            && let Some(link) = find_link(doc, toc, id)
        {
            doc.add_class(link, ACTIVE_CLASS);
        }

        tracing::trace!(section = id, "scroll spy activated section");
        self.active = Some(id.to_string());
    }
}
