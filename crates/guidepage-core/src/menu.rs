//! The mobile navigation menu: a toggle button, a slide-in panel and a dimming overlay.
//!
//! Open/closed is not stored separately; it is read back from the panel's `active` class, so the
//! document is the single source of truth.
use crate::dom::Document;
use crate::dom::NodeId;
use crate::input::KeyCode;
use crate::input::PageEvent;

pub const ACTIVE_CLASS: &str = "active";
pub const BODY_OPEN_CLASS: &str = "menu-open";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Debug)]
pub struct MobileMenu {
    toggle: NodeId,
    panel: NodeId,
    overlay: NodeId,
    close_keys: Vec<KeyCode>,
}

impl MobileMenu {
    /// Binds to the three menu elements; `None` unless all of them exist.
    pub fn attach(
        doc: &Document,
        toggle_id: &str,
        panel_id: &str,
        overlay_id: &str,
    ) -> Option<Self> {
        Some(Self {
            toggle: doc.get_element_by_id(toggle_id)?,
            panel: doc.get_element_by_id(panel_id)?,
            overlay: doc.get_element_by_id(overlay_id)?,
            close_keys: vec![KeyCode::Esc],
        })
    }

    /// Keys that close an open menu, whatever modifiers are held. Escape by default.
    pub fn with_close_keys(mut self, keys: Vec<KeyCode>) -> Self {
        self.close_keys = keys;
        self
    }

    pub fn close_keys(&self) -> &[KeyCode] {
        &self.close_keys
    }

    pub fn panel(&self) -> NodeId {
        self.panel
    }

    pub fn state(&self, doc: &Document) -> MenuState {
        if doc.has_class(self.panel, ACTIVE_CLASS) {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        self.state(doc) == MenuState::Open
    }

    pub fn open(&self, doc: &mut Document) {
        for node in [self.toggle, self.panel, self.overlay] {
            doc.add_class(node, ACTIVE_CLASS);
        }
        if let Some(body) = doc.body() {
            doc.add_class(body, BODY_OPEN_CLASS);
        }
        doc.set_attribute(self.toggle, "aria-expanded", "true");
    }

    pub fn close(&self, doc: &mut Document) {
        for node in [self.toggle, self.panel, self.overlay] {
            doc.remove_class(node, ACTIVE_CLASS);
        }
        if let Some(body) = doc.body() {
            doc.remove_class(body, BODY_OPEN_CLASS);
        }
        doc.set_attribute(self.toggle, "aria-expanded", "false");
    }

    pub fn toggle(&self, doc: &mut Document) -> MenuState {
        match self.state(doc) {
            MenuState::Closed => self.open(doc),
            MenuState::Open => self.close(doc),
        }
        self.state(doc)
    }

    /// Applies the menu's listeners to one event. Returns whether any of them fired.
    ///
    /// The listeners are independent: a click that lands on a link inside the panel closes the
    /// menu even though it is also inside the panel.
    pub fn handle_event(&self, doc: &mut Document, event: &PageEvent) -> bool {
        match event {
            PageEvent::Click(target) => {
                let target = *target;
                let mut handled = false;
                if doc.contains(self.toggle, target) {
                    let state = self.toggle(doc);
                    tracing::debug!(?state, "menu toggled");
                    handled = true;
                }
                if doc.contains(self.overlay, target) {
                    self.close(doc);
                    handled = true;
                }
                if doc.contains(self.panel, target) && doc.is_tag(target, "a") {
                    self.close(doc);
                    handled = true;
                }
                handled
            }
            PageEvent::KeyDown(key) if self.close_keys.contains(&key.code) && self.is_open(doc) => {
                self.close(doc);
                true
            }
            _ => false,
        }
    }
}
