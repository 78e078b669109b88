//! Light/dark theme switching.
//!
//! The theme is reflected as `data-theme` on the document element (CSS keys off it) and
//! persisted in [`Storage`] so the next session starts with the same choice.
use crate::dom::Document;
use crate::dom::NodeId;
use crate::storage::Storage;
use std::fmt;

pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const DEFAULT_STORAGE_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Reads the on-page marker: only `"dark"` is dark, anything else (or nothing) is light.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    /// Parses a stored preference; unknown values are not a preference.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn current_theme(doc: &Document) -> ThemeMode {
    let marker = doc
        .document_element()
        .and_then(|html| doc.attribute(html, THEME_ATTRIBUTE));
    ThemeMode::from_marker(marker)
}

pub fn apply_theme(doc: &mut Document, mode: ThemeMode) {
    if let Some(html) = doc.document_element() {
        doc.set_attribute(html, THEME_ATTRIBUTE, mode.as_str());
    }
}

/// Applies a previously stored preference, if there is a valid one.
pub fn restore_theme(doc: &mut Document, storage: &dyn Storage, key: &str) -> Option<ThemeMode> {
    let mode = storage.get(key).as_deref().and_then(ThemeMode::parse)?;
    apply_theme(doc, mode);
    Some(mode)
}

#[derive(Clone, Debug)]
pub struct ThemeToggle {
    control: NodeId,
    storage_key: String,
}

impl ThemeToggle {
    /// Binds to the element with id `control_id`; `None` when the page has no such control.
    pub fn attach(doc: &Document, control_id: &str, storage_key: impl Into<String>) -> Option<Self> {
        let control = doc.get_element_by_id(control_id)?;
        Some(Self {
            control,
            storage_key: storage_key.into(),
        })
    }

    pub fn control(&self) -> NodeId {
        self.control
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn handles_click(&self, doc: &Document, target: NodeId) -> bool {
        doc.contains(self.control, target)
    }

    /// Flips the theme on the page, then persists it. A failed write is logged; the page keeps the
    /// new theme either way.
    pub fn toggle(&self, doc: &mut Document, storage: &mut dyn Storage) -> ThemeMode {
        let next = current_theme(doc).toggled();
        apply_theme(doc, next);
        if let Err(err) = storage.set(&self.storage_key, next.as_str()) {
            tracing::warn!(error = %err, theme = %next, "failed to persist theme preference");
        }
        tracing::debug!(theme = %next, "theme toggled");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;

    fn page() -> (Document, ThemeToggle) {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<button id=\"theme-toggle\"><span>icon</span></button>")
            .unwrap();
        let toggle = ThemeToggle::attach(&doc, "theme-toggle", DEFAULT_STORAGE_KEY).unwrap();
        (doc, toggle)
    }

    #[test]
    fn missing_marker_counts_as_light() {
        let (mut doc, toggle) = page();
        let mut storage = MemoryStorage::new();
        assert_eq!(current_theme(&doc), ThemeMode::Light);
        assert_eq!(toggle.toggle(&mut doc, &mut storage), ThemeMode::Dark);
        assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn unknown_marker_counts_as_light() {
        let (mut doc, toggle) = page();
        let html = doc.document_element().unwrap();
        doc.set_attribute(html, THEME_ATTRIBUTE, "sepia");
        let mut storage = MemoryStorage::new();
        assert_eq!(toggle.toggle(&mut doc, &mut storage), ThemeMode::Dark);
    }

    #[test]
    fn toggle_twice_is_identity_and_storage_tracks_page() {
        for start in [None, Some(ThemeMode::Light), Some(ThemeMode::Dark)] {
            let (mut doc, toggle) = page();
            if let Some(mode) = start {
                apply_theme(&mut doc, mode);
            }
            let before = current_theme(&doc);
            let mut storage = MemoryStorage::new();
            toggle.toggle(&mut doc, &mut storage);
            toggle.toggle(&mut doc, &mut storage);
            assert_eq!(current_theme(&doc), before);
            assert_eq!(
                storage.get("theme").as_deref(),
                Some(current_theme(&doc).as_str())
            );
        }
    }

    #[test]
    fn click_inside_control_is_handled() {
        let (doc, toggle) = page();
        let span = doc.elements_by_tag(doc.root(), &["span"])[0];
        assert!(toggle.handles_click(&doc, span));
        assert!(!toggle.handles_click(&doc, doc.body().unwrap()));
    }

    #[test]
    fn missing_control_does_not_attach() {
        let doc = Document::new();
        assert!(ThemeToggle::attach(&doc, "theme-toggle", "theme").is_none());
    }

    #[test]
    fn restore_ignores_invalid_preference() {
        let mut doc = Document::new();
        let mut storage = MemoryStorage::new();
        storage.set("theme", "purple").unwrap();
        assert_eq!(restore_theme(&mut doc, &storage, "theme"), None);
        assert_eq!(current_theme(&doc), ThemeMode::Light);
        storage.set("theme", "dark").unwrap();
        assert_eq!(restore_theme(&mut doc, &storage, "theme"), Some(ThemeMode::Dark));
        assert_eq!(current_theme(&doc), ThemeMode::Dark);
    }

    struct ReadOnly;

    impl Storage for ReadOnly {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: key.to_string(),
                source: std::io::Error::other("quota exceeded"),
            })
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn failed_persist_keeps_page_theme() {
        let (mut doc, toggle) = page();
        assert_eq!(toggle.toggle(&mut doc, &mut ReadOnly), ThemeMode::Dark);
        assert_eq!(current_theme(&doc), ThemeMode::Dark);
    }
}
