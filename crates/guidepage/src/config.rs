use crate::error::ConfigError;
use guidepage_markdown::RenderOptions;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SOURCES: &[&str] = &[
    "../GUIDE.md",
    "https://raw.githubusercontent.com/TheDecipherist/claude-code-mastery/main/GUIDE.md",
];

pub const DEFAULT_SOURCE_LINK: &str =
    "https://github.com/TheDecipherist/claude-code-mastery/blob/main/GUIDE.md";

/// Ids of the elements the page controller wires up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageIds {
    pub theme_toggle: String,
    pub menu_toggle: String,
    pub mobile_menu: String,
    pub mobile_menu_overlay: String,
    pub content: String,
    pub toc: String,
    pub mobile_toc: String,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            theme_toggle: "theme-toggle".to_string(),
            menu_toggle: "menu-toggle".to_string(),
            mobile_menu: "mobile-menu".to_string(),
            mobile_menu_overlay: "mobile-menu-overlay".to_string(),
            content: "content".to_string(),
            toc: "toc".to_string(),
            mobile_toc: "mobile-toc".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSpyConfig {
    /// Share of the viewport height cut from the top of the observation band.
    pub top_margin_percent: u32,
    /// Share of the viewport height cut from the bottom of the observation band.
    pub bottom_margin_percent: u32,
    /// Delay between content injection and the spy starting.
    pub start_delay_ms: u64,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self {
            top_margin_percent: 10,
            bottom_margin_percent: 85,
            start_delay_ms: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// URL of the page itself; relative sources resolve against it and its fragment is the
    /// initial scroll target.
    pub location: Option<Url>,
    /// Content sources, tried in order.
    pub sources: Vec<String>,
    /// Where the error panel sends readers when nothing could be loaded.
    pub source_link: String,
    pub ids: PageIds,
    pub theme_storage_key: String,
    pub scroll_spy: ScrollSpyConfig,
    pub hash_scroll_delay_ms: u64,
    /// Per-source fetch timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Initial viewport height, until the embedder reports a resize.
    pub viewport_height: u32,
    pub render: RenderOptions,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            location: None,
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            source_link: DEFAULT_SOURCE_LINK.to_string(),
            ids: PageIds::default(),
            theme_storage_key: guidepage_core::theme::DEFAULT_STORAGE_KEY.to_string(),
            scroll_spy: ScrollSpyConfig::default(),
            hash_scroll_delay_ms: 150,
            request_timeout_secs: None,
            viewport_height: 800,
            render: RenderOptions::default(),
        }
    }
}

impl PageConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn with_location(mut self, location: Url) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// The raw (still percent-encoded) fragment of [`PageConfig::location`], if non-empty.
    pub fn fragment(&self) -> Option<&str> {
        self.location
            .as_ref()
            .and_then(Url::fragment)
            .filter(|f| !f.is_empty())
    }
}
