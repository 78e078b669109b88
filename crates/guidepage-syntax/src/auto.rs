use guidepage_core::highlight::CodeHighlighter;

#[cfg(feature = "syntect")]
use crate::syntect::SyntectHighlighter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlighterBackend {
    Syntect,
    None,
}

/// The backend [`default_highlighter`] will return.
pub fn available_backend() -> HighlighterBackend {
    #[cfg(feature = "syntect")]
    {
        HighlighterBackend::Syntect
    }
    #[cfg(not(feature = "syntect"))]
    {
        HighlighterBackend::None
    }
}

/// The best highlighter compiled into this build, if any.
pub fn default_highlighter() -> Option<Box<dyn CodeHighlighter + Send + Sync>> {
    #[cfg(feature = "syntect")]
    {
        Some(Box::new(SyntectHighlighter::new()))
    }
    #[cfg(not(feature = "syntect"))]
    {
        None
    }
}
