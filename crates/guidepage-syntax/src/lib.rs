//! Code block highlighting backends for `guidepage`.
//!
//! The [`CodeHighlighter`] capability itself lives in `guidepage-core` (the page controller only
//! needs the trait); this crate provides the implementations:
//! - `syntect` (feature: `syntect`): class-based `<span>` markup, styled by a theme stylesheet.
//!
//! [`auto::default_highlighter`] picks whatever backend was compiled in.
pub use guidepage_core::highlight::CodeHighlighter;
pub use guidepage_core::highlight::NoHighlight;

#[cfg(feature = "syntect")]
pub mod syntect;

pub mod auto;
