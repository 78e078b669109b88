//! `guidepage` drives a markdown guide page headlessly.
//!
//! A guide page is a static shell (see [`shell::DEFAULT_SHELL`]) plus a script that fetches the
//! guide, renders it, builds a table of contents and keeps the current section highlighted while
//! the reader scrolls. [`page::PageController`] is that script, operating on an in-memory
//! [`guidepage_core::Document`] instead of a browser DOM.
//!
//! ## Quick start
//!
//! ```no_run
//! use guidepage::PageConfig;
//! use guidepage::PageController;
//! use guidepage::shell::default_document;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PageConfig::default().with_sources(["GUIDE.md"]);
//! let mut page = PageController::new(default_document()?, config);
//! page.start().await;
//! page.settle();
//! println!("{}", page.document().to_html());
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! - `guidepage-core`: document tree, layout, viewport, input, storage, theme toggle, mobile menu.
//! - `guidepage-markdown`: markdown rendering, heading slugs, sanitizing.
//! - `guidepage-syntax` (feature `syntect`): code highlighting backends.
//! - this crate: configuration, content sources and loading, TOC, scroll spy, the controller.
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod page;
pub mod scroll_spy;
pub mod shell;
pub mod source;
pub mod toc;

pub use config::PageConfig;
pub use config::PageIds;
pub use config::ScrollSpyConfig;
pub use error::ConfigError;
pub use error::FetchError;
pub use error::LoadError;
pub use loader::ContentLoader;
pub use page::LoadState;
pub use page::PageController;
pub use source::ContentSource;
pub use toc::TocEntry;

pub use guidepage_core;
pub use guidepage_markdown;

#[cfg(feature = "syntect")]
pub use guidepage_syntax;
