//! `guidepage-core` provides the headless building blocks of a guide page.
//!
//! The page is an in-memory [`dom::Document`] that components mutate the same way a page script
//! mutates a browser DOM. Nothing here performs I/O on its own except [`storage::JsonFileStorage`];
//! fetching and markdown rendering live in the `guidepage` and `guidepage-markdown` crates.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: the embedder delivers [`input::PageEvent`]s and advances
//!   [`timer::TimerQueue`]s itself.
//! - No async runtime: every component runs to completion on the caller's thread.
//! - Missing page elements are not errors. Components that cannot find their elements simply do
//!   not attach (`attach` returns `None`).
//!
//! Useful entry points:
//! - [`dom::Document`]: arena-backed tree with id/class/attribute helpers.
//! - [`theme::ThemeToggle`] and [`menu::MobileMenu`]: the two interactive page components.
//! - [`layout::BlockLayout`]: approximate block layout so geometry-driven code can run headless.
//! - [`highlight::highlight_all`]: run a [`highlight::CodeHighlighter`] over every code block.
pub mod error;

pub mod dom;
pub mod html;
pub mod layout;
pub mod viewport;

pub mod highlight;
pub mod input;
pub mod menu;
pub mod storage;
pub mod theme;
pub mod timer;

pub use dom::Document;
pub use dom::NodeId;
pub use error::DomError;
pub use error::StorageError;
