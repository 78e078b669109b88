use guidepage_core::Document;
use guidepage_core::DomError;

/// A minimal guide page carrying every element the controller wires up, with the default ids.
pub const DEFAULT_SHELL: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Guide</title>
</head>
<body>
<header class="site-header">
<button id="menu-toggle" class="menu-toggle" aria-label="Open menu" aria-expanded="false"><span class="menu-icon"></span></button>
<a class="brand" href="#">Guide</a>
<button id="theme-toggle" class="theme-toggle" aria-label="Toggle theme"><span class="theme-icon"></span></button>
</header>
<div id="mobile-menu-overlay" class="mobile-menu-overlay"></div>
<aside id="mobile-menu" class="mobile-menu">
<nav id="mobile-toc" class="toc"><div class="toc-header">Contents</div></nav>
</aside>
<div class="layout">
<aside class="sidebar">
<nav id="toc" class="toc"><div class="toc-header">On this page</div></nav>
</aside>
<main id="content" class="content"><p class="loading">Loading guide...</p></main>
</div>
</body>
</html>
"##;

pub fn default_document() -> Result<Document, DomError> {
    Document::parse(DEFAULT_SHELL)
}
