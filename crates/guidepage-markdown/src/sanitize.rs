use ammonia::Builder;

/// Allow-list HTML sanitizer for rendered guide content.
///
/// Starts from ammonia's safe defaults and widens them for what guide pages need: heading anchors
/// and language classes (`id`, `class`), link targets (`target`, `rel`), embedded videos
/// (`iframe`) and task-list checkboxes. Scripts are removed together with their content.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .add_tags(["iframe", "input"])
            .add_generic_attributes(["id", "class", "target", "rel"])
            .add_tag_attributes("iframe", ["src", "width", "height", "title", "loading"])
            .add_tag_attributes("input", ["type", "checked", "disabled"])
            // `rel` is passed through as written instead of being forced to `noopener noreferrer`.
            .link_rel(None);
        Self { builder }
    }

    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer").finish_non_exhaustive()
    }
}
