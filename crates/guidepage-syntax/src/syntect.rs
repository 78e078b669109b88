use guidepage_core::highlight::CodeHighlighter;
use syntect::highlighting::ThemeSet;
use syntect::html::ClassStyle;
use syntect::html::ClassedHTMLGenerator;
use syntect::html::css_for_theme_with_class_style;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Highlights with syntect's bundled grammars, emitting `<span class="...">` markup.
///
/// Colors come from a stylesheet ([`SyntectHighlighter::stylesheet`]), so one rendered page works
/// for both the light and the dark theme.
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    fn syntax_for(&self, language: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))
    }

    /// CSS for one of syntect's bundled themes (e.g. `"InspiredGitHub"`, `"base16-ocean.dark"`).
    pub fn stylesheet(theme_name: &str) -> Option<String> {
        let themes = ThemeSet::load_defaults();
        let theme = themes.themes.get(theme_name)?;
        css_for_theme_with_class_style(theme, ClassStyle::Spaced).ok()
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, language: Option<&str>, code: &str) -> Option<String> {
        let syntax = self.syntax_for(language?)?;
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!(error = %err, language = syntax.name.as_str(), "highlighting failed");
                return None;
            }
        }
        Some(generator.finalize())
    }
}
