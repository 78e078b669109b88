use crate::slug::SlugRegistry;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use pulldown_cmark::html;
use serde::Deserialize;
use serde::Serialize;

pub const TABLE_CONTAINER_CLASS: &str = "table-container";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// GitHub flavored extensions: tables, strikethrough, task lists, footnotes.
    pub gfm: bool,
    /// Render soft line breaks as `<br />`.
    pub breaks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: false,
        }
    }
}

impl RenderOptions {
    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        options
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedHeading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedMarkdown {
    pub html: String,
    pub headings: Vec<RenderedHeading>,
}

/// Markdown to (unsanitized) HTML.
///
/// Every heading carries an `id` from a per-call [`SlugRegistry`], and every table is wrapped in a
/// `div.table-container` so wide tables scroll on their own.
#[derive(Clone, Debug, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn render(&self, markdown: &str) -> RenderedMarkdown {
        let parser = Parser::new_ext(markdown, self.options.parser_options());
        let mut registry = SlugRegistry::new();
        let mut headings = Vec::new();
        let mut events: Vec<Event<'_>> = Vec::new();
        // Some((level, buffered inner events)) while inside a heading.
        let mut heading: Option<(HeadingLevel, Vec<Event<'_>>)> = None;

        for event in parser {
            let event = match event {
                Event::SoftBreak if self.options.breaks => Event::HardBreak,
                other => other,
            };

            if let Some((level, inner)) = heading.as_mut() {
                if let Event::End(TagEnd::Heading(_)) = event {
                    let level = *level;
                    let inner = std::mem::take(inner);
                    heading = None;

                    let text = plain_text(&inner);
                    let id = registry.claim(&text);
                    let n = level as u8;
                    events.push(Event::Html(CowStr::from(format!("<h{n} id=\"{id}\">"))));
                    events.extend(inner);
                    events.push(Event::Html(CowStr::from(format!("</h{n}>\n"))));
                    headings.push(RenderedHeading { level: n, id, text });
                } else {
                    inner.push(event);
                }
                continue;
            }

            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((level, Vec::new()));
                }
                Event::Start(Tag::Table(aligns)) => {
                    events.push(Event::Html(CowStr::from(format!(
                        "<div class=\"{TABLE_CONTAINER_CLASS}\">"
                    ))));
                    events.push(Event::Start(Tag::Table(aligns)));
                }
                Event::End(TagEnd::Table) => {
                    events.push(Event::End(TagEnd::Table));
                    events.push(Event::Html(CowStr::from("</div>\n")));
                }
                other => events.push(other),
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        tracing::debug!(
            bytes = out.len(),
            headings = headings.len(),
            "rendered markdown"
        );
        RenderedMarkdown {
            html: out,
            headings,
        }
    }
}

fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}
