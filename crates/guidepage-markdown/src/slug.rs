use std::collections::HashMap;
use std::collections::HashSet;

/// Turns heading text into an anchor id.
///
/// Lowercases, drops everything that is not an ASCII word character (`[a-z0-9_]`), whitespace
/// or `-`, then joins the remaining words with single dashes. Dropped characters do not split
/// words: `"Don't panic"` becomes `dont-panic`, `"Café Überblick"` becomes `caf-berblick`.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        }
    }
    out
}

/// Hands out unique anchor ids for one render.
///
/// The first heading with a given slug gets it bare; later ones get `-2`, `-3`, ... in encounter
/// order. A suffixed id that is already taken (say, by a heading literally titled `Intro 2`)
/// is skipped.
#[derive(Clone, Debug, Default)]
pub struct SlugRegistry {
    counts: HashMap<String, u32>,
    claimed: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.counts.entry(base.clone()).or_insert(0);
        *count += 1;

        let mut slug = if *count == 1 {
            base.clone()
        } else {
            format!("{base}-{count}")
        };
        while self.claimed.contains(&slug) {
            *count += 1;
            slug = format!("{base}-{count}");
        }
        self.claimed.insert(slug.clone());
        slug
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
