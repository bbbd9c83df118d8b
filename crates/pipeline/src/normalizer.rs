//! Cleanup of scraped film names.
//!
//! Encyclopedia tables decorate titles with footnote references (`[1]`,
//! `[a]`, `[note 3]`) and winner glyphs (`§ † ‡ *`). Those never belong to
//! the title and get in the way of matching.

use regex::Regex;
use std::sync::LazyLock;

static FOOTNOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("footnote pattern is valid"));

const FOOTNOTE_GLYPHS: [char; 4] = ['§', '†', '‡', '*'];

/// Canonicalizes raw award-table text.
///
/// `normalize` is idempotent: applying it to its own output is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    strip_trailing_period: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also drop trailing periods ("Good Night, and Good Luck." -> "... Luck")
    pub fn with_strip_trailing_period(mut self, strip: bool) -> Self {
        self.strip_trailing_period = strip;
        self
    }

    /// Clean one cell of scraped text.
    ///
    /// 1. Remove bracketed footnote markers
    /// 2. Remove footnote glyphs
    /// 3. Collapse whitespace runs and trim
    /// 4. Optionally strip trailing periods
    ///
    /// Returns an empty string for input with nothing left, which callers
    /// treat as "no film".
    pub fn normalize(&self, raw: &str) -> String {
        let without_markers = FOOTNOTE_MARKER.replace_all(raw, "");
        let without_glyphs: String = without_markers
            .chars()
            .filter(|c| !FOOTNOTE_GLYPHS.contains(c))
            .collect();

        let collapsed = without_glyphs.split_whitespace().collect::<Vec<_>>().join(" ");

        if self.strip_trailing_period {
            collapsed
                .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
                .to_string()
        } else {
            collapsed
        }
    }
}

/// Normalize with the default settings.
pub fn normalize(raw: &str) -> String {
    Normalizer::new().normalize(raw)
}
