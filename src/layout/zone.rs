use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::text::style::Stroke;

/// Layout role of a text layer; selects wrap width and default stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Narrow comment column on the left edge.
    LeftComment,
    /// Outlined comment strip near the bottom.
    BottomComment,
    #[default]
    Generic,
}

impl Zone {
    /// Characters per line before a forced break, if the zone wraps at all.
    pub const fn max_chars_per_line(self) -> Option<usize> {
        match self {
            Zone::LeftComment => Some(10),
            Zone::BottomComment => Some(15),
            Zone::Generic => None,
        }
    }

    /// Outline used when the caller does not ask for one explicitly.
    pub const fn default_stroke(self) -> Option<Stroke> {
        match self {
            Zone::BottomComment => Some(Stroke {
                color: Rgba8::BLACK,
                width: 2,
            }),
            Zone::LeftComment | Zone::Generic => None,
        }
    }

    /// Apply this zone's wrap rule to `text`.
    pub fn wrap(self, text: &str) -> String {
        match self.max_chars_per_line() {
            Some(n) => wrap_text(text, n),
            None => text.replace("\r\n", "\n"),
        }
    }
}

/// Greedy wrap by character count.
///
/// Existing line breaks are kept; each caller line is cut into chunks of at most `max_chars`
/// characters. CJK text has no spaces to break on, so words are not preserved.
pub fn wrap_text(text: &str, max_chars: usize) -> String {
    let max_chars = max_chars.max(1);
    let mut out: Vec<String> = Vec::new();
    for line in text.replace("\r\n", "\n").split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(max_chars) {
            out.push(chunk.iter().collect());
        }
    }
    out.join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/layout/zone.rs"]
mod tests;
