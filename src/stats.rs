//! Text statistics for the status line
//!
//! Word counting is CJK-aware: every Han, Hiragana or Hangul character is a
//! word of its own, while Latin, Greek and Cyrillic runs count once.

use crate::buffer::Position;
use crate::patterns;

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Text statistics for a document.
///
/// # Example
///
/// ```ignore
/// let stats = TextStats::from_text("Hello 世界\nagain");
/// assert_eq!(stats.words, 4);
/// assert_eq!(stats.lines, 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Number of words (CJK characters count one each)
    pub words: usize,
    /// Number of characters including whitespace
    pub characters: usize,
    /// Number of characters excluding whitespace
    pub characters_no_spaces: usize,
    /// Number of lines (including empty lines)
    pub lines: usize,
}

impl TextStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate statistics from the given text.
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self::new();
        stats.words = count_words(text);
        stats.lines = text.matches('\n').count() + 1;
        for ch in text.chars() {
            stats.characters += 1;
            if !ch.is_whitespace() {
                stats.characters_no_spaces += 1;
            }
        }
        stats
    }

    /// Format the statistics for display in the status bar.
    ///
    /// Returns a compact string like "150 words | 892 chars | 25 lines"
    pub fn format_compact(&self) -> String {
        format!(
            "{} words | {} chars | {} lines",
            self.words, self.characters, self.lines
        )
    }
}

/// Count words the way the status line does.
pub fn count_words(text: &str) -> usize {
    patterns::word().find_iter(text).count()
}

/// One-based `line:column` label for a cursor position.
pub fn cursor_label(pos: Position) -> String {
    format!("{}:{}", pos.line + 1, pos.column + 1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
