//! Text buffer abstraction consumed by the command engine
//!
//! Commands never touch an editing surface directly. They talk to a
//! [`TextBuffer`]: selection get/set, line lookup, range replacement and a
//! flat "what is the lexical classification here" query. Two adapters are
//! provided, both backed by the same [`TextDocument`] storage:
//!
//! - [`ModeBuffer`]: a line-mode tokenizer that scans the document line by
//!   line, carrying fence and indented-code state between lines.
//! - [`TreeBuffer`]: classifies positions from comrak's syntax tree and its
//!   source positions.
//!
//! # Example
//! ```ignore
//! use mdtoggle::buffer::{ModeBuffer, Position, Range, TextBuffer};
//!
//! let mut buffer = ModeBuffer::from_text("hello world");
//! buffer.set_selection(Range::new(Position::new(0, 6), Position::new(0, 11)));
//! assert_eq!(buffer.selected_text(), "world");
//! ```

mod document;
mod mode;
mod tokens;
mod tree;

pub use document::TextDocument;
pub use mode::ModeBuffer;
pub use tokens::{Token, TokenType};
pub use tree::TreeBuffer;

use crate::error::{Error, Result};
use crate::string_utils::{char_len, split_at_column};

// ─────────────────────────────────────────────────────────────────────────────
// Positions and Ranges
// ─────────────────────────────────────────────────────────────────────────────

/// A buffer-relative position. Both fields are zero-based; `column` counts
/// characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Column zero of `line`.
    pub fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }

    /// A column past any real line length; `replace_range` reads it as
    /// "end of line".
    pub fn line_end(line: usize) -> Self {
        Self {
            line,
            column: usize::MAX,
        }
    }
}

/// A selection range. `start == end` is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }.normalize()
    }

    pub fn cursor(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }

    pub fn is_multi_line(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TextBuffer Trait
// ─────────────────────────────────────────────────────────────────────────────

/// The editing surface as seen by the command engine.
pub trait TextBuffer {
    /// Current primary selection, normalized.
    fn selection(&self) -> Range;

    /// Replace the selection. Implementations clamp both ends into bounds.
    fn set_selection(&mut self, range: Range);

    /// Text of line `index` without its line terminator.
    fn line(&self, index: usize) -> Option<&str>;

    /// Number of lines; an empty buffer still has one (empty) line.
    fn line_count(&self) -> usize;

    /// Replace the half-open range `[from, to)` with `text`.
    ///
    /// A `to` column past the line length means end of line, a `to` line
    /// past the last line means end of document.
    fn replace_range(&mut self, text: &str, from: Position, to: Position);

    /// Lexical classification of the character just before `pos`
    /// (or the first character when `pos` is at column zero).
    fn token_at(&self, pos: Position) -> Token;

    /// Whole document text, lines joined with `\n`.
    fn text(&self) -> String;

    /// Open an undo group; nested groups fold into the outermost one.
    fn begin_edit_group(&mut self);

    /// Close the innermost undo group.
    fn end_edit_group(&mut self);

    /// Step back one history entry. Returns `false` when there is none.
    fn undo(&mut self) -> bool;

    /// Step forward one history entry. Returns `false` when there is none.
    fn redo(&mut self) -> bool;

    /// Advisory: give keyboard focus back to the surface.
    fn focus(&mut self) {}

    /// Whether the surface currently shows a render-only preview.
    fn is_preview_active(&self) -> bool {
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Provided helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Like [`TextBuffer::line`], but a missing line is a programming error.
    fn line_text(&self, index: usize) -> Result<&str> {
        self.line(index).ok_or(Error::InvalidLine {
            line: index,
            line_count: self.line_count(),
        })
    }

    /// Length of line `index` in characters (zero for a missing line).
    fn line_len(&self, index: usize) -> usize {
        self.line(index).map(char_len).unwrap_or(0)
    }

    /// Position just past the last character of the document.
    fn end_of_document(&self) -> Position {
        let last = self.line_count().saturating_sub(1);
        Position::new(last, self.line_len(last))
    }

    /// Replace the whole text of line `index`.
    fn set_line(&mut self, index: usize, text: &str) {
        self.replace_range(text, Position::line_start(index), Position::line_end(index));
    }

    /// Text covered by the current selection.
    fn selected_text(&self) -> String {
        let Range { start, end } = self.selection();
        let mut out = String::new();
        for index in start.line..=end.line {
            let line = self.line(index).unwrap_or("");
            let from = if index == start.line { start.column } else { 0 };
            let (_, rest) = split_at_column(line, from);
            if index == end.line {
                let to = end.column.saturating_sub(from);
                out.push_str(split_at_column(rest, to).0);
            } else {
                out.push_str(rest);
                out.push('\n');
            }
        }
        out
    }

    /// Replace the selection with `text`, leaving a cursor after it.
    fn replace_selection(&mut self, text: &str) {
        let Range { start, end } = self.selection();
        self.replace_range(text, start, end);
        self.set_selection(Range::cursor(position_after(start, text)));
    }
}

/// Where the cursor lands after inserting `text` at `start`.
pub fn position_after(start: Position, text: &str) -> Position {
    match text.rfind('\n') {
        Some(idx) => Position::new(
            start.line + text.matches('\n').count(),
            char_len(&text[idx + 1..]),
        ),
        None => Position::new(start.line, start.column + char_len(text)),
    }
}

/// Run `f` inside one edit group so it undoes as a single step.
///
/// The group is closed on every return path of `f`, including early
/// returns and errors.
pub fn grouped<B, T, F>(buffer: &mut B, f: F) -> Result<T>
where
    B: TextBuffer + ?Sized,
    F: FnOnce(&mut B) -> Result<T>,
{
    buffer.begin_edit_group();
    let result = f(buffer);
    buffer.end_edit_group();
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
