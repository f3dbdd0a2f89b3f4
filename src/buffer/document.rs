//! Line storage, selection and undo history shared by both adapters
//!
//! `TextDocument` keeps the text as a vector of lines (CodeMirror-style:
//! a trailing newline produces a final empty line) and records snapshot
//! history the way the editor tabs always have: every edit outside a group
//! pushes the previous state, a group pushes once when it closes.

use super::{Position, Range};
use crate::string_utils::{char_len, column_to_byte};
use log::debug;

/// Maximum number of undo snapshots kept per document.
const MAX_UNDO_SIZE: usize = 100;

/// One history entry.
#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    lines: Vec<String>,
    selection: Range,
}

/// Plain text storage with selection, edit groups and undo/redo.
#[derive(Debug, Clone)]
pub struct TextDocument {
    lines: Vec<String>,
    selection: Range,
    /// Undo history stack
    undo_stack: Vec<Snapshot>,
    /// Redo history stack
    redo_stack: Vec<Snapshot>,
    /// Nesting depth of open edit groups
    group_depth: usize,
    /// State captured when the outermost group opened
    group_snapshot: Option<Snapshot>,
    /// Render-only preview mode; commands refuse to run while set
    preview_active: bool,
    /// Incremented on every content change
    version: u64,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl TextDocument {
    /// Create a document from text, cursor at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            selection: Range::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            group_depth: 0,
            group_snapshot: None,
            preview_active: false,
            version: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn selection(&self) -> Range {
        self.selection
    }

    pub fn set_selection(&mut self, range: Range) {
        let range = range.normalize();
        self.selection = Range {
            start: self.clip(range.start),
            end: self.clip(range.end),
        };
    }

    pub fn is_preview_active(&self) -> bool {
        self.preview_active
    }

    /// Toggle the render-only preview flag.
    pub fn set_preview_active(&mut self, active: bool) {
        self.preview_active = active;
    }

    /// Content version counter, bumped on every change (including undo/redo).
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Position Conversion
    // ─────────────────────────────────────────────────────────────────────────

    /// Clamp a position into the document.
    pub fn clip(&self, pos: Position) -> Position {
        let last = self.lines.len().saturating_sub(1);
        if pos.line > last {
            return Position::new(last, char_len(&self.lines[last]));
        }
        let len = char_len(&self.lines[pos.line]);
        Position::new(pos.line, pos.column.min(len))
    }

    /// Flat character offset of a position (newlines count as one char).
    pub fn offset_of(&self, pos: Position) -> usize {
        let pos = self.clip(pos);
        let before: usize = self.lines[..pos.line]
            .iter()
            .map(|line| char_len(line) + 1)
            .sum();
        before + pos.column
    }

    /// Position of a flat character offset, clamped to the document end.
    pub fn position_of(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (index, line) in self.lines.iter().enumerate() {
            let len = char_len(line);
            if remaining <= len {
                return Position::new(index, remaining);
            }
            remaining -= len + 1;
        }
        self.clip(Position::new(usize::MAX, 0))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace `[from, to)` with `text`. Out-of-range ends are clipped.
    pub fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let (from, to) = {
            let a = self.clip(from);
            let b = self.clip(to);
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };

        let first = &self.lines[from.line];
        let last = &self.lines[to.line];
        let mut joined = String::with_capacity(first.len() + text.len() + last.len());
        joined.push_str(&first[..column_to_byte(first, from.column)]);
        joined.push_str(text);
        joined.push_str(&last[column_to_byte(last, to.column)..]);

        let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();
        let unchanged = replacement.len() == to.line - from.line + 1
            && replacement
                .iter()
                .zip(&self.lines[from.line..=to.line])
                .all(|(a, b)| a == b);
        if unchanged {
            return;
        }

        self.record_edit();
        self.lines.splice(from.line..=to.line, replacement);
        self.version = self.version.wrapping_add(1);
        let selection = self.selection;
        self.set_selection(selection);
    }

    /// Push the current state to the undo stack unless a group is open.
    fn record_edit(&mut self) {
        if self.group_depth > 0 {
            return;
        }
        let snapshot = self.snapshot();
        self.push_undo(snapshot);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self.lines.clone(),
            selection: self.selection,
        }
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > MAX_UNDO_SIZE {
            self.undo_stack.remove(0);
        }
        // New edits invalidate redo history
        self.redo_stack.clear();
    }

    pub fn begin_edit_group(&mut self) {
        if self.group_depth == 0 {
            self.group_snapshot = Some(self.snapshot());
        }
        self.group_depth += 1;
    }

    pub fn end_edit_group(&mut self) {
        if self.group_depth == 0 {
            debug!("end_edit_group called without an open group");
            return;
        }
        self.group_depth -= 1;
        if self.group_depth == 0 {
            if let Some(snapshot) = self.group_snapshot.take() {
                if snapshot.lines != self.lines {
                    self.push_undo(snapshot);
                }
            }
        }
    }

    /// Undo the last edit (or edit group).
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = self.snapshot();
                self.redo_stack.push(current);
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = self.snapshot();
                self.undo_stack.push(current);
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.lines = snapshot.lines;
        self.version = self.version.wrapping_add(1);
        self.set_selection(snapshot.selection);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_newline_makes_empty_line() {
        let doc = TextDocument::from_text("a\n");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line(1), Some(""));
    }

    #[test]
    fn test_replace_within_line() {
        let mut doc = TextDocument::from_text("hello world");
        doc.replace_range("there", Position::new(0, 6), Position::new(0, 11));
        assert_eq!(doc.text(), "hello there");
    }

    #[test]
    fn test_replace_to_past_end_of_line() {
        let mut doc = TextDocument::from_text("abc\ndef");
        doc.replace_range("xyz", Position::line_start(0), Position::line_end(0));
        assert_eq!(doc.text(), "xyz\ndef");
    }

    #[test]
    fn test_replace_inserting_newlines() {
        let mut doc = TextDocument::from_text("abc");
        doc.replace_range("```\n", Position::line_start(0), Position::line_start(0));
        assert_eq!(doc.text(), "```\nabc");
        assert_eq!(doc.line_count(), 2);
    }

    #[test]
    fn test_delete_whole_line() {
        let mut doc = TextDocument::from_text("one\ntwo\nthree");
        doc.replace_range("", Position::line_start(1), Position::line_start(2));
        assert_eq!(doc.text(), "one\nthree");
    }

    #[test]
    fn test_replace_multibyte() {
        let mut doc = TextDocument::from_text("Hei på deg");
        doc.replace_range("**", Position::new(0, 6), Position::new(0, 6));
        assert_eq!(doc.text(), "Hei på** deg");
    }

    #[test]
    fn test_offset_roundtrip() {
        let doc = TextDocument::from_text("ab\ncde\n");
        assert_eq!(doc.offset_of(Position::new(1, 2)), 5);
        assert_eq!(doc.position_of(5), Position::new(1, 2));
        assert_eq!(doc.position_of(7), Position::new(2, 0));
        assert_eq!(doc.position_of(100), Position::new(2, 0));
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut doc = TextDocument::from_text("abc\nde");
        doc.set_selection(Range::new(Position::new(0, 10), Position::new(9, 9)));
        assert_eq!(doc.selection().start, Position::new(0, 3));
        assert_eq!(doc.selection().end, Position::new(1, 2));
    }

    #[test]
    fn test_undo_redo() {
        let mut doc = TextDocument::from_text("a");
        doc.replace_range("b", Position::new(0, 0), Position::new(0, 1));
        assert!(doc.can_undo());
        assert!(doc.undo());
        assert_eq!(doc.text(), "a");
        assert!(doc.redo());
        assert_eq!(doc.text(), "b");
        assert!(!doc.redo());
    }

    #[test]
    fn test_noop_replace_records_nothing() {
        let mut doc = TextDocument::from_text("same");
        doc.replace_range("same", Position::line_start(0), Position::line_end(0));
        assert!(!doc.can_undo());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn test_nested_groups_fold() {
        let mut doc = TextDocument::from_text("x");
        doc.begin_edit_group();
        doc.replace_range("y", Position::new(0, 0), Position::new(0, 1));
        doc.begin_edit_group();
        doc.replace_range("z", Position::new(0, 0), Position::new(0, 1));
        doc.end_edit_group();
        doc.end_edit_group();
        assert!(doc.undo());
        assert_eq!(doc.text(), "x");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_unbalanced_end_group_is_ignored() {
        let mut doc = TextDocument::from_text("x");
        doc.end_edit_group();
        doc.replace_range("y", Position::new(0, 0), Position::new(0, 1));
        assert!(doc.undo());
        assert_eq!(doc.text(), "x");
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut doc = TextDocument::from_text("0");
        for i in 1..=(MAX_UNDO_SIZE + 10) {
            doc.replace_range(&i.to_string(), Position::line_start(0), Position::line_end(0));
        }
        let mut undone = 0;
        while doc.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_SIZE);
    }
}
