//! Syntax-tree adapter
//!
//! Parses the document with comrak and projects node source positions onto
//! the same per-line token map the line-mode adapter produces. comrak
//! reports 1-based lines and 1-based byte columns with inclusive ends.

use super::tokens::{LineTokens, TokenMap, TokenType};
use super::{Position, Range, TextBuffer, TextDocument, Token};
use crate::string_utils::{byte_to_column, char_len};
use comrak::nodes::{AstNode, NodeValue, Sourcepos};
use comrak::{parse_document, Arena, Options};

// ─────────────────────────────────────────────────────────────────────────────
// TreeBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// [`TextBuffer`] whose classification comes from comrak's syntax tree.
#[derive(Debug, Clone)]
pub struct TreeBuffer {
    doc: TextDocument,
    tokens: TokenMap,
}

impl Default for TreeBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl TreeBuffer {
    pub fn from_text(text: &str) -> Self {
        Self::from_document(TextDocument::from_text(text))
    }

    pub fn from_document(doc: TextDocument) -> Self {
        let tokens = classify(doc.lines());
        Self { doc, tokens }
    }

    pub fn document(&self) -> &TextDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut TextDocument {
        &mut self.doc
    }

    pub fn into_document(self) -> TextDocument {
        self.doc
    }

    fn reparse(&mut self) {
        self.tokens = classify(self.doc.lines());
    }
}

impl TextBuffer for TreeBuffer {
    fn selection(&self) -> Range {
        self.doc.selection()
    }

    fn set_selection(&mut self, range: Range) {
        self.doc.set_selection(range);
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.doc.line(index)
    }

    fn line_count(&self) -> usize {
        self.doc.line_count()
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let version = self.doc.version();
        self.doc.replace_range(text, from, to);
        if self.doc.version() != version {
            self.reparse();
        }
    }

    fn token_at(&self, pos: Position) -> Token {
        self.tokens.token_at(pos)
    }

    fn text(&self) -> String {
        self.doc.text()
    }

    fn begin_edit_group(&mut self) {
        self.doc.begin_edit_group();
    }

    fn end_edit_group(&mut self) {
        self.doc.end_edit_group();
    }

    fn undo(&mut self) -> bool {
        let undone = self.doc.undo();
        if undone {
            self.reparse();
        }
        undone
    }

    fn redo(&mut self) -> bool {
        let redone = self.doc.redo();
        if redone {
            self.reparse();
        }
        redone
    }

    fn is_preview_active(&self) -> bool {
        self.doc.is_preview_active()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Projection
// ─────────────────────────────────────────────────────────────────────────────

fn parse_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.tasklist = true;
    options
}

/// Build the token map for `lines` from a fresh parse.
fn classify(lines: &[String]) -> TokenMap {
    let arena = Arena::new();
    let source = lines.join("\n");
    let root = parse_document(&arena, &source, &parse_options());

    let mut map = TokenMap {
        lines: lines
            .iter()
            .map(|line| LineTokens::with_len(char_len(line)))
            .collect(),
    };

    for node in root.descendants() {
        project(node, lines, &mut map);
    }
    map
}

fn project<'a>(node: &'a AstNode<'a>, lines: &[String], map: &mut TokenMap) {
    let ast = node.data.borrow();
    let pos = ast.sourcepos;
    if pos.start.line == 0 {
        return;
    }

    match &ast.value {
        NodeValue::Strong => mark_span(map, lines, pos, TokenType::Strong),
        NodeValue::Emph => mark_span(map, lines, pos, TokenType::Em),
        NodeValue::Strikethrough => mark_span(map, lines, pos, TokenType::Strikethrough),
        NodeValue::Code(code) => {
            // Sourcepos covers the content only; the backtick runs belong to the span
            let mut span = pos;
            span.start.column = span.start.column.saturating_sub(code.num_backticks).max(1);
            span.end.column += code.num_backticks;
            mark_span(map, lines, span, TokenType::Code);
        }
        NodeValue::Link(_) => mark_span(map, lines, pos, TokenType::Link),
        NodeValue::Image(_) => mark_span(map, lines, pos, TokenType::Image),
        NodeValue::Heading(heading) => {
            for_lines(map, pos, |line| line.mark_line(TokenType::Header(heading.level)));
        }
        NodeValue::BlockQuote => {
            for_lines(map, pos, |line| line.mark_line(TokenType::Quote));
        }
        NodeValue::Item(_) | NodeValue::TaskItem(_) => {
            // Marker line plus continuation lines; blank separators are not
            let last = pos.end.line.max(pos.start.line);
            for index in pos.start.line - 1..last.min(lines.len()) {
                if !lines[index].trim().is_empty() {
                    map.lines[index].mark_line(TokenType::ListItem);
                }
            }
        }
        NodeValue::Table(_) => {
            for_lines(map, pos, |line| line.mark_line(TokenType::Table));
        }
        NodeValue::CodeBlock(block) if block.fenced => {
            let fence = std::iter::repeat(block.fence_char as char)
                .take(block.fence_length)
                .collect::<String>();
            let first = pos.start.line - 1;
            let last = (pos.end.line.max(pos.start.line) - 1).min(lines.len().saturating_sub(1));
            for index in first..=last {
                let Some(line) = map.lines.get_mut(index) else {
                    break;
                };
                line.mark_line(TokenType::Code);
                line.fence_chars = Some(fence.clone());
                let closing = index > first
                    && index == last
                    && is_closing_fence(&lines[index], block.fence_char as char, block.fence_length);
                line.fence_line = index == first || closing;
                line.fence_open = index == first;
            }
        }
        NodeValue::CodeBlock(_) => {
            for index in pos.start.line - 1..pos.end.line.min(lines.len()) {
                if lines[index].trim().is_empty() {
                    continue;
                }
                let line = &mut map.lines[index];
                line.mark_line(TokenType::Code);
                line.indented_code = true;
            }
        }
        _ => {}
    }
}

fn for_lines(map: &mut TokenMap, pos: Sourcepos, mut f: impl FnMut(&mut LineTokens)) {
    let last = pos.end.line.max(pos.start.line);
    for index in pos.start.line - 1..last {
        if let Some(line) = map.lines.get_mut(index) {
            f(line);
        }
    }
}

/// Mark an inline span, converting comrak byte columns to char columns.
fn mark_span(map: &mut TokenMap, lines: &[String], pos: Sourcepos, kind: TokenType) {
    let (start_line, end_line) = (pos.start.line - 1, pos.end.line.max(1) - 1);
    for index in start_line..=end_line.max(start_line) {
        let (Some(text), Some(line)) = (lines.get(index), map.lines.get_mut(index)) else {
            break;
        };
        let from = if index == start_line {
            byte_to_column(text, pos.start.column.saturating_sub(1))
        } else {
            0
        };
        let to = if index == end_line {
            byte_to_column(text, pos.end.column)
        } else {
            char_len(text)
        };
        line.mark(from, to, kind);
    }
}

fn is_closing_fence(text: &str, marker: char, len: usize) -> bool {
    let trimmed = text.trim();
    let run = trimmed.chars().take_while(|&c| c == marker).count();
    run >= len && run == char_len(trimmed)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
