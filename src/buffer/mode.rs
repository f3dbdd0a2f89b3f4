//! Line-mode tokenizer adapter
//!
//! Classifies the document the way a streaming editor mode does: one pass
//! over the lines, carrying only a little state from line to line (open
//! fence, paragraph, list, table). Inline constructs are found per line.
//! The result is re-derived after every edit.

use super::tokens::{LineTokens, TokenMap, TokenType};
use super::{Position, Range, TextBuffer, TextDocument, Token};
use crate::patterns;
use crate::string_utils::{byte_to_column, leading_whitespace};

// ─────────────────────────────────────────────────────────────────────────────
// ModeBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// [`TextBuffer`] backed by the line-mode tokenizer.
#[derive(Debug, Clone)]
pub struct ModeBuffer {
    doc: TextDocument,
    tokens: TokenMap,
}

impl Default for ModeBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl ModeBuffer {
    pub fn from_text(text: &str) -> Self {
        Self::from_document(TextDocument::from_text(text))
    }

    pub fn from_document(doc: TextDocument) -> Self {
        let tokens = tokenize(doc.lines());
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

    fn retokenize(&mut self) {
        self.tokens = tokenize(self.doc.lines());
    }
}

impl TextBuffer for ModeBuffer {
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
            self.retokenize();
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
            self.retokenize();
        }
        undone
    }

    fn redo(&mut self) -> bool {
        let redone = self.doc.redo();
        if redone {
            self.retokenize();
        }
        redone
    }

    fn is_preview_active(&self) -> bool {
        self.doc.is_preview_active()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// State carried from one line to the next.
#[derive(Debug, Default)]
struct ScanState {
    /// Open fence: marker char and run length
    fence: Option<(char, usize)>,
    /// Fence run as written on the opening line
    fence_chars: String,
    prev_blank: bool,
    in_paragraph: bool,
    in_list: bool,
    in_table: bool,
}

/// Classify every line of a document.
pub(crate) fn tokenize(lines: &[String]) -> TokenMap {
    let mut state = ScanState {
        prev_blank: true,
        ..ScanState::default()
    };
    let mut out = Vec::with_capacity(lines.len());

    for (index, text) in lines.iter().enumerate() {
        let chars: Vec<char> = text.chars().collect();
        let mut line = LineTokens::with_len(chars.len());

        if let Some((marker, len)) = state.fence {
            line.mark_line(TokenType::Code);
            line.fence_chars = Some(state.fence_chars.clone());
            if closes_fence(text, marker, len) {
                line.fence_line = true;
                state.fence = None;
            }
            out.push(line);
            continue;
        }

        if let Some(caps) = patterns::fence().captures(text) {
            let run = &caps[1];
            let marker = run.chars().next().unwrap_or('`');
            // Backtick fences may not carry backticks in their info string
            if marker == '~' || !caps[2].contains('`') {
                line.mark_line(TokenType::Code);
                line.fence_line = true;
                line.fence_open = true;
                line.fence_chars = Some(run.to_string());
                state.fence = Some((marker, run.chars().count()));
                state.fence_chars = run.to_string();
                state.in_paragraph = false;
                state.in_table = false;
                state.prev_blank = false;
                out.push(line);
                continue;
            }
        }

        if text.trim().is_empty() {
            state.prev_blank = true;
            state.in_paragraph = false;
            state.in_table = false;
            out.push(line);
            continue;
        }

        let indent = leading_whitespace(text);
        let tab_indented = text.starts_with('\t');
        if (indent >= 4 || tab_indented) && !state.in_paragraph && !state.in_list {
            line.mark_line(TokenType::Code);
            line.indented_code = true;
            state.prev_blank = false;
            out.push(line);
            continue;
        }

        let mut paragraph = true;
        if let Some(caps) = patterns::atx_heading().captures(text) {
            line.mark_line(TokenType::Header(caps[1].len() as u8));
            paragraph = false;
        }
        if patterns::quote_line().is_match(text) {
            line.mark_line(TokenType::Quote);
        }
        if patterns::list_item().is_match(text) {
            line.mark_line(TokenType::ListItem);
            state.in_list = true;
        } else if indent == 0 && state.prev_blank {
            state.in_list = false;
        } else if state.in_list && paragraph && !patterns::quote_line().is_match(text) {
            // Continuation of the item above
            line.mark_line(TokenType::ListItem);
        }

        if text.contains('|') {
            let next_is_delimiter = lines
                .get(index + 1)
                .map(|next| next.contains('|') && patterns::table_delimiter().is_match(next))
                .unwrap_or(false);
            if next_is_delimiter {
                state.in_table = true;
            }
            if state.in_table {
                line.mark_line(TokenType::Table);
            }
        } else {
            state.in_table = false;
        }

        scan_inline(&chars, text, &mut line);

        state.in_paragraph = paragraph;
        state.prev_blank = false;
        out.push(line);
    }

    TokenMap { lines: out }
}

/// Whether `text` closes a fence opened with `len` copies of `marker`.
fn closes_fence(text: &str, marker: char, len: usize) -> bool {
    let trimmed = text.trim_start_matches(' ');
    if text.len() - trimmed.len() > 3 {
        return false;
    }
    let run = trimmed.chars().take_while(|&c| c == marker).count();
    run >= len && trimmed.chars().skip(run).all(char::is_whitespace)
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// Mark code spans, links, images and emphasis on one line.
fn scan_inline(chars: &[char], text: &str, line: &mut LineTokens) {
    let mut in_code = vec![false; chars.len()];

    // Code spans: a backtick run closed by a run of the same length.
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '`' {
            i += 1;
            continue;
        }
        let open = run_length(chars, i, '`');
        let mut j = i + open;
        let mut closed = None;
        while j < chars.len() {
            if chars[j] == '`' {
                let run = run_length(chars, j, '`');
                if run == open {
                    closed = Some(j + run);
                    break;
                }
                j += run;
            } else {
                j += 1;
            }
        }
        match closed {
            Some(end) => {
                line.mark(i, end, TokenType::Code);
                in_code[i..end].iter_mut().for_each(|c| *c = true);
                i = end;
            }
            None => i += open,
        }
    }

    // Images first; a link match that starts right after `!` is the image.
    for m in patterns::image().find_iter(text) {
        let (from, to) = (byte_to_column(text, m.start()), byte_to_column(text, m.end()));
        if !in_code[from] {
            line.mark(from, to, TokenType::Image);
        }
    }
    for m in patterns::link().find_iter(text) {
        let (from, to) = (byte_to_column(text, m.start()), byte_to_column(text, m.end()));
        let after_bang = from > 0 && chars[from - 1] == '!';
        if !after_bang && !in_code[from] {
            line.mark(from, to, TokenType::Link);
        }
    }

    scan_emphasis(chars, &in_code, line);
}

/// Toggle strong / em / strikethrough on delimiter runs.
///
/// Delimiter characters carry the style they open or close, so a cursor
/// right after `**` already reads as bold.
fn scan_emphasis(chars: &[char], in_code: &[bool], line: &mut LineTokens) {
    let mut strong = false;
    let mut em = false;
    let mut strike = false;
    let mut i = 0;

    while i < chars.len() {
        if in_code[i] {
            i += 1;
            continue;
        }
        let c = chars[i];
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };

        if c == '~' {
            let run = run_length(chars, i, '~');
            if run >= 2 {
                let next = chars.get(i + run).copied();
                if strike && can_close(prev) {
                    line.mark(i, i + 2, TokenType::Strikethrough);
                    strike = false;
                } else if !strike && can_open(next) {
                    strike = true;
                    line.mark(i, i + 2, TokenType::Strikethrough);
                }
                apply_active(line, i, i + run, strong, em, strike);
            }
            i += run;
            continue;
        }

        if c == '*' || c == '_' {
            let run = run_length(chars, i, c);
            let next = chars.get(i + run).copied();
            let intraword = c == '_'
                && prev.map(char::is_alphanumeric).unwrap_or(false)
                && next.map(char::is_alphanumeric).unwrap_or(false);
            if intraword {
                apply_active(line, i, i + run, strong, em, strike);
                i += run;
                continue;
            }

            let mut pos = i;
            let mut remaining = run;
            while remaining >= 2 {
                let closing = strong && can_close(prev);
                if closing || can_open(next) {
                    if closing {
                        line.mark(pos, pos + 2, TokenType::Strong);
                        strong = false;
                    } else {
                        strong = !strong;
                        line.mark(pos, pos + 2, TokenType::Strong);
                    }
                } else {
                    break;
                }
                pos += 2;
                remaining -= 2;
            }
            if remaining == 1 {
                if em && can_close(prev) {
                    line.mark(pos, pos + 1, TokenType::Em);
                    em = false;
                } else if !em && can_open(next) {
                    em = true;
                    line.mark(pos, pos + 1, TokenType::Em);
                }
            }
            apply_active(line, i, i + run, strong, em, strike);
            i += run;
            continue;
        }

        apply_active(line, i, i + 1, strong, em, strike);
        i += 1;
    }
}

fn apply_active(line: &mut LineTokens, from: usize, to: usize, strong: bool, em: bool, strike: bool) {
    if strong {
        line.mark(from, to, TokenType::Strong);
    }
    if em {
        line.mark(from, to, TokenType::Em);
    }
    if strike {
        line.mark(from, to, TokenType::Strikethrough);
    }
}

fn can_open(next: Option<char>) -> bool {
    next.map(|c| !c.is_whitespace()).unwrap_or(false)
}

fn can_close(prev: Option<char>) -> bool {
    prev.map(|c| !c.is_whitespace()).unwrap_or(false)
}

fn run_length(chars: &[char], from: usize, c: char) -> usize {
    chars[from..].iter().take_while(|&&x| x == c).count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, line: usize, column: usize) -> Token {
        ModeBuffer::from_text(text).token_at(Position::new(line, column))
    }

    #[test]
    fn test_strong_span() {
        let text = "hello **world**";
        assert!(!token(text, 0, 6).has(TokenType::Strong));
        assert!(token(text, 0, 8).has(TokenType::Strong));
        assert!(token(text, 0, 12).has(TokenType::Strong));
        assert!(token(text, 0, 15).has(TokenType::Strong));
    }

    #[test]
    fn test_strong_em_nesting() {
        let text = "***both*** plain";
        let tok = token(text, 0, 5);
        assert!(tok.has(TokenType::Strong));
        assert!(tok.has(TokenType::Em));
        assert!(!token(text, 0, 13).has(TokenType::Strong));
    }

    #[test]
    fn test_em_and_strike() {
        assert!(token("an *odd* day", 0, 5).has(TokenType::Em));
        assert!(token("a ~~gone~~ b", 0, 6).has(TokenType::Strikethrough));
        assert!(!token("snake_case_name", 0, 8).has(TokenType::Em));
    }

    #[test]
    fn test_bullet_star_is_not_em() {
        let tok = token("* item", 0, 4);
        assert!(tok.has(TokenType::ListItem));
        assert!(!tok.has(TokenType::Em));
    }

    #[test]
    fn test_inline_code() {
        let text = "run `cargo` now";
        assert!(token(text, 0, 6).has(TokenType::Code));
        assert!(!token(text, 0, 2).has(TokenType::Code));
        assert!(token(text, 0, 6).fence_chars.is_none());
    }

    #[test]
    fn test_stars_inside_code_are_literal() {
        assert!(!token("`**` tail", 0, 7).has(TokenType::Strong));
    }

    #[test]
    fn test_link_and_image() {
        let text = "see [docs](https://x.io) and ![logo](a.png)";
        assert!(token(text, 0, 6).has(TokenType::Link));
        let img = token(text, 0, 33);
        assert!(img.has(TokenType::Image));
        assert!(!img.has(TokenType::Link));
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(token("### Title", 0, 5).header_level(), Some(3));
        assert_eq!(token("#hashtag", 0, 3).header_level(), None);
    }

    #[test]
    fn test_quote_and_lists() {
        assert!(token("> quoted", 0, 3).has(TokenType::Quote));
        assert!(token("1. first", 0, 4).has(TokenType::ListItem));
        assert!(token("- item", 0, 4).has(TokenType::ListItem));
        assert!(!token("plain", 0, 3).has(TokenType::ListItem));
    }

    #[test]
    fn test_fenced_block() {
        let text = "before\n```rust\nlet x = 1;\n\n```\nafter";
        let open = token(text, 1, 1);
        assert!(open.fence_line);
        assert!(open.has(TokenType::Code));
        assert_eq!(open.fence_chars.as_deref(), Some("```"));

        let body = token(text, 2, 3);
        assert!(body.has(TokenType::Code));
        assert!(!body.fence_line);

        // Blank line inside the fence still reads as code
        assert!(token(text, 3, 0).has(TokenType::Code));

        let close = token(text, 4, 1);
        assert!(close.fence_line);

        assert!(!token(text, 5, 2).has(TokenType::Code));
    }

    #[test]
    fn test_fence_open_flag_on_adjacent_blocks() {
        let text = "```\na\n```\n```\nb\n```";
        let flags: Vec<(bool, bool)> = (0..6)
            .map(|i| {
                let tok = token(text, i, 1);
                (tok.fence_line, tok.fence_open)
            })
            .collect();
        assert_eq!(
            flags,
            vec![
                (true, true),
                (false, false),
                (true, false),
                (true, true),
                (false, false),
                (true, false),
            ]
        );
    }

    #[test]
    fn test_tilde_fence_needs_matching_length() {
        let text = "~~~~\n~~~\nstill code\n~~~~\nout";
        assert!(token(text, 1, 1).has(TokenType::Code));
        assert!(!token(text, 1, 1).fence_line);
        assert!(token(text, 3, 1).fence_line);
        assert!(!token(text, 4, 1).has(TokenType::Code));
    }

    #[test]
    fn test_indented_code() {
        let text = "para\n\n    code line\n    more\n\nafter";
        let tok = token(text, 2, 6);
        assert!(tok.indented_code);
        assert!(tok.has(TokenType::Code));
        assert!(token(text, 3, 6).indented_code);
        assert!(!token(text, 5, 2).indented_code);
    }

    #[test]
    fn test_indented_paragraph_continuation_is_not_code() {
        let text = "para\n    continued";
        assert!(!token(text, 1, 6).indented_code);
    }

    #[test]
    fn test_indented_list_continuation_is_not_code() {
        let text = "- item\n\n    more of the item";
        assert!(!token(text, 2, 6).indented_code);
    }

    #[test]
    fn test_list_continuation_lines() {
        let text = "- a\n  more\nlazy\n\nafter";
        assert!(token(text, 1, 3).has(TokenType::ListItem));
        assert!(token(text, 2, 2).has(TokenType::ListItem));
        assert!(!token(text, 3, 0).has(TokenType::ListItem));
        assert!(!token(text, 4, 2).has(TokenType::ListItem));
    }

    #[test]
    fn test_table_rows() {
        let text = "| a | b |\n| --- | --- |\n| 1 | 2 |\n\nplain | pipe";
        assert!(token(text, 0, 2).has(TokenType::Table));
        assert!(token(text, 2, 2).has(TokenType::Table));
        assert!(!token(text, 4, 2).has(TokenType::Table));
    }

    #[test]
    fn test_retokenizes_after_edit() {
        let mut buffer = ModeBuffer::from_text("plain");
        buffer.set_line(0, "# plain");
        assert_eq!(
            buffer.token_at(Position::new(0, 3)).header_level(),
            Some(1)
        );
        assert!(buffer.undo());
        assert_eq!(buffer.token_at(Position::new(0, 3)).header_level(), None);
    }
}
