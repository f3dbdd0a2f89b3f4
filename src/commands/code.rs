//! Code toggle
//!
//! The line under the cursor is classified first ([`code_type`]), then one
//! of four transforms runs:
//!
//! - `Single`: remove the backticks around an inline span
//! - `Fenced`: split a fenced block around the selection, or remove the
//!   fences of the block under a bare cursor
//! - `Indented`: un-indent the block, keeping any following indented lines
//!   code by inserting a separator line
//! - `None`: insert a fence (multi-line selection or cursor at column 0)
//!   or an inline backtick pair

use super::drawable::replace_selection;
use super::inline::{strip_first, strip_last};
use super::{in_preview, CommandEnv, Outcome};
use crate::buffer::{grouped, Position, Range, TextBuffer, Token, TokenType};
use crate::error::Result;
use crate::string_utils::split_at_column;
use log::debug;

/// How the code under a position is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeType {
    /// Inline backtick span
    Single,
    /// Inside or on the fence of a fenced block
    Fenced,
    /// Indented code block
    Indented,
    /// Not code
    None,
}

/// Whether line `index` is a fence delimiter. Missing lines are not.
fn is_fence_line(buffer: &dyn TextBuffer, index: usize) -> bool {
    index < buffer.line_count() && buffer.token_at(Position::new(index, 1)).fence_line
}

fn is_blank(buffer: &dyn TextBuffer, index: usize) -> bool {
    buffer.line(index).map(|l| l.trim().is_empty()).unwrap_or(true)
}

/// Classify line `index`. `first` is the token under the cursor when the
/// caller already has it; otherwise the start of the line is used.
///
/// Indentation is checked on the last character since the first characters
/// of an indented block are only whitespace.
pub fn code_type(buffer: &dyn TextBuffer, index: usize, first: Option<Token>) -> CodeType {
    let first = first.unwrap_or_else(|| buffer.token_at(Position::new(index, 1)));
    let len = buffer.line_len(index);
    let last = (len > 0).then(|| buffer.token_at(Position::new(index, len)));

    if last.as_ref().map(|t| t.indented_code).unwrap_or(false) {
        CodeType::Indented
    } else if !first.has(TokenType::Code) {
        CodeType::None
    } else if first.fence_chars.is_some()
        || last.as_ref().map(|t| t.fence_chars.is_some()).unwrap_or(false)
        || is_fence_line(buffer, index)
    {
        CodeType::Fenced
    } else {
        CodeType::Single
    }
}

pub fn toggle_code_block(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }

    let selection = buffer.selection();
    let start = selection.start;
    let mut first = buffer.token_at(Position::new(start.line, start.column.max(1)));
    if !first.has(TokenType::Code) && start.column > 0 && start.column < buffer.line_len(start.line) {
        // A cursor right before an opening backtick touches the span too
        let next = buffer.token_at(Position::new(start.line, start.column + 1));
        if next.has(TokenType::Code) {
            first = next;
        }
    }
    let kind = code_type(&*buffer, start.line, Some(first));
    debug!("code toggle at line {}: {:?}", start.line, kind);

    let outcome = match kind {
        CodeType::Single => unwrap_inline(buffer, selection)?,
        CodeType::Fenced if selection.is_cursor() => remove_fences(buffer, start.line)?,
        CodeType::Fenced => {
            let fallback = env.options.block_styles.code.marker();
            split_fenced(buffer, selection, fallback)?
        }
        CodeType::Indented => unindent(buffer, selection, env.options.indent_unit)?,
        CodeType::None => insert_code(buffer, selection, env.options.block_styles.code.marker())?,
    };

    buffer.focus();
    Ok(outcome)
}

// ─────────────────────────────────────────────────────────────────────────────
// Single
// ─────────────────────────────────────────────────────────────────────────────

fn unwrap_inline(buffer: &mut dyn TextBuffer, selection: Range) -> Result<Outcome> {
    let Range { mut start, mut end } = selection;
    let line = buffer.line_text(start.line)?.to_string();
    let Some(span) = code_span_at(&line, start.column) else {
        // Span not found on this line; strip the nearest backticks
        let (before, after) = split_at_column(&line, start.column);
        let text = format!("{}{}", strip_last(before, &["`"]), strip_first(after, &["`"]));
        buffer.set_line(start.line, &text);
        start.column = start.column.saturating_sub(1);
        if selection.is_cursor() {
            end = start;
        } else if end.line == start.line {
            end.column = end.column.saturating_sub(1);
        }
        buffer.set_selection(Range::new(start, end));
        return Ok(Outcome::ToggledOff);
    };

    let chars: Vec<char> = line.chars().collect();
    let text: String = chars[..span.open]
        .iter()
        .chain(&chars[span.open + span.ticks..span.close])
        .chain(&chars[span.close + span.ticks..])
        .collect();
    buffer.set_line(start.line, &text);

    let same_line = end.line == start.line;
    start.column = span.shift(start.column);
    if same_line {
        end.column = span.shift(end.column);
    }
    buffer.set_selection(Range::new(start, end));
    Ok(Outcome::ToggledOff)
}

/// An inline code span on one line, in character columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodeSpan {
    /// Column of the opening backtick run
    open: usize,
    /// Column of the closing backtick run
    close: usize,
    /// Length of each backtick run
    ticks: usize,
}

impl CodeSpan {
    /// Where `column` lands once both backtick runs are removed.
    fn shift(&self, column: usize) -> usize {
        let in_open = column.saturating_sub(self.open).min(self.ticks);
        let in_close = column.saturating_sub(self.close).min(self.ticks);
        column - in_open - in_close
    }
}

/// The code span containing `column` or touching it from either side.
fn code_span_at(line: &str, column: usize) -> Option<CodeSpan> {
    let chars: Vec<char> = line.chars().collect();
    let run_at = |from: usize| chars[from..].iter().take_while(|&&c| c == '`').count();

    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '`' {
            i += 1;
            continue;
        }
        let ticks = run_at(i);
        let mut j = i + ticks;
        let mut close = None;
        while j < chars.len() {
            if chars[j] != '`' {
                j += 1;
                continue;
            }
            let run = run_at(j);
            if run == ticks {
                close = Some(j);
                break;
            }
            j += run;
        }
        match close {
            Some(close) => {
                if (i..=close + ticks).contains(&column) {
                    return Some(CodeSpan { open: i, close, ticks });
                }
                i = close + ticks;
            }
            None => i += ticks,
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Fenced
// ─────────────────────────────────────────────────────────────────────────────

/// Delete line `index` together with one adjacent line break.
fn delete_line(buffer: &mut dyn TextBuffer, index: usize) {
    if index + 1 < buffer.line_count() {
        buffer.replace_range("", Position::line_start(index), Position::line_start(index + 1));
    } else if index > 0 {
        buffer.replace_range("", Position::line_end(index - 1), Position::line_end(index));
    } else {
        buffer.set_line(index, "");
    }
}

/// Fence run of the block containing `line`.
fn fence_chars(buffer: &dyn TextBuffer, line: usize) -> Option<String> {
    (0..=line)
        .rev()
        .find(|&index| is_fence_line(buffer, index))
        .and_then(|index| buffer.token_at(Position::new(index, 1)).fence_chars)
        .or_else(|| buffer.token_at(Position::new(line, 1)).fence_chars)
}

/// Take the selected lines out of the fenced block they sit in.
///
/// Fences are added above and below the selection, except where the
/// selection already touches one.
fn split_fenced(buffer: &mut dyn TextBuffer, selection: Range, fallback: &str) -> Result<Outcome> {
    let Range { start, end } = selection;
    let fence = fence_chars(&*buffer, start.line).unwrap_or_else(|| fallback.to_string());
    let fence_line = format!("{}\n", fence);

    let (start_text, start_line) = if is_fence_line(&*buffer, start.line) {
        (String::new(), start.line)
    } else if start.line > 0 && is_fence_line(&*buffer, start.line - 1) {
        (String::new(), start.line - 1)
    } else {
        (fence_line.clone(), start.line)
    };

    let (end_text, mut end_line) = if is_fence_line(&*buffer, end.line) {
        let line = if end.column == 0 { end.line + 1 } else { end.line };
        (String::new(), line)
    } else if end.column != 0 && is_fence_line(&*buffer, end.line + 1) {
        (String::new(), end.line + 1)
    } else {
        (fence_line, end.line + 1)
    };
    if end.column == 0 {
        // Whole last line selected; the cursor sits at the start of the next
        end_line = end_line.saturating_sub(1);
    }

    grouped(buffer, |buffer| {
        // End first so the start line number stays valid
        if end_text.is_empty() {
            delete_line(buffer, end_line);
        } else if end_line >= buffer.line_count() {
            let eod = buffer.end_of_document();
            buffer.replace_range(&format!("\n{}", fence), eod, eod);
        } else {
            let at = Position::line_start(end_line);
            buffer.replace_range(&end_text, at, at);
        }

        if start_text.is_empty() {
            delete_line(buffer, start_line);
        } else {
            let at = Position::line_start(start_line);
            buffer.replace_range(&start_text, at, at);
        }
        Ok(())
    })?;

    let opened = !start_text.is_empty();
    let sel_start = Position::line_start(start_line + usize::from(opened));
    let sel_end = if opened {
        Position::line_start(end_line + 1)
    } else {
        Position::line_start(end_line.saturating_sub(1))
    };
    buffer.set_selection(Range::new(sel_start, sel_end));
    Ok(Outcome::ToggledOff)
}

/// Whether line `index` is a fence that opens (`opening`) or closes a block.
fn is_fence_of_kind(buffer: &dyn TextBuffer, index: usize, opening: bool) -> bool {
    if !is_fence_line(buffer, index) {
        return false;
    }
    buffer.token_at(Position::new(index, 1)).fence_open == opening
}

/// Remove both fences of the block under a bare cursor.
fn remove_fences(buffer: &mut dyn TextBuffer, line: usize) -> Result<Outcome> {
    let count = buffer.line_count();
    let opening_above =
        |buffer: &dyn TextBuffer, to: usize| (0..to).rev().find(|&i| is_fence_of_kind(buffer, i, true));
    let closing_below =
        |buffer: &dyn TextBuffer, from: usize| (from..count).find(|&i| is_fence_of_kind(buffer, i, false));

    let (block_start, block_end) = if is_fence_of_kind(&*buffer, line, true) {
        (Some(line), closing_below(&*buffer, line + 1))
    } else if is_fence_of_kind(&*buffer, line, false) {
        (opening_above(&*buffer, line), Some(line))
    } else {
        (opening_above(&*buffer, line + 1), closing_below(&*buffer, line))
    };
    debug!("fenced block: {:?}..{:?}", block_start, block_end);

    grouped(buffer, |buffer| {
        match (block_start, block_end) {
            (Some(first), Some(last)) if first < last => {
                delete_line(buffer, first);
                delete_line(buffer, last - 1);
            }
            // Unterminated block: only the opening fence exists
            (Some(first), _) => delete_line(buffer, first),
            (None, Some(last)) => delete_line(buffer, last),
            (None, None) => {}
        }
        Ok(())
    })?;
    Ok(Outcome::ToggledOff)
}

// ─────────────────────────────────────────────────────────────────────────────
// Indented
// ─────────────────────────────────────────────────────────────────────────────

fn unindent(buffer: &mut dyn TextBuffer, selection: Range, indent_unit: usize) -> Result<Outcome> {
    let Range { start, end } = selection;
    let count = buffer.line_count();

    let (block_start, block_end) = if !selection.is_cursor() {
        let last = if end.column == 0 && end.line > start.line {
            end.line - 1
        } else {
            end.line
        };
        (start.line, last)
    } else {
        let is_other = |buffer: &dyn TextBuffer, i: usize| {
            !is_blank(buffer, i) && code_type(buffer, i, None) != CodeType::Indented
        };
        let first = (0..=start.line)
            .rev()
            .find(|&i| is_other(&*buffer, i))
            .map(|i| i + 1)
            .unwrap_or(0);
        let last = (start.line..count)
            .find(|&i| is_other(&*buffer, i))
            .map(|i| i.saturating_sub(1))
            .unwrap_or(count - 1);
        (first, last)
    };

    let next = block_end + 1;
    let separate = next < count && code_type(&*buffer, next, None) == CodeType::Indented;

    grouped(buffer, |buffer| {
        // Keep the following lines an indented block of their own
        if separate {
            let at = Position::line_start(next);
            buffer.replace_range("\n", at, at);
        }
        for index in block_start..=block_end {
            let text = buffer.line_text(index)?.to_string();
            buffer.set_line(index, dedent(&text, indent_unit));
        }
        Ok(())
    })?;
    Ok(Outcome::ToggledOff)
}

/// Remove one indent unit: a tab, or up to `unit` spaces.
fn dedent(text: &str, unit: usize) -> &str {
    if let Some(rest) = text.strip_prefix('\t') {
        return rest;
    }
    let spaces = text.chars().take(unit).take_while(|&c| c == ' ').count();
    &text[spaces..]
}

// ─────────────────────────────────────────────────────────────────────────────
// None
// ─────────────────────────────────────────────────────────────────────────────

fn insert_code(buffer: &mut dyn TextBuffer, selection: Range, fence: &str) -> Result<Outcome> {
    let Range { start, end } = selection;
    let at_line_start = selection.is_cursor() && start.column == 0;
    let multi = selection.is_multi_line();

    if !(at_line_start || multi) {
        return replace_selection(buffer, false, ["`", "`"], None);
    }

    let prefix = format!("{}\n", fence);
    let mut suffix = format!("\n{}", fence);
    if at_line_start && buffer.line_len(start.line) > 0 {
        // Keep the existing line text out of the closing fence
        suffix.push('\n');
    }
    let mut end_line = end.line + 1;
    if multi {
        end_line += 1;
    }
    if multi && end.column == 0 {
        // The final line break is already part of the selection
        suffix = format!("{}\n", fence);
        end_line -= 1;
    }

    grouped(buffer, |buffer| {
        replace_selection(buffer, false, [prefix.as_str(), suffix.as_str()], None)
    })?;
    buffer.set_selection(Range::new(
        Position::line_start(start.line + 1),
        Position::line_start(end_line),
    ));
    Ok(Outcome::Applied)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
