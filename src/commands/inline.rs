//! Symmetric inline toggles: bold, italic, strikethrough

use super::{in_preview, CommandEnv, Outcome};
use crate::buffer::{position_after, Range, TextBuffer};
use crate::config::EditorOptions;
use crate::error::Result;
use crate::inspector::{construct_state, ConstructState};
use crate::string_utils::{char_len, split_at_column};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineStyle {
    Bold,
    Italic,
    Strikethrough,
}

impl InlineStyle {
    fn is_active(&self, state: &ConstructState) -> bool {
        match self {
            InlineStyle::Bold => state.bold,
            InlineStyle::Italic => state.italic,
            InlineStyle::Strikethrough => state.strikethrough,
        }
    }

    /// Marker written when switching on.
    fn marker(&self, options: &EditorOptions) -> &'static str {
        match self {
            InlineStyle::Bold => options.block_styles.bold.marker(),
            InlineStyle::Italic => options.block_styles.italic.marker(),
            InlineStyle::Strikethrough => "~~",
        }
    }

    /// Every spelling recognized when switching off.
    fn alternatives(&self) -> &'static [&'static str] {
        match self {
            InlineStyle::Bold => &["**", "__"],
            InlineStyle::Italic => &["*", "_"],
            InlineStyle::Strikethrough => &["~~"],
        }
    }
}

pub fn toggle_bold(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
    toggle_inline(buffer, env.options, InlineStyle::Bold)
}

pub fn toggle_italic(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
    toggle_inline(buffer, env.options, InlineStyle::Italic)
}

pub fn toggle_strikethrough(
    buffer: &mut dyn TextBuffer,
    env: &mut CommandEnv<'_>,
) -> Result<Outcome> {
    toggle_inline(buffer, env.options, InlineStyle::Strikethrough)
}

fn toggle_inline(
    buffer: &mut dyn TextBuffer,
    options: &EditorOptions,
    style: InlineStyle,
) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }

    let state = construct_state(&*buffer, None);
    let Range { mut start, mut end } = buffer.selection();
    let active = style.is_active(&state);

    if active {
        let line = buffer.line_text(start.line)?.to_string();
        let (before, after) = split_at_column(&line, start.column);
        let before = strip_last(before, style.alternatives());
        let after = strip_first(after, style.alternatives());
        buffer.set_line(start.line, &format!("{}{}", before, after));

        let width = char_len(style.marker(options));
        let same_line = end.line == start.line;
        start.column = start.column.saturating_sub(width);
        if same_line {
            end.column = end.column.saturating_sub(width);
        }
    } else {
        let marker = style.marker(options);
        let text = style
            .alternatives()
            .iter()
            .fold(buffer.selected_text(), |text, alt| text.replace(alt, ""));
        buffer.replace_range(&format!("{}{}{}", marker, text, marker), start, end);

        start.column += char_len(marker);
        end = position_after(start, &text);
    }

    buffer.set_selection(Range::new(start, end));
    buffer.focus();
    Ok(Outcome::toggled(active))
}

/// Remove the last occurrence of any alternative from `text`.
pub(crate) fn strip_last(text: &str, alternatives: &[&str]) -> String {
    let found = alternatives
        .iter()
        .filter(|alt| !alt.is_empty())
        .filter_map(|alt| text.rfind(alt).map(|idx| (idx, alt.len())))
        .max_by_key(|(idx, _)| *idx);
    match found {
        Some((idx, len)) => format!("{}{}", &text[..idx], &text[idx + len..]),
        None => text.to_string(),
    }
}

/// Remove the first occurrence of any alternative from `text`.
pub(crate) fn strip_first(text: &str, alternatives: &[&str]) -> String {
    let found = alternatives
        .iter()
        .filter(|alt| !alt.is_empty())
        .filter_map(|alt| text.find(alt).map(|idx| (idx, alt.len())))
        .min_by_key(|(idx, _)| *idx);
    match found {
        Some((idx, len)) => format!("{}{}", &text[..idx], &text[idx + len..]),
        None => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_last_picks_rightmost_alternative() {
        assert_eq!(strip_last("a **b __c", &["**", "__"]), "a **b c");
        assert_eq!(strip_last("plain", &["**"]), "plain");
    }

    #[test]
    fn test_strip_first_picks_leftmost_alternative() {
        assert_eq!(strip_first("x__ y** z", &["**", "__"]), "x y** z");
        assert_eq!(strip_first("", &["~~"]), "");
    }
}
