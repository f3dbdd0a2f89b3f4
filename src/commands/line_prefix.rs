//! Line-prefix toggles: blockquote, ordered list, unordered list
//!
//! The construct state at the selection start decides the direction for
//! every selected line: all prefixes are stripped, or all lines gain one.

use super::{in_preview, CommandEnv, Outcome};
use crate::buffer::{grouped, TextBuffer};
use crate::error::Result;
use crate::inspector::construct_state;
use crate::patterns;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Quote,
    OrderedList,
    UnorderedList,
}

pub fn toggle_blockquote(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
    toggle_line(buffer, env, LineKind::Quote)
}

pub fn toggle_ordered_list(
    buffer: &mut dyn TextBuffer,
    env: &mut CommandEnv<'_>,
) -> Result<Outcome> {
    toggle_line(buffer, env, LineKind::OrderedList)
}

pub fn toggle_unordered_list(
    buffer: &mut dyn TextBuffer,
    env: &mut CommandEnv<'_>,
) -> Result<Outcome> {
    toggle_line(buffer, env, LineKind::UnorderedList)
}

fn toggle_line(
    buffer: &mut dyn TextBuffer,
    env: &mut CommandEnv<'_>,
    kind: LineKind,
) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }

    let state = construct_state(&*buffer, None);
    let active = match kind {
        LineKind::Quote => state.quote,
        LineKind::OrderedList => state.ordered_list,
        LineKind::UnorderedList => state.unordered_list,
    };
    let bullet = env.options.unordered_list_style.marker();
    let selection = buffer.selection();

    grouped(buffer, |buffer| {
        let mut number = 1;
        for index in selection.start.line..=selection.end.line {
            let text = buffer.line_text(index)?.to_string();
            let updated = if active {
                strip_prefix(kind, &text)
            } else {
                let updated = add_prefix(kind, &text, number, bullet);
                number += 1;
                updated
            };
            if updated != text {
                debug!("line {}: {:?} -> {:?}", index, text, updated);
            }
            buffer.set_line(index, &updated);
        }
        Ok(())
    })?;

    buffer.focus();
    Ok(Outcome::toggled(active))
}

fn strip_prefix(kind: LineKind, text: &str) -> String {
    let pattern = match kind {
        LineKind::Quote => patterns::quote_prefix(),
        LineKind::OrderedList | LineKind::UnorderedList => patterns::list_prefix(),
    };
    pattern.replace(text, "$1").into_owned()
}

fn add_prefix(kind: LineKind, text: &str, number: usize, bullet: &str) -> String {
    if kind == LineKind::Quote {
        if patterns::quote_prefix().is_match(text) {
            return text.to_string();
        }
        return format!("> {}", text);
    }

    // Unordered items never keep a number
    let text = if kind == LineKind::UnorderedList {
        drop_ordered_marker(text)
    } else {
        text.to_string()
    };

    let marker = match kind {
        LineKind::OrderedList => format!("{}.", number),
        _ => bullet.to_string(),
    };

    match patterns::list_prefix().captures(&text) {
        Some(caps) => {
            let existing = &caps[2];
            let ordered = existing.starts_with(|c: char| c.is_ascii_digit());
            let same_kind = ordered == (kind == LineKind::OrderedList);
            if same_kind {
                return text.clone();
            }
            let rest = &text[caps[0].len()..];
            format!("{}{}{}{}", &caps[1], marker, &caps[3], rest)
        }
        None => {
            let indent_len = text.len() - text.trim_start().len();
            let (indent, rest) = text.split_at(indent_len);
            format!("{}{} {}", indent, marker, rest)
        }
    }
}

/// `  3. item` -> `  item`; other lines unchanged.
fn drop_ordered_marker(text: &str) -> String {
    match patterns::list_prefix().captures(text) {
        Some(caps) if caps[2].starts_with(|c: char| c.is_ascii_digit()) => {
            format!("{}{}", &caps[1], &text[caps[0].len()..])
        }
        _ => text.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_quote() {
        assert_eq!(add_prefix(LineKind::Quote, "text", 1, "*"), "> text");
        assert_eq!(add_prefix(LineKind::Quote, "> text", 1, "*"), "> text");
    }

    #[test]
    fn test_add_numbers() {
        assert_eq!(add_prefix(LineKind::OrderedList, "a", 1, "*"), "1. a");
        assert_eq!(add_prefix(LineKind::OrderedList, "b", 2, "*"), "2. b");
        assert_eq!(add_prefix(LineKind::OrderedList, "  c", 3, "*"), "  3. c");
    }

    #[test]
    fn test_convert_between_list_kinds() {
        assert_eq!(add_prefix(LineKind::UnorderedList, "1. foo", 1, "-"), "- foo");
        assert_eq!(add_prefix(LineKind::OrderedList, "* foo", 4, "-"), "4. foo");
    }

    #[test]
    fn test_same_kind_passes_through() {
        assert_eq!(add_prefix(LineKind::UnorderedList, "+ foo", 1, "*"), "+ foo");
        assert_eq!(add_prefix(LineKind::OrderedList, "7. foo", 1, "*"), "7. foo");
    }

    #[test]
    fn test_strip_keeps_indent() {
        assert_eq!(strip_prefix(LineKind::UnorderedList, "  - item"), "  item");
        assert_eq!(strip_prefix(LineKind::OrderedList, "10. item"), "item");
        assert_eq!(strip_prefix(LineKind::Quote, "> quoted"), "quoted");
        assert_eq!(strip_prefix(LineKind::Quote, "plain"), "plain");
    }
}
