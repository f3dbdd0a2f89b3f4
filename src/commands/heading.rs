//! Heading toggles
//!
//! `smaller` walks `#` → `######` → plain, `bigger` walks the other way
//! starting from `######`. An absolute level sets that level, or strips the
//! heading when the line already has it.

use super::{in_preview, Outcome};
use crate::buffer::{grouped, TextBuffer};
use crate::error::Result;

/// Deepest ATX heading level.
const MAX_LEVEL: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingChange {
    Smaller,
    Bigger,
    Level(u8),
}

pub fn toggle_heading_smaller(buffer: &mut dyn TextBuffer) -> Result<Outcome> {
    toggle(buffer, HeadingChange::Smaller)
}

pub fn toggle_heading_bigger(buffer: &mut dyn TextBuffer) -> Result<Outcome> {
    toggle(buffer, HeadingChange::Bigger)
}

/// Toggle an absolute heading level. Levels outside 1-6 are clamped.
pub fn toggle_heading(buffer: &mut dyn TextBuffer, level: u8) -> Result<Outcome> {
    toggle(buffer, HeadingChange::Level(level.clamp(1, MAX_LEVEL as u8)))
}

fn toggle(buffer: &mut dyn TextBuffer, change: HeadingChange) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }

    let selection = buffer.selection();
    let removed = grouped(buffer, |buffer| {
        let mut removed = false;
        for index in selection.start.line..=selection.end.line {
            let text = buffer.line_text(index)?.to_string();
            let updated = apply(&text, change);
            if index == selection.start.line {
                removed = heading_level(&text) > 0 && heading_level(&updated) == 0;
            }
            buffer.set_line(index, &updated);
        }
        Ok(removed)
    })?;

    buffer.focus();
    Ok(Outcome::toggled(removed))
}

/// Number of leading `#`, or zero when the line is not a heading.
///
/// A line made only of `#` (or an empty line) has no heading text and is
/// treated as plain.
fn heading_level(text: &str) -> usize {
    let level = text.chars().take_while(|&c| c == '#').count();
    if level == text.len() || level > MAX_LEVEL {
        0
    } else {
        level
    }
}

/// Text after the `#` run and one separating space.
fn heading_body(text: &str, level: usize) -> &str {
    let rest = &text[level..];
    rest.strip_prefix(' ')
        .or_else(|| rest.strip_prefix('\t'))
        .unwrap_or(rest)
}

fn apply(text: &str, change: HeadingChange) -> String {
    let level = heading_level(text);
    match change {
        HeadingChange::Smaller | HeadingChange::Bigger if level == 0 => {
            let hashes = if change == HeadingChange::Bigger {
                MAX_LEVEL
            } else {
                1
            };
            format!("{} {}", "#".repeat(hashes), text)
        }
        HeadingChange::Smaller if level == MAX_LEVEL => heading_body(text, level).to_string(),
        HeadingChange::Bigger if level == 1 => heading_body(text, level).to_string(),
        HeadingChange::Smaller => format!("#{}", text),
        HeadingChange::Bigger => text[1..].to_string(),
        HeadingChange::Level(target) => {
            let target = target as usize;
            if level == 0 {
                format!("{} {}", "#".repeat(target), text)
            } else if level == target {
                heading_body(text, level).to_string()
            } else {
                format!("{} {}", "#".repeat(target), heading_body(text, level))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
