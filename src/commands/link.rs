//! Link and image toggles

use super::{in_preview, CommandEnv, Outcome};
use crate::buffer::{position_after, Range, TextBuffer};
use crate::config::Template;
use crate::error::Result;
use crate::inspector::construct_state;
use crate::patterns;
use crate::string_utils::{char_len, split_at_column};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// URL prefilled in the prompt and used when prompting is off.
const DEFAULT_URL: &str = "https://";

/// Bytes a URI keeps as-is are everything except these (plus non-ASCII).
const URI_ESCAPED: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Link,
    Image,
}

/// Make a user-typed URL safe inside `(...)`: percent-encode it the way a
/// URI would be, then backslash-escape `\`, `(` and `)`.
pub fn escape_prompt_url(url: &str) -> String {
    let encoded = utf8_percent_encode(url, URI_ESCAPED).to_string();
    let mut escaped = String::with_capacity(encoded.len());
    for c in encoded.chars() {
        if matches!(c, '\\' | '(' | ')') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn draw_link(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
    draw(buffer, env, LinkKind::Link)
}

pub fn draw_image(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
    draw(buffer, env, LinkKind::Image)
}

fn draw(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>, kind: LinkKind) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }

    let options = env.options;
    let mut url = DEFAULT_URL.to_string();
    if options.prompt_urls {
        let message = match kind {
            LinkKind::Link => &options.prompt_texts.link,
            LinkKind::Image => &options.prompt_texts.image,
        };
        match env.prompt.prompt(message, DEFAULT_URL) {
            Some(answer) if !answer.is_empty() => url = escape_prompt_url(&answer),
            _ => return Ok(Outcome::Declined),
        }
    }

    let template = match kind {
        LinkKind::Link => &options.insert_texts.link,
        LinkKind::Image => &options.insert_texts.image,
    };
    let outcome = toggle_link(buffer, kind, template, &url)?;
    buffer.focus();
    Ok(outcome)
}

fn toggle_link(
    buffer: &mut dyn TextBuffer,
    kind: LinkKind,
    template: &Template,
    url: &str,
) -> Result<Outcome> {
    let state = construct_state(&*buffer, None);
    let active = match kind {
        LinkKind::Link => state.link,
        LinkKind::Image => state.image,
    };
    let Range { mut start, mut end } = buffer.selection();

    if active {
        let line = buffer.line_text(start.line)?.to_string();
        let (before, after) = split_at_column(&line, start.column);
        let before = match kind {
            LinkKind::Link => remove_link_open(before),
            LinkKind::Image => remove_last(before, "!["),
        };
        let after = patterns::link_tail().replace(after, "");
        buffer.set_line(start.line, &format!("{}{}", before, after));

        let width = char_len(&template[0]);
        let same_line = end.line == start.line;
        start.column = start.column.saturating_sub(width);
        if same_line {
            end.column = end.column.saturating_sub(width);
        }
    } else {
        let before = template[0].replacen("#url#", url, 1);
        let after = template[1].replacen("#url#", url, 1);
        let cursor = start == end;
        let text = buffer.selected_text();
        buffer.replace_range(&format!("{}{}{}", before, text, after), start, end);

        start = position_after(start, &before);
        end = if cursor {
            start
        } else {
            position_after(start, &text)
        };
    }

    buffer.set_selection(Range::new(start, end));
    Ok(Outcome::toggled(active))
}

/// Remove the last `[` that does not open an image.
fn remove_link_open(text: &str) -> String {
    let open = text
        .char_indices()
        .rev()
        .find(|&(idx, c)| c == '[' && !text[..idx].ends_with('!'));
    match open {
        Some((idx, _)) => format!("{}{}", &text[..idx], &text[idx + 1..]),
        None => text.to_string(),
    }
}

fn remove_last(text: &str, needle: &str) -> String {
    match text.rfind(needle) {
        Some(idx) => format!("{}{}", &text[..idx], &text[idx + needle.len()..]),
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
    fn test_escape_prompt_url() {
        assert_eq!(escape_prompt_url("https://a.com/(x)"), r"https://a.com/\(x\)");
        assert_eq!(escape_prompt_url("https://a.com/a b"), "https://a.com/a%20b");
        assert_eq!(escape_prompt_url("https://a.com/?q=1&r=2#top"), "https://a.com/?q=1&r=2#top");
        assert_eq!(escape_prompt_url("https://a.com/ø"), "https://a.com/%C3%B8");
        assert_eq!(escape_prompt_url(r"C:\x"), "C:%5Cx");
    }

    #[test]
    fn test_remove_link_open_skips_images() {
        assert_eq!(remove_link_open("see [doc"), "see doc");
        assert_eq!(remove_link_open("![img](a) and [doc"), "![img](a) and doc");
        assert_eq!(remove_link_open("![img"), "![img");
    }
}
