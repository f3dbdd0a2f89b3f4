//! Template insertion around the selection: tables, rules, uploaded images

use super::inline::{strip_first, strip_last};
use super::{in_preview, CommandEnv, Outcome};
use crate::buffer::{position_after, Range, TextBuffer};
use crate::error::Result;
use crate::inspector::construct_state;
use crate::string_utils::{char_len, split_at_column};
use log::debug;

/// File extensions inserted as an image after an upload.
const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "svg", "apng", "avif", "webp"];

/// Placeholder replaced by the URL in templates.
const URL_PLACEHOLDER: &str = "#url#";

/// Placeholder replaced by the file name in upload status texts.
const IMAGE_NAME_PLACEHOLDER: &str = "#image_name#";

/// Wrap the selection in `template`, or strip it when `active`.
///
/// Inserting keeps the original text selected between the two halves.
/// Stripping only works for single-line templates; a multi-line template
/// that is already active is left alone and the call is declined.
pub fn replace_selection(
    buffer: &mut dyn TextBuffer,
    active: bool,
    template: [&str; 2],
    url: Option<&str>,
) -> Result<Outcome> {
    let (before, after) = match url {
        Some(url) => (
            template[0].replacen(URL_PLACEHOLDER, url, 1),
            template[1].replacen(URL_PLACEHOLDER, url, 1),
        ),
        None => (template[0].to_string(), template[1].to_string()),
    };
    let Range { mut start, mut end } = buffer.selection();

    if active {
        if before.contains('\n') || after.contains('\n') {
            debug!("multi-line template is already active, nothing to strip");
            return Ok(Outcome::Declined);
        }
        let line = buffer.line_text(start.line)?.to_string();
        let (left, right) = split_at_column(&line, start.column);
        let stripped = format!(
            "{}{}",
            strip_last(left, &[before.as_str()]),
            strip_first(right, &[after.as_str()])
        );
        buffer.set_line(start.line, &stripped);

        let width = char_len(&before);
        let same_line = end.line == start.line;
        start.column = start.column.saturating_sub(width);
        if same_line {
            end.column = end.column.saturating_sub(width);
        }
        buffer.set_selection(Range::new(start, end));
        return Ok(Outcome::ToggledOff);
    }

    let cursor = start == end;
    let text = buffer.selected_text();
    buffer.replace_range(&format!("{}{}{}", before, text, after), start, end);

    start = position_after(start, &before);
    end = if cursor {
        start
    } else {
        position_after(start, &text)
    };
    buffer.set_selection(Range::new(start, end));
    Ok(Outcome::Applied)
}

pub fn draw_table(buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }
    let active = construct_state(&*buffer, None).table;
    let [before, after] = &env.options.insert_texts.table;
    let outcome = replace_selection(buffer, active, [before.as_str(), after.as_str()], None)?;
    buffer.focus();
    Ok(outcome)
}

pub fn draw_horizontal_rule(
    buffer: &mut dyn TextBuffer,
    env: &mut CommandEnv<'_>,
) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }
    let [before, after] = &env.options.insert_texts.horizontal_rule;
    let outcome = replace_selection(buffer, false, [before.as_str(), after.as_str()], None)?;
    buffer.focus();
    Ok(outcome)
}

/// Insert the result of a finished upload at the selection.
///
/// Image files become `![](url)`; anything else becomes a link named
/// after the file. The status sink is told about the upload either way.
pub fn draw_uploaded_image(
    buffer: &mut dyn TextBuffer,
    env: &mut CommandEnv<'_>,
    url: &str,
) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }

    let name = url.rsplit('/').next().unwrap_or(url);
    let outcome = if is_image_name(name) {
        let [before, after] = &env.options.insert_texts.uploaded_image;
        replace_selection(buffer, false, [before.as_str(), after.as_str()], Some(url))?
    } else {
        let before = format!("[{}", name);
        let after = &env.options.insert_texts.link[1];
        replace_selection(buffer, false, [before.as_str(), after.as_str()], Some(url))?
    };

    let message = env
        .options
        .image_texts
        .sb_on_uploaded
        .replace(IMAGE_NAME_PLACEHOLDER, name);
    env.status.update_status("upload-image", &message);
    buffer.focus();
    Ok(outcome)
}

/// Whether a file name (possibly with a query string) has an image extension.
fn is_image_name(name: &str) -> bool {
    let Some(dot) = name.rfind('.') else {
        return false;
    };
    let ext = name[dot + 1..]
        .split('?')
        .next()
        .unwrap_or("")
        .to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ModeBuffer, Position};

    #[test]
    fn test_is_image_name() {
        assert!(is_image_name("cat.PNG"));
        assert!(is_image_name("photo.webp?size=large"));
        assert!(!is_image_name("report.pdf"));
        assert!(!is_image_name("README"));
    }

    #[test]
    fn test_replace_selection_keeps_text_selected() {
        let mut buffer = ModeBuffer::from_text("see here");
        buffer.set_selection(Range::new(Position::new(0, 4), Position::new(0, 8)));
        let outcome =
            replace_selection(&mut buffer, false, ["<", ">(#url#)"], Some("x.io")).unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(buffer.text(), "see <here>(x.io)");
        assert_eq!(buffer.selected_text(), "here");
    }

    #[test]
    fn test_replace_selection_strips_single_line_template() {
        let mut buffer = ModeBuffer::from_text("a <<b>> c");
        buffer.set_selection(Range::cursor(Position::new(0, 4)));
        let outcome = replace_selection(&mut buffer, true, ["<<", ">>"], None).unwrap();
        assert_eq!(outcome, Outcome::ToggledOff);
        assert_eq!(buffer.text(), "a b c");
        assert_eq!(buffer.selection(), Range::cursor(Position::new(0, 2)));
    }

    #[test]
    fn test_active_multi_line_template_is_declined() {
        let mut buffer = ModeBuffer::from_text("| a |");
        let outcome = replace_selection(&mut buffer, true, ["", "\n\n---\n"], None).unwrap();
        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(buffer.text(), "| a |");
    }
}
