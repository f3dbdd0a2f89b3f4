//! Clean block: strip heading, list, quote and numbering markers

use super::{in_preview, Outcome};
use crate::buffer::{grouped, TextBuffer};
use crate::error::Result;
use crate::patterns;

/// Remove leading block markers from every selected line.
///
/// This is a one-way normalization; running it again changes nothing.
pub fn clean_block(buffer: &mut dyn TextBuffer) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }

    let selection = buffer.selection();
    grouped(buffer, |buffer| {
        for index in selection.start.line..=selection.end.line {
            let text = buffer.line_text(index)?.to_string();
            let cleaned = patterns::block_markers().replace(&text, "");
            buffer.set_line(index, &cleaned);
        }
        Ok(())
    })?;

    buffer.focus();
    Ok(Outcome::Applied)
}
