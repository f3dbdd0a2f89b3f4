//! Undo / redo passthrough

use super::{in_preview, Outcome};
use crate::buffer::TextBuffer;
use crate::error::Result;

/// Step back one history entry. Declined when there is nothing to undo.
pub fn undo(buffer: &mut dyn TextBuffer) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }
    let undone = buffer.undo();
    buffer.focus();
    Ok(if undone {
        Outcome::Applied
    } else {
        Outcome::Declined
    })
}

/// Step forward one history entry. Declined when there is nothing to redo.
pub fn redo(buffer: &mut dyn TextBuffer) -> Result<Outcome> {
    if in_preview(buffer) {
        return Ok(Outcome::Skipped);
    }
    let redone = buffer.redo();
    buffer.focus();
    Ok(if redone {
        Outcome::Applied
    } else {
        Outcome::Declined
    })
}
