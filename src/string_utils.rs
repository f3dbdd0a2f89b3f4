//! UTF-8 Safe Column Utilities
//!
//! Buffer positions count columns in characters (Unicode scalar values),
//! while Rust strings are indexed by bytes. These helpers convert between
//! the two without ever slicing inside a multi-byte character.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::split_at_column;
//!
//! let (before, after) = split_at_column("Hei på deg", 6); // ("Hei på", " deg")
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    // Walk backwards to find the start of the character
    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character.
///
/// Continuation bytes look like `10xxxxxx`; everything else starts a char.
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b11000000) != 0b10000000
}

// ─────────────────────────────────────────────────────────────────────────────
// Column Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of character column `column`, clamped to the end of `s`.
pub fn column_to_byte(s: &str, column: usize) -> usize {
    s.char_indices()
        .nth(column)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Character column of byte offset `byte`, rounding down to a boundary.
pub fn byte_to_column(s: &str, byte: usize) -> usize {
    let byte = floor_char_boundary(s, byte);
    s[..byte].chars().count()
}

/// Split `s` at a character column (clamped to the end of the string).
pub fn split_at_column(s: &str, column: usize) -> (&str, &str) {
    s.split_at(column_to_byte(s, column))
}

/// Count of leading whitespace characters.
pub fn leading_whitespace(s: &str) -> usize {
    s.chars().take_while(|c| c.is_whitespace()).count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
