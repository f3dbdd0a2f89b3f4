//! Compiled Markdown patterns shared by the tokenizer and the commands
//!
//! Patterns are compiled once on first use and live for the rest of the
//! process.

use regex::Regex;
use std::sync::OnceLock;

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern is a valid regex"))
}

macro_rules! pattern {
    ($(#[$meta:meta])* $name:ident, $re:expr) => {
        $(#[$meta])*
        pub fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            compiled(&CELL, $re)
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Patterns
// ─────────────────────────────────────────────────────────────────────────────

pattern!(
    /// Opening or closing code fence; group 1 is the fence run.
    fence,
    r"^ {0,3}(`{3,}|~{3,})(.*)$"
);

pattern!(
    /// ATX heading; group 1 is the `#` run.
    atx_heading,
    r"^ {0,3}(#{1,6})(?:[ \t]|$)"
);

pattern!(
    /// Line inside a block quote.
    quote_line,
    r"^ {0,3}>"
);

pattern!(
    /// Line that starts a list item.
    list_item,
    r"^\s*(?:[*+-]|\d+[.)])\s+"
);

pattern!(
    /// List item whose marker is a number.
    ordered_item,
    r"^\s*\d+[.)]\s"
);

pattern!(
    /// GFM table delimiter row (`| --- | :-: |`).
    table_delimiter,
    r"^\s*\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?\s*$"
);

// ─────────────────────────────────────────────────────────────────────────────
// Inline Patterns
// ─────────────────────────────────────────────────────────────────────────────

pattern!(
    /// `![alt](url)`
    image,
    r"!\[[^\]]*\]\((?:\\.|[^)\\])*\)"
);

pattern!(
    /// `[text](url)`; callers reject matches preceded by `!`.
    link,
    r"\[[^\]]*\]\((?:\\.|[^)\\])*\)"
);

pattern!(
    /// The `](url)` tail of a link or image.
    link_tail,
    r"\]\((?:\\.|[^)\\])*\)"
);

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Patterns
// ─────────────────────────────────────────────────────────────────────────────

pattern!(
    /// Quote prefix; group 1 keeps leading whitespace.
    quote_prefix,
    r"^(\s*)>\s*"
);

pattern!(
    /// Any list prefix; group 1 leading whitespace, group 2 marker, group 3 gap.
    list_prefix,
    r"^(\s*)([*+-]|\d+[.)])(\s+)"
);

pattern!(
    /// Any run of heading, bullet, quote or numbering markers at line start.
    block_markers,
    r"^\s*(?:>\s*|(?:#+|[*+-]|\d+[.)])(?:\s+|$))+"
);

// ─────────────────────────────────────────────────────────────────────────────
// Counting Patterns
// ─────────────────────────────────────────────────────────────────────────────

pattern!(
    /// One countable word: a single CJK character or a run of Latin,
    /// Greek or Cyrillic word characters.
    word,
    r"[\u4E00-\u9FFF\u3400-\u4DBF\uF900-\uFAFF\u3040-\u309F\uAC00-\uD7AF]|[a-zA-Z0-9_\u00A0-\u02AF\u0392-\u03C9\u0410-\u04F9]+"
);

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
