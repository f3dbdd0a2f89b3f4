//! Construct state inspection
//!
//! Answers "which Markdown constructs is this position inside?" from the
//! buffer's token classification. Toggle commands consult it to decide
//! between adding and removing markup; toolbars can use it to highlight
//! active buttons.

use crate::buffer::{Position, TextBuffer, TokenType};
use crate::patterns;

/// Constructs active at one position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstructState {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub quote: bool,
    pub ordered_list: bool,
    pub unordered_list: bool,
    pub link: bool,
    pub image: bool,
    pub table: bool,
    pub code: bool,
    /// Heading level, when on a heading line
    pub heading: Option<u8>,
}

impl ConstructState {
    /// Look a construct up by its toolbar name (`"bold"`, `"ordered-list"`,
    /// `"heading"`, `"heading-3"`, ...). Unknown names are inactive.
    pub fn is(&self, name: &str) -> bool {
        match name {
            "bold" => self.bold,
            "italic" => self.italic,
            "strikethrough" => self.strikethrough,
            "quote" => self.quote,
            "ordered-list" => self.ordered_list,
            "unordered-list" => self.unordered_list,
            "link" => self.link,
            "image" => self.image,
            "table" => self.table,
            "code" => self.code,
            "heading" => self.heading.is_some(),
            other => match other.strip_prefix("heading-") {
                Some(level) => level
                    .parse::<u8>()
                    .map(|level| Some(level) == self.heading)
                    .unwrap_or(false),
                None => false,
            },
        }
    }

    /// Names of every active construct, in toolbar order.
    pub fn names(&self) -> Vec<String> {
        let flags = [
            ("bold", self.bold),
            ("italic", self.italic),
            ("strikethrough", self.strikethrough),
            ("quote", self.quote),
            ("ordered-list", self.ordered_list),
            ("unordered-list", self.unordered_list),
            ("link", self.link),
            ("image", self.image),
            ("table", self.table),
            ("code", self.code),
        ];
        let mut names: Vec<String> = flags
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| name.to_string())
            .collect();
        if let Some(level) = self.heading {
            names.push("heading".to_string());
            names.push(format!("heading-{}", level));
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Inspect the constructs at `pos`, or at the selection start when `None`.
pub fn construct_state<B: TextBuffer + ?Sized>(buffer: &B, pos: Option<Position>) -> ConstructState {
    let pos = pos.unwrap_or_else(|| buffer.selection().start);
    let token = buffer.token_at(pos);
    let mut state = ConstructState::default();

    for kind in &token.types {
        match kind {
            TokenType::Strong => state.bold = true,
            TokenType::Em => state.italic = true,
            TokenType::Strikethrough => state.strikethrough = true,
            TokenType::Quote => state.quote = true,
            TokenType::ListItem => {
                let line = item_marker_line(buffer, pos.line);
                if patterns::ordered_item().is_match(line) {
                    state.ordered_list = true;
                } else {
                    state.unordered_list = true;
                }
            }
            TokenType::Code => state.code = true,
            TokenType::Link => state.link = !token.has(TokenType::Image),
            TokenType::Image => state.image = true,
            TokenType::Table => state.table = true,
            TokenType::Header(level) => state.heading = Some(*level),
        }
    }
    state
}

/// The line holding the marker of the list item that covers `index`.
///
/// Continuation lines carry no marker of their own, so walk up through
/// list lines until one starts with a bullet or number.
fn item_marker_line<B: TextBuffer + ?Sized>(buffer: &B, index: usize) -> &str {
    (0..=index)
        .rev()
        .take_while(|&i| buffer.token_at(Position::new(i, 0)).has(TokenType::ListItem))
        .filter_map(|i| buffer.line(i))
        .find(|line| patterns::list_item().is_match(line))
        .or_else(|| buffer.line(index))
        .unwrap_or("")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ModeBuffer, Range, TreeBuffer};

    fn state_at(text: &str, line: usize, column: usize) -> ConstructState {
        construct_state(&ModeBuffer::from_text(text), Some(Position::new(line, column)))
    }

    #[test]
    fn test_plain_text_is_empty() {
        let state = state_at("just words", 0, 4);
        assert!(state.is_empty());
        assert!(state.names().is_empty());
    }

    #[test]
    fn test_bold_and_italic() {
        assert!(state_at("a **b** c", 0, 4).is("bold"));
        assert!(state_at("a *b* c", 0, 3).is("italic"));
        assert!(state_at("a ~~b~~ c", 0, 4).is("strikethrough"));
    }

    #[test]
    fn test_list_kind_from_raw_line() {
        let ordered = state_at("1. step", 0, 4);
        assert!(ordered.is("ordered-list"));
        assert!(!ordered.is("unordered-list"));

        let unordered = state_at("- item", 0, 4);
        assert!(unordered.is("unordered-list"));
        assert!(!unordered.is("ordered-list"));
    }

    #[test]
    fn test_list_kind_on_continuation_line() {
        let ordered = state_at("1. a\n   more", 1, 5);
        assert!(ordered.is("ordered-list"));
        assert!(!ordered.is("unordered-list"));

        let buffer = TreeBuffer::from_text("- a\n  more");
        let unordered = construct_state(&buffer, Some(Position::new(1, 4)));
        assert!(unordered.is("unordered-list"));
    }

    #[test]
    fn test_heading_names() {
        let state = state_at("## Section", 0, 5);
        assert!(state.is("heading"));
        assert!(state.is("heading-2"));
        assert!(!state.is("heading-3"));
        assert_eq!(state.names(), vec!["heading", "heading-2"]);
    }

    #[test]
    fn test_image_is_not_link() {
        let state = state_at("![alt](a.png)", 0, 3);
        assert!(state.is("image"));
        assert!(!state.is("link"));
        assert!(state_at("[x](y)", 0, 2).is("link"));
    }

    #[test]
    fn test_defaults_to_selection_start() {
        let mut buffer = ModeBuffer::from_text("> quoted");
        buffer.set_selection(Range::cursor(Position::new(0, 4)));
        assert!(construct_state(&buffer, None).is("quote"));
    }

    #[test]
    fn test_tree_adapter_agrees() {
        let buffer = TreeBuffer::from_text("1. **step**");
        let state = construct_state(&buffer, Some(Position::new(0, 7)));
        assert!(state.is("ordered-list"));
        assert!(state.is("bold"));
    }

    #[test]
    fn test_unknown_name_is_inactive() {
        assert!(!state_at("## Section", 0, 5).is("heading-x"));
        assert!(!state_at("## Section", 0, 5).is("bogus"));
    }
}
