//! Flat lexical classification shared by both buffer adapters
//!
//! Each adapter reduces its own representation (line-mode scanner state or
//! syntax tree) to a `TokenMap`: per line, a set of line-wide types plus a
//! per-character type mask, and the fence / indented-code facts the code
//! toggle needs. Commands only ever see the resulting [`Token`].

use super::Position;
use std::collections::BTreeSet;

// ─────────────────────────────────────────────────────────────────────────────
// Token Types
// ─────────────────────────────────────────────────────────────────────────────

/// Lexical category of text at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenType {
    /// `**strong**` / `__strong__`
    Strong,
    /// `*em*` / `_em_`
    Em,
    /// `~~strikethrough~~`
    Strikethrough,
    /// `> quoted` line
    Quote,
    /// Line that starts a list item (bullet or number)
    ListItem,
    /// Code of any kind: inline span, fenced block, indented block
    Code,
    /// `[text](url)`
    Link,
    /// `![alt](url)`
    Image,
    /// GFM table row
    Table,
    /// ATX heading with its level
    Header(u8),
}

impl TokenType {
    /// Bit used in per-character masks. Headers are tracked per line.
    pub(crate) fn bit(self) -> u16 {
        match self {
            TokenType::Strong => 1 << 0,
            TokenType::Em => 1 << 1,
            TokenType::Strikethrough => 1 << 2,
            TokenType::Quote => 1 << 3,
            TokenType::ListItem => 1 << 4,
            TokenType::Code => 1 << 5,
            TokenType::Link => 1 << 6,
            TokenType::Image => 1 << 7,
            TokenType::Table => 1 << 8,
            TokenType::Header(_) => 0,
        }
    }

    const MASKED: [TokenType; 9] = [
        TokenType::Strong,
        TokenType::Em,
        TokenType::Strikethrough,
        TokenType::Quote,
        TokenType::ListItem,
        TokenType::Code,
        TokenType::Link,
        TokenType::Image,
        TokenType::Table,
    ];
}

/// Classification of one position, normalized from whatever the adapter
/// parses internally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    /// Lexical types covering the position
    pub types: BTreeSet<TokenType>,
    /// Fence run (e.g. "```" or "~~~~") when inside or on a fenced block
    pub fence_chars: Option<String>,
    /// Whether the line belongs to an indented code block
    pub indented_code: bool,
    /// Whether the line is itself a fence delimiter
    pub fence_line: bool,
    /// Whether that delimiter opens its block; `false` on a closing fence
    pub fence_open: bool,
}

impl Token {
    pub fn has(&self, kind: TokenType) -> bool {
        self.types.contains(&kind)
    }

    /// Heading level, if the position is on a heading line.
    pub fn header_level(&self) -> Option<u8> {
        self.types.iter().find_map(|t| match t {
            TokenType::Header(level) => Some(*level),
            _ => None,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Token Map
// ─────────────────────────────────────────────────────────────────────────────

/// Classification facts for a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LineTokens {
    /// Types covering the whole line
    pub line_mask: u16,
    /// Types per character, indexed by column
    pub chars: Vec<u16>,
    pub header: Option<u8>,
    pub fence_chars: Option<String>,
    pub fence_line: bool,
    pub fence_open: bool,
    pub indented_code: bool,
}

impl LineTokens {
    pub fn with_len(len: usize) -> Self {
        Self {
            chars: vec![0; len],
            ..Self::default()
        }
    }

    /// OR `kind` into columns `[from, to)`, clipped to the line.
    pub fn mark(&mut self, from: usize, to: usize, kind: TokenType) {
        let to = to.min(self.chars.len());
        for cell in self.chars.iter_mut().take(to).skip(from) {
            *cell |= kind.bit();
        }
    }

    pub fn mark_line(&mut self, kind: TokenType) {
        match kind {
            TokenType::Header(level) => self.header = Some(level),
            other => self.line_mask |= other.bit(),
        }
    }
}

/// Per-line classification for a whole document.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenMap {
    pub lines: Vec<LineTokens>,
}

impl TokenMap {
    /// Token for the character before `pos` (the first character at
    /// column zero). Positions off the document yield an empty token.
    pub fn token_at(&self, pos: Position) -> Token {
        let Some(line) = self.lines.get(pos.line) else {
            return Token::default();
        };

        let column = pos.column.saturating_sub(1);
        let mut mask = line.line_mask;
        if let Some(cell) = line.chars.get(column) {
            mask |= *cell;
        }

        let mut types: BTreeSet<TokenType> = TokenType::MASKED
            .iter()
            .copied()
            .filter(|t| mask & t.bit() != 0)
            .collect();
        if let Some(level) = line.header {
            types.insert(TokenType::Header(level));
        }

        Token {
            types,
            fence_chars: line.fence_chars.clone(),
            indented_code: line.indented_code,
            fence_line: line.fence_line,
            fence_open: line.fence_open,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> TokenMap {
        let mut line = LineTokens::with_len(6);
        line.mark(2, 4, TokenType::Strong);
        line.mark_line(TokenType::Header(2));
        TokenMap { lines: vec![line] }
    }

    #[test]
    fn test_token_reads_char_before_position() {
        let map = sample_map();
        assert!(!map.token_at(Position::new(0, 2)).has(TokenType::Strong));
        assert!(map.token_at(Position::new(0, 3)).has(TokenType::Strong));
        assert!(map.token_at(Position::new(0, 4)).has(TokenType::Strong));
        assert!(!map.token_at(Position::new(0, 5)).has(TokenType::Strong));
    }

    #[test]
    fn test_column_zero_reads_first_char() {
        let mut line = LineTokens::with_len(3);
        line.mark(0, 1, TokenType::Em);
        let map = TokenMap { lines: vec![line] };
        assert!(map.token_at(Position::new(0, 0)).has(TokenType::Em));
        assert!(map.token_at(Position::new(0, 1)).has(TokenType::Em));
    }

    #[test]
    fn test_header_level() {
        let token = sample_map().token_at(Position::new(0, 1));
        assert_eq!(token.header_level(), Some(2));
    }

    #[test]
    fn test_missing_line_is_empty_token() {
        let token = sample_map().token_at(Position::new(5, 0));
        assert_eq!(token, Token::default());
    }

    #[test]
    fn test_mark_is_clipped() {
        let mut line = LineTokens::with_len(2);
        line.mark(1, 10, TokenType::Code);
        assert_eq!(line.chars, vec![0, TokenType::Code.bit()]);
    }
}
