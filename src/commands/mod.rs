//! Markdown toggle and draw commands
//!
//! Every command reads the construct state at the selection, rewrites the
//! affected lines through the [`TextBuffer`] and leaves a selection that
//! still covers the same logical text.
//!
//! # Supported Commands
//! - **Inline**: Bold, Italic, Strikethrough
//! - **Line prefix**: Blockquote, Ordered list, Unordered list
//! - **Headings**: Smaller, Bigger, Level 1-6
//! - **Code**: Inline span, fenced block, indented block
//! - **Drawables**: Link, Image, Table, Horizontal rule, Uploaded image
//! - **Cleanup**: Clean block, Undo, Redo
//!
//! # Usage
//! ```ignore
//! use mdtoggle::buffer::{ModeBuffer, Position, Range, TextBuffer};
//! use mdtoggle::commands::{toggle_bold, AcceptDefault, CommandEnv, LogStatus};
//! use mdtoggle::config::EditorOptions;
//!
//! let options = EditorOptions::default();
//! let (mut prompt, mut status) = (AcceptDefault, LogStatus);
//! let mut env = CommandEnv::new(&options, &mut prompt, &mut status);
//!
//! let mut buffer = ModeBuffer::from_text("hello world");
//! buffer.set_selection(Range::new(Position::new(0, 6), Position::new(0, 11)));
//! toggle_bold(&mut buffer, &mut env)?;
//! assert_eq!(buffer.text(), "hello **world**");
//! ```

mod clean;
mod code;
mod drawable;
mod heading;
mod history;
mod inline;
mod line_prefix;
mod link;


pub use clean::clean_block;
pub use code::{code_type, toggle_code_block, CodeType};
pub use drawable::{
    draw_horizontal_rule, draw_table, draw_uploaded_image, replace_selection,
};
pub use heading::{toggle_heading, toggle_heading_bigger, toggle_heading_smaller};
pub use history::{redo, undo};
pub use inline::{toggle_bold, toggle_italic, toggle_strikethrough};
pub use line_prefix::{toggle_blockquote, toggle_ordered_list, toggle_unordered_list};
pub use link::{draw_image, draw_link, escape_prompt_url};

use crate::buffer::TextBuffer;
use crate::config::EditorOptions;
use crate::error::Result;
use log::info;

// ─────────────────────────────────────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// What a command did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Markup was added (or the buffer was otherwise changed)
    Applied,
    /// Markup was removed
    ToggledOff,
    /// The command chose not to act, e.g. the URL prompt was cancelled
    Declined,
    /// A render-only preview is showing; nothing was touched
    Skipped,
}

impl Outcome {
    /// Whether the command ran to completion. Only [`Outcome::Declined`]
    /// reads as "no".
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Declined)
    }

    pub(crate) fn toggled(was_active: bool) -> Self {
        if was_active {
            Outcome::ToggledOff
        } else {
            Outcome::Applied
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborators
// ─────────────────────────────────────────────────────────────────────────────

/// Asks the user for a URL.
pub trait UrlPrompt {
    /// Show `message` with `default` prefilled. `None` means cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}

impl<F> UrlPrompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        self(message, default)
    }
}

/// Prompt that accepts the prefilled default without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDefault;

impl UrlPrompt for AcceptDefault {
    fn prompt(&mut self, _message: &str, default: &str) -> Option<String> {
        Some(default.to_string())
    }
}

/// Receives status-bar updates.
pub trait StatusSink {
    fn update_status(&mut self, item: &str, text: &str);
}

impl<F> StatusSink for F
where
    F: FnMut(&str, &str),
{
    fn update_status(&mut self, item: &str, text: &str) {
        self(item, text)
    }
}

/// Status sink that writes updates to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn update_status(&mut self, item: &str, text: &str) {
        info!("[{}] {}", item, text);
    }
}

/// Everything a command may consult besides the buffer.
pub struct CommandEnv<'a> {
    pub options: &'a EditorOptions,
    pub prompt: &'a mut dyn UrlPrompt,
    pub status: &'a mut dyn StatusSink,
}

impl<'a> CommandEnv<'a> {
    pub fn new(
        options: &'a EditorOptions,
        prompt: &'a mut dyn UrlPrompt,
        status: &'a mut dyn StatusSink,
    ) -> Self {
        Self {
            options,
            prompt,
            status,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Commands an editor can bind to a toolbar button or a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Bold,
    Italic,
    Strikethrough,
    Blockquote,
    HeadingSmaller,
    HeadingBigger,
    /// Heading level 1-6
    Heading(u8),
    OrderedList,
    UnorderedList,
    CodeBlock,
    CleanBlock,
    Link,
    Image,
    Table,
    HorizontalRule,
    Undo,
    Redo,
}

impl Command {
    /// Every command, in toolbar order.
    pub fn all() -> Vec<Command> {
        let mut all = vec![
            Command::Bold,
            Command::Italic,
            Command::Strikethrough,
            Command::HeadingSmaller,
            Command::HeadingBigger,
        ];
        all.extend((1..=6).map(Command::Heading));
        all.extend([
            Command::CodeBlock,
            Command::Blockquote,
            Command::UnorderedList,
            Command::OrderedList,
            Command::CleanBlock,
            Command::Link,
            Command::Image,
            Command::Table,
            Command::HorizontalRule,
            Command::Undo,
            Command::Redo,
        ]);
        all
    }

    /// Action name used by the registry and the command line.
    pub fn name(&self) -> String {
        let name = match self {
            Self::Bold => "toggle_bold",
            Self::Italic => "toggle_italic",
            Self::Strikethrough => "toggle_strikethrough",
            Self::Blockquote => "toggle_blockquote",
            Self::HeadingSmaller => "toggle_heading_smaller",
            Self::HeadingBigger => "toggle_heading_bigger",
            Self::Heading(n) => return format!("toggle_heading_{}", n),
            Self::OrderedList => "toggle_ordered_list",
            Self::UnorderedList => "toggle_unordered_list",
            Self::CodeBlock => "toggle_code_block",
            Self::CleanBlock => "clean_block",
            Self::Link => "draw_link",
            Self::Image => "draw_image",
            Self::Table => "draw_table",
            Self::HorizontalRule => "draw_horizontal_rule",
            Self::Undo => "undo",
            Self::Redo => "redo",
        };
        name.to_string()
    }

    /// Get the default keyboard shortcut label for this command.
    pub fn shortcut_label(&self) -> Option<&'static str> {
        let label = match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Strikethrough => return None,
            Self::Blockquote => "Ctrl+'",
            Self::HeadingSmaller => "Ctrl+H",
            Self::HeadingBigger => "Shift+Ctrl+H",
            Self::Heading(1) => "Ctrl+Alt+1",
            Self::Heading(2) => "Ctrl+Alt+2",
            Self::Heading(3) => "Ctrl+Alt+3",
            Self::Heading(_) => return None,
            Self::OrderedList => "Ctrl+Alt+L",
            Self::UnorderedList => "Ctrl+L",
            Self::CodeBlock => "Ctrl+Alt+C",
            Self::CleanBlock => "Ctrl+E",
            Self::Link => "Ctrl+K",
            Self::Image => "Ctrl+Alt+I",
            Self::Table => return None,
            Self::HorizontalRule => return None,
            Self::Undo => "Ctrl+Z",
            Self::Redo => "Ctrl+Y",
        };
        Some(label)
    }

    /// Get the icon for this command (for toolbar).
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Bold => "𝐁",
            Self::Italic => "𝐼",
            Self::Strikethrough => "S̶",
            Self::Blockquote => "\u{275D}", // ❝
            Self::HeadingSmaller => "H-",
            Self::HeadingBigger => "H+",
            Self::Heading(1) => "H1",
            Self::Heading(2) => "H2",
            Self::Heading(3) => "H3",
            Self::Heading(4) => "H4",
            Self::Heading(5) => "H5",
            Self::Heading(6) => "H6",
            Self::Heading(_) => "H",
            Self::OrderedList => "1.",
            Self::UnorderedList => "\u{2022}", // •
            Self::CodeBlock => "{ }",
            Self::CleanBlock => "\u{232B}", // ⌫
            Self::Link => "🔗",
            Self::Image => "🖼",
            Self::Table => "\u{229E}", // ⊞
            Self::HorizontalRule => "\u{2015}", // ―
            Self::Undo => "\u{21B6}", // ↶
            Self::Redo => "\u{21B7}", // ↷
        }
    }

    /// Human readable title, without the shortcut.
    pub fn title(&self) -> String {
        let name = match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::Blockquote => "Quote",
            Self::HeadingSmaller => "Smaller Heading",
            Self::HeadingBigger => "Bigger Heading",
            Self::Heading(n) => return format!("Heading {}", n),
            Self::OrderedList => "Numbered List",
            Self::UnorderedList => "Generic List",
            Self::CodeBlock => "Code",
            Self::CleanBlock => "Clean block",
            Self::Link => "Create Link",
            Self::Image => "Insert Image",
            Self::Table => "Insert Table",
            Self::HorizontalRule => "Insert Horizontal Line",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
        };
        name.to_string()
    }

    /// Get the tooltip text for this command.
    pub fn tooltip(&self) -> String {
        match self.shortcut_label() {
            Some(shortcut) => format!("{} ({})", self.title(), shortcut),
            None => self.title(),
        }
    }

    /// Run the command against `buffer`.
    pub fn apply(&self, buffer: &mut dyn TextBuffer, env: &mut CommandEnv<'_>) -> Result<Outcome> {
        match self {
            Self::Bold => toggle_bold(buffer, env),
            Self::Italic => toggle_italic(buffer, env),
            Self::Strikethrough => toggle_strikethrough(buffer, env),
            Self::Blockquote => toggle_blockquote(buffer, env),
            Self::HeadingSmaller => toggle_heading_smaller(buffer),
            Self::HeadingBigger => toggle_heading_bigger(buffer),
            Self::Heading(level) => toggle_heading(buffer, *level),
            Self::OrderedList => toggle_ordered_list(buffer, env),
            Self::UnorderedList => toggle_unordered_list(buffer, env),
            Self::CodeBlock => toggle_code_block(buffer, env),
            Self::CleanBlock => clean_block(buffer),
            Self::Link => draw_link(buffer, env),
            Self::Image => draw_image(buffer, env),
            Self::Table => draw_table(buffer, env),
            Self::HorizontalRule => draw_horizontal_rule(buffer, env),
            Self::Undo => undo(buffer),
            Self::Redo => redo(buffer),
        }
    }
}

/// Commands refuse to touch a buffer that is showing a preview.
pub(crate) fn in_preview(buffer: &dyn TextBuffer) -> bool {
    buffer.is_preview_active()
}
