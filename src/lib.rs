//! mdtoggle - Markdown structural editing commands
//!
//! Toggle bold, italic and strikethrough, block quotes, lists, headings and
//! code blocks, and insert links, images, tables and rules, against any
//! editing surface that implements [`buffer::TextBuffer`].

pub mod buffer;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod inspector;
pub mod patterns;
pub mod registry;
pub mod render;
pub mod stats;
pub mod string_utils;

pub use buffer::{ModeBuffer, Position, Range, TextBuffer, TreeBuffer};
pub use commands::{Command, CommandEnv, Outcome};
pub use config::EditorOptions;
pub use editor::Editor;
pub use error::{Error, Result};
