//! HTML rendering via comrak
//!
//! The command engine never renders; this is the collaborator a preview
//! pane or the command line calls with the current buffer text.

use comrak::{markdown_to_html, Options};

// ─────────────────────────────────────────────────────────────────────────────
// RenderOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown extensions enabled when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Strip raw HTML and dangerous URL schemes
    pub safe: bool,
    /// Prefix for generated heading ids; `None` disables them
    pub header_ids: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: false,
            safe: true,
            header_ids: None,
        }
    }
}

impl RenderOptions {
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.header_ids = self.header_ids.clone();

        options.render.unsafe_ = !self.safe;

        options
    }
}

/// Render `markdown` to an HTML fragment.
pub fn render_html(markdown: &str, options: &RenderOptions) -> String {
    markdown_to_html(markdown, &options.to_comrak_options())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
