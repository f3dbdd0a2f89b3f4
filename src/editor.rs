//! Editor facade
//!
//! Bundles one buffer with its options, its own action registry and the
//! prompt/status collaborators, so callers can run actions by name.

use crate::buffer::TextBuffer;
use crate::commands::{
    self, AcceptDefault, Command, CommandEnv, LogStatus, Outcome, StatusSink, UrlPrompt,
};
use crate::config::EditorOptions;
use crate::error::Result;
use crate::inspector::{construct_state, ConstructState};
use crate::registry::ActionRegistry;
use crate::stats::{cursor_label, TextStats};

/// Status item used for upload messages.
const UPLOAD_STATUS_ITEM: &str = "upload-image";

/// A buffer plus everything needed to run commands against it.
pub struct Editor<B: TextBuffer> {
    buffer: B,
    options: EditorOptions,
    registry: ActionRegistry,
    prompt: Box<dyn UrlPrompt>,
    status: Box<dyn StatusSink>,
}

impl<B: TextBuffer> Editor<B> {
    /// Editor that accepts default URLs and logs status updates.
    pub fn new(buffer: B, options: EditorOptions) -> Self {
        let registry = ActionRegistry::from_options(&options);
        Self {
            buffer,
            options,
            registry,
            prompt: Box::new(AcceptDefault),
            status: Box::new(LogStatus),
        }
    }

    pub fn with_prompt(mut self, prompt: impl UrlPrompt + 'static) -> Self {
        self.prompt = Box::new(prompt);
        self
    }

    /// Replace the status sink. The new sink is primed with the
    /// configured upload hint.
    pub fn with_status(mut self, status: impl StatusSink + 'static) -> Self {
        self.status = Box::new(status);
        self.status
            .update_status(UPLOAD_STATUS_ITEM, &self.options.image_texts.sb_init);
        self
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> B {
        self.buffer
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Swap in new options; shortcut overrides are re-applied.
    pub fn set_options(&mut self, options: EditorOptions) {
        self.registry = ActionRegistry::from_options(&options);
        self.options = options;
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Run the action registered as `name`.
    pub fn run(&mut self, name: &str) -> Result<Outcome> {
        let mut env = CommandEnv::new(&self.options, &mut *self.prompt, &mut *self.status);
        self.registry.apply(name, &mut self.buffer, &mut env)
    }

    pub fn run_command(&mut self, command: Command) -> Result<Outcome> {
        let mut env = CommandEnv::new(&self.options, &mut *self.prompt, &mut *self.status);
        command.apply(&mut self.buffer, &mut env)
    }

    /// Insert the result of a finished upload.
    pub fn draw_uploaded_image(&mut self, url: &str) -> Result<Outcome> {
        let mut env = CommandEnv::new(&self.options, &mut *self.prompt, &mut *self.status);
        commands::draw_uploaded_image(&mut self.buffer, &mut env, url)
    }

    /// Constructs active at the selection start.
    pub fn state(&self) -> ConstructState {
        construct_state(&self.buffer, None)
    }

    pub fn stats(&self) -> TextStats {
        TextStats::from_text(&self.buffer.text())
    }

    /// `line:column` of the selection start, one-based.
    pub fn cursor_label(&self) -> String {
        cursor_label(self.buffer.selection().start)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
