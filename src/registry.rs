//! Per-editor action registry
//!
//! Maps action names (`toggle_bold`, `toggle_heading_3`, ...) to the
//! command they run plus the toolbar metadata. Each editor owns its own
//! registry, so shortcut overrides never leak between instances.

use crate::buffer::TextBuffer;
use crate::commands::{Command, CommandEnv, Outcome};
use crate::config::EditorOptions;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::HashMap;

/// A registered action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub command: Command,
    /// Keyboard shortcut, if bound
    pub shortcut: Option<String>,
    pub icon: &'static str,
    pub title: String,
}

impl Action {
    pub fn new(command: Command) -> Self {
        Self {
            name: command.name(),
            command,
            shortcut: command.shortcut_label().map(str::to_string),
            icon: command.icon(),
            title: command.title(),
        }
    }

    /// Title with the shortcut appended, for tooltips.
    pub fn tooltip(&self) -> String {
        match &self.shortcut {
            Some(shortcut) => format!("{} ({})", self.title, shortcut),
            None => self.title.clone(),
        }
    }
}

/// Ordered collection of actions, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<Action>,
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    /// Registry holding every built-in command with its default shortcut.
    pub fn new() -> Self {
        let mut registry = Self::default();
        for command in Command::all() {
            registry.register(Action::new(command));
        }
        registry
    }

    /// Built-in commands with the shortcut overrides from `options`.
    ///
    /// An override of `None` unbinds the action. Overrides naming an
    /// unknown action are ignored.
    pub fn from_options(options: &EditorOptions) -> Self {
        let mut registry = Self::new();
        for (name, shortcut) in &options.shortcuts {
            match registry.index.get(name) {
                Some(&idx) => {
                    debug!("shortcut override for {}: {:?}", name, shortcut);
                    registry.actions[idx].shortcut = shortcut.clone();
                }
                None => warn!("Ignoring shortcut for unknown action '{}'", name),
            }
        }
        registry
    }

    /// Add `action`, replacing any action with the same name in place.
    pub fn register(&mut self, action: Action) {
        match self.index.get(&action.name) {
            Some(&idx) => self.actions[idx] = action,
            None => {
                self.index.insert(action.name.clone(), self.actions.len());
                self.actions.push(action);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.index.get(name).map(|&idx| &self.actions[idx])
    }

    /// Action bound to `shortcut`, compared case-insensitively.
    pub fn find_by_shortcut(&self, shortcut: &str) -> Option<&Action> {
        self.actions.iter().find(|action| {
            action
                .shortcut
                .as_deref()
                .map(|s| s.eq_ignore_ascii_case(shortcut))
                .unwrap_or(false)
        })
    }

    /// Actions in toolbar order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run the action called `name`.
    pub fn apply(
        &self,
        name: &str,
        buffer: &mut dyn TextBuffer,
        env: &mut CommandEnv<'_>,
    ) -> Result<Outcome> {
        let action = self
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))?;
        debug!("running action {}", action.name);
        action.command.apply(buffer, env)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ModeBuffer, Position, Range};
    use crate::commands::{AcceptDefault, LogStatus};

    #[test]
    fn test_registry_has_every_command() {
        let registry = ActionRegistry::new();
        assert_eq!(registry.len(), Command::all().len());
        assert_eq!(
            registry.get("toggle_heading_2").map(|a| a.command),
            Some(Command::Heading(2))
        );
        assert!(registry.get("toggle_heading_7").is_none());
    }

    #[test]
    fn test_registry_preserves_toolbar_order() {
        let registry = ActionRegistry::new();
        let names: Vec<&str> = registry.iter().map(|a| a.name.as_str()).take(3).collect();
        assert_eq!(names, vec!["toggle_bold", "toggle_italic", "toggle_strikethrough"]);
    }

    #[test]
    fn test_shortcut_overrides() {
        let mut options = EditorOptions::default();
        options
            .shortcuts
            .insert("toggle_bold".to_string(), Some("Ctrl+Shift+B".to_string()));
        options.shortcuts.insert("undo".to_string(), None);
        options
            .shortcuts
            .insert("no_such_action".to_string(), Some("Ctrl+Q".to_string()));

        let registry = ActionRegistry::from_options(&options);
        let bold = registry.get("toggle_bold").unwrap();
        assert_eq!(bold.shortcut.as_deref(), Some("Ctrl+Shift+B"));
        assert_eq!(bold.tooltip(), "Bold (Ctrl+Shift+B)");
        assert_eq!(registry.get("undo").unwrap().shortcut, None);
        assert!(registry.get("no_such_action").is_none());
    }

    #[test]
    fn test_registries_are_independent() {
        let mut options = EditorOptions::default();
        options.shortcuts.insert("toggle_italic".to_string(), None);
        let custom = ActionRegistry::from_options(&options);
        let plain = ActionRegistry::new();
        assert_eq!(custom.get("toggle_italic").unwrap().shortcut, None);
        assert_eq!(
            plain.get("toggle_italic").unwrap().shortcut.as_deref(),
            Some("Ctrl+I")
        );
    }

    #[test]
    fn test_find_by_shortcut() {
        let registry = ActionRegistry::new();
        assert_eq!(
            registry.find_by_shortcut("ctrl+k").map(|a| a.command),
            Some(Command::Link)
        );
        assert!(registry.find_by_shortcut("Ctrl+Q").is_none());
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut registry = ActionRegistry::new();
        let before = registry.len();
        let mut action = Action::new(Command::Table);
        action.title = "Table".to_string();
        registry.register(action);
        assert_eq!(registry.len(), before);
        assert_eq!(registry.get("draw_table").unwrap().title, "Table");
    }

    #[test]
    fn test_apply_by_name() {
        let registry = ActionRegistry::new();
        let options = EditorOptions::default();
        let (mut prompt, mut status) = (AcceptDefault, LogStatus);
        let mut env = CommandEnv::new(&options, &mut prompt, &mut status);
        let mut buffer = ModeBuffer::from_text("title");
        buffer.set_selection(Range::cursor(Position::new(0, 0)));

        let outcome = registry.apply("toggle_heading_2", &mut buffer, &mut env).unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(buffer.text(), "## title");

        let err = registry.apply("explode", &mut buffer, &mut env).unwrap_err();
        assert!(matches!(err, Error::UnknownAction(name) if name == "explode"));
    }
}
