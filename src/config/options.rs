//! Editor options
//!
//! Marker styles, insertion templates, prompt and status texts. Everything
//! a command needs to know about user preferences lives here; commands
//! themselves keep no state between calls.

use super::merge::{deep_merge, ArrayMerge};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Marker Styles
// ─────────────────────────────────────────────────────────────────────────────

/// Delimiter written when bold is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoldStyle {
    #[default]
    #[serde(rename = "**")]
    Asterisks,
    #[serde(rename = "__")]
    Underscores,
}

impl BoldStyle {
    pub fn marker(&self) -> &'static str {
        match self {
            BoldStyle::Asterisks => "**",
            BoldStyle::Underscores => "__",
        }
    }
}

/// Delimiter written when italic is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ItalicStyle {
    #[default]
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "_")]
    Underscore,
}

impl ItalicStyle {
    pub fn marker(&self) -> &'static str {
        match self {
            ItalicStyle::Asterisk => "*",
            ItalicStyle::Underscore => "_",
        }
    }
}

/// Fence written when a code block is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CodeFence {
    #[default]
    #[serde(rename = "```")]
    Backticks,
    #[serde(rename = "~~~")]
    Tildes,
}

impl CodeFence {
    pub fn marker(&self) -> &'static str {
        match self {
            CodeFence::Backticks => "```",
            CodeFence::Tildes => "~~~",
        }
    }
}

/// Bullet written for unordered list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ListBullet {
    #[default]
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "+")]
    Plus,
}

impl ListBullet {
    pub fn marker(&self) -> &'static str {
        match self {
            ListBullet::Asterisk => "*",
            ListBullet::Dash => "-",
            ListBullet::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BlockStyles {
    pub bold: BoldStyle,
    pub italic: ItalicStyle,
    pub code: CodeFence,
}

// ─────────────────────────────────────────────────────────────────────────────
// Templates and Texts
// ─────────────────────────────────────────────────────────────────────────────

/// Text placed before and after the selection. `#url#` is substituted.
pub type Template = [String; 2];

fn template(before: &str, after: &str) -> Template {
    [before.to_string(), after.to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertTexts {
    pub link: Template,
    pub image: Template,
    pub uploaded_image: Template,
    pub table: Template,
    pub horizontal_rule: Template,
}

impl Default for InsertTexts {
    fn default() -> Self {
        Self {
            link: template("[", "](#url#)"),
            image: template("![", "](#url#)"),
            uploaded_image: template("![](#url#)", ""),
            table: template(
                "",
                "\n\n| Column 1 | Column 2 | Column 3 |\n| -------- | -------- | -------- |\n| Text     | Text     | Text     |\n\n",
            ),
            horizontal_rule: template("", "\n\n-----\n\n"),
        }
    }
}

/// Messages shown when asking for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTexts {
    pub link: String,
    pub image: String,
}

impl Default for PromptTexts {
    fn default() -> Self {
        Self {
            link: "URL for the link:".to_string(),
            image: "URL of the image:".to_string(),
        }
    }
}

/// Status messages for image uploads. `#image_name#` is substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTexts {
    pub sb_init: String,
    pub sb_on_uploaded: String,
}

impl Default for ImageTexts {
    fn default() -> Self {
        Self {
            sb_init: "Attach files by drag and dropping or pasting from clipboard.".to_string(),
            sb_on_uploaded: "Uploaded #image_name#".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EditorOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Options for one editor instance.
///
/// Serialized to JSON; every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    pub block_styles: BlockStyles,
    pub unordered_list_style: ListBullet,
    pub insert_texts: InsertTexts,
    /// Ask for a URL before drawing a link or image
    pub prompt_urls: bool,
    pub prompt_texts: PromptTexts,
    pub image_texts: ImageTexts,
    /// Columns removed per line when un-indenting a code block
    pub indent_unit: usize,
    /// Shortcut overrides by action name; `null` unbinds
    pub shortcuts: BTreeMap<String, Option<String>>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            block_styles: BlockStyles::default(),
            unordered_list_style: ListBullet::default(),
            insert_texts: InsertTexts::default(),
            prompt_urls: false,
            prompt_texts: PromptTexts::default(),
            image_texts: ImageTexts::default(),
            indent_unit: 4,
            shortcuts: BTreeMap::new(),
        }
    }
}

impl EditorOptions {
    pub const MIN_INDENT_UNIT: usize = 1;
    pub const MAX_INDENT_UNIT: usize = 8;

    /// Repair values a hand-edited file may have broken.
    pub fn sanitize(&mut self) {
        self.indent_unit = self
            .indent_unit
            .clamp(Self::MIN_INDENT_UNIT, Self::MAX_INDENT_UNIT);

        let defaults = PromptTexts::default();
        if self.prompt_texts.link.trim().is_empty() {
            self.prompt_texts.link = defaults.link;
        }
        if self.prompt_texts.image.trim().is_empty() {
            self.prompt_texts.image = defaults.image;
        }

        // Shortcut keys are compared trimmed; empty means unbound
        for shortcut in self.shortcuts.values_mut() {
            if let Some(key) = shortcut {
                let trimmed = key.trim();
                *shortcut = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
            }
        }
    }

    /// Parse options from JSON and sanitize them.
    pub fn from_json_sanitized(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut options: Self = serde_json::from_str(json)?;
        options.sanitize();
        Ok(options)
    }

    /// These options with `overrides` layered on top.
    ///
    /// Template pairs merge by index, so `{"insert_texts": {"link": ["<"]}}`
    /// replaces only the opening half.
    pub fn merged_with(&self, overrides: serde_json::Value) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        deep_merge(&mut base, overrides, ArrayMerge::ByIndex);
        let mut merged: Self = serde_json::from_value(base).map_err(|e| Error::ConfigParse {
            message: format!("Invalid option override: {}", e),
            source: Some(Box::new(e)),
        })?;
        merged.sanitize();
        Ok(merged)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let options = EditorOptions::default();
        assert_eq!(options.block_styles.bold.marker(), "**");
        assert_eq!(options.block_styles.italic.marker(), "*");
        assert_eq!(options.block_styles.code.marker(), "```");
        assert_eq!(options.unordered_list_style.marker(), "*");
        assert_eq!(options.indent_unit, 4);
        assert!(!options.prompt_urls);
        assert_eq!(options.insert_texts.link, template("[", "](#url#)"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options =
            EditorOptions::from_json_sanitized(r#"{"block_styles": {"bold": "__"}}"#).unwrap();
        assert_eq!(options.block_styles.bold, BoldStyle::Underscores);
        assert_eq!(options.block_styles.italic, ItalicStyle::Asterisk);
        assert_eq!(options.indent_unit, 4);
    }

    #[test]
    fn test_sanitize_clamps_indent_unit() {
        let options = EditorOptions::from_json_sanitized(r#"{"indent_unit": 0}"#).unwrap();
        assert_eq!(options.indent_unit, EditorOptions::MIN_INDENT_UNIT);
        let options = EditorOptions::from_json_sanitized(r#"{"indent_unit": 99}"#).unwrap();
        assert_eq!(options.indent_unit, EditorOptions::MAX_INDENT_UNIT);
    }

    #[test]
    fn test_sanitize_repairs_prompt_texts_and_shortcuts() {
        let options = EditorOptions::from_json_sanitized(
            r#"{"prompt_texts": {"link": "  "}, "shortcuts": {"toggle_bold": " "}}"#,
        )
        .unwrap();
        assert_eq!(options.prompt_texts.link, "URL for the link:");
        assert_eq!(options.shortcuts.get("toggle_bold"), Some(&None));
    }

    #[test]
    fn test_invalid_style_is_error() {
        assert!(EditorOptions::from_json_sanitized(r##"{"unordered_list_style": "#"}"##).is_err());
    }

    #[test]
    fn test_merged_with_overrides() {
        let options = EditorOptions::default()
            .merged_with(json!({
                "unordered_list_style": "-",
                "insert_texts": {"link": ["<"]},
                "prompt_urls": true
            }))
            .unwrap();
        assert_eq!(options.unordered_list_style, ListBullet::Dash);
        assert_eq!(options.insert_texts.link, template("<", "](#url#)"));
        assert!(options.prompt_urls);
        // Untouched sections keep their defaults
        assert_eq!(options.insert_texts.image, template("![", "](#url#)"));
    }

    #[test]
    fn test_merged_with_invalid_override_is_error() {
        let result = EditorOptions::default().merged_with(json!({"indent_unit": "wide"}));
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_roundtrip_json() {
        let mut options = EditorOptions::default();
        options.block_styles.code = CodeFence::Tildes;
        options
            .shortcuts
            .insert("draw_link".to_string(), Some("Ctrl+L".to_string()));
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(EditorOptions::from_json_sanitized(&json).unwrap(), options);
    }
}
