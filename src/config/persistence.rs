//! Options file persistence
//!
//! Loads and saves `options.json` in the platform configuration directory
//! with graceful fallback to defaults.

use crate::config::EditorOptions;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "mdtoggle";

/// Options file name
const OPTIONS_FILE_NAME: &str = "options.json";

/// Backup file name (used during atomic writes)
const OPTIONS_BACKUP_NAME: &str = "options.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\mdtoggle\`
/// - **macOS**: `~/Library/Application Support/mdtoggle/`
/// - **Linux**: `~/.config/mdtoggle/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Full path to the options file.
pub fn get_options_file_path() -> Result<PathBuf> {
    Ok(options_file_in(&get_config_dir()?))
}

/// Path of the options file inside `dir`.
pub fn options_file_in(dir: &Path) -> PathBuf {
    dir.join(OPTIONS_FILE_NAME)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Options
// ─────────────────────────────────────────────────────────────────────────────

/// Load options from the default location, falling back to defaults when
/// the file is missing or unreadable.
pub fn load_options() -> EditorOptions {
    get_options_file_path()
        .and_then(|path| load_options_from(&path))
        .unwrap_or_warn_default(EditorOptions::default(), "Failed to load options")
}

/// Load and sanitize options from `path`.
///
/// A missing or empty file yields the defaults. Invalid JSON is an error.
pub fn load_options_from(path: &Path) -> Result<EditorOptions> {
    if !path.exists() {
        debug!("Options file not found at {}, using defaults", path.display());
        return Ok(EditorOptions::default());
    }

    debug!("Loading options from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Options file is empty, using defaults");
        return Ok(EditorOptions::default());
    }

    let options = EditorOptions::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Options file at {} contains invalid JSON: {}",
            path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse options file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!("Options loaded from {}", path.display());
    Ok(options)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Options
// ─────────────────────────────────────────────────────────────────────────────

/// Save options to the default location.
pub fn save_options(options: &EditorOptions) -> Result<()> {
    save_options_in(&get_config_dir()?, options)
}

/// Save options into `dir`, writing a backup file first and renaming it
/// over the real one.
pub fn save_options_in(dir: &Path, options: &EditorOptions) -> Result<()> {
    ensure_dir(dir)?;
    let options_path = options_file_in(dir);
    let backup_path = dir.join(OPTIONS_BACKUP_NAME);

    debug!("Saving options to: {}", options_path.display());

    let json = serde_json::to_string_pretty(options).map_err(|e| Error::ConfigSave {
        path: options_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &options_path).map_err(|e| Error::ConfigSave {
        path: options_path.clone(),
        source: Box::new(e),
    })?;

    info!("Options saved to {}", options_path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoldStyle, ListBullet};
    use tempfile::TempDir;

    struct TestEnv {
        temp_dir: TempDir,
    }

    impl TestEnv {
        fn new() -> Self {
            Self {
                temp_dir: TempDir::new().expect("Failed to create temp dir"),
            }
        }

        fn dir(&self) -> PathBuf {
            self.temp_dir.path().join(APP_NAME)
        }

        fn options_file(&self) -> PathBuf {
            self.dir().join(OPTIONS_FILE_NAME)
        }

        fn write_options(&self, content: &str) {
            fs::create_dir_all(self.dir()).expect("Failed to create config dir");
            fs::write(self.options_file(), content).expect("Failed to write options");
        }
    }

    #[test]
    fn test_get_config_dir_names_app() {
        if let Ok(path) = get_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let options = load_options_from(&env.options_file()).unwrap();
        assert_eq!(options, EditorOptions::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let env = TestEnv::new();
        env.write_options("   \n");
        let options = load_options_from(&env.options_file()).unwrap();
        assert_eq!(options, EditorOptions::default());
    }

    #[test]
    fn test_partial_file_is_sanitized() {
        let env = TestEnv::new();
        env.write_options(r#"{"unordered_list_style": "-", "indent_unit": 40}"#);
        let options = load_options_from(&env.options_file()).unwrap();
        assert_eq!(options.unordered_list_style, ListBullet::Dash);
        assert_eq!(options.indent_unit, EditorOptions::MAX_INDENT_UNIT);
    }

    #[test]
    fn test_corrupted_file_is_parse_error() {
        let env = TestEnv::new();
        env.write_options("{ invalid json }");
        let result = load_options_from(&env.options_file());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_save_creates_dir_and_roundtrips() {
        let env = TestEnv::new();
        let mut options = EditorOptions::default();
        options.block_styles.bold = BoldStyle::Underscores;
        options.prompt_urls = true;

        save_options_in(&env.dir(), &options).unwrap();

        assert!(env.options_file().exists());
        assert!(!env.dir().join(OPTIONS_BACKUP_NAME).exists());
        assert_eq!(load_options_from(&env.options_file()).unwrap(), options);
    }

    #[test]
    fn test_load_options_graceful_fallback() {
        // Whatever the real config dir holds, this never panics
        let options = load_options();
        assert!(options.indent_unit >= EditorOptions::MIN_INDENT_UNIT);
    }
}
