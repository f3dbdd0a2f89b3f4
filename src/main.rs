//! mdtoggle - command-line driver
//!
//! Runs one editing action against a Markdown file and prints the result,
//! or renders/inspects the file.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use mdtoggle::buffer::{ModeBuffer, Position, Range, TextBuffer, TreeBuffer};
use mdtoggle::commands::Outcome;
use mdtoggle::config::{
    get_options_file_path, load_options, load_options_from, options_file_in, save_options,
    save_options_in, EditorOptions,
};
use mdtoggle::editor::Editor;
use mdtoggle::registry::ActionRegistry;
use mdtoggle::render::{render_html, RenderOptions};
use mdtoggle::stats::TextStats;
use mdtoggle::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "mdtoggle";

/// Pseudo-action that inserts an uploaded file's URL.
const UPLOAD_ACTION: &str = "draw_uploaded_image";

#[derive(Parser, Debug)]
#[command(name = "mdtoggle")]
#[command(about = "Toggle Markdown constructs in a file", long_about = None)]
struct Args {
    /// Options file to use instead of the one in the config directory
    #[arg(short = 'o', long = "options", value_name = "FILE")]
    options: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an action and print the resulting document
    Apply {
        /// Action name, e.g. toggle_bold (see `mdtoggle actions`)
        action: String,
        /// Markdown file to edit
        file: PathBuf,
        /// Selection start as LINE:COLUMN, one-based
        #[arg(long, value_parser = parse_position, default_value = "1:1")]
        from: Position,
        /// Selection end as LINE:COLUMN, one-based (defaults to --from)
        #[arg(long, value_parser = parse_position)]
        to: Option<Position>,
        /// URL answered to the link/image prompt, or the uploaded file URL
        #[arg(long)]
        url: Option<String>,
        /// Classify with the syntax tree instead of the line tokenizer
        #[arg(long)]
        tree: bool,
        /// Write the result back to the file instead of printing it
        #[arg(short = 'i', long = "in-place")]
        in_place: bool,
    },
    /// Render the file to HTML
    Render {
        file: PathBuf,
        /// Keep raw HTML in the output
        #[arg(long = "unsafe")]
        allow_html: bool,
    },
    /// Print word, character and line counts
    Stats { file: PathBuf },
    /// List every action with its shortcut
    Actions,
    /// Write the current options (defaults, or --options) as an options file
    InitOptions {
        /// Directory to write options.json into instead of the config directory
        dir: Option<PathBuf>,
        /// Overwrite an existing options file
        #[arg(long)]
        force: bool,
    },
}

/// Parse a one-based `LINE:COLUMN` into a zero-based position.
fn parse_position(value: &str) -> std::result::Result<Position, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got '{}'", value))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| format!("invalid line '{}'", line))?;
    let column: usize = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{}'", column))?;
    if line == 0 || column == 0 {
        return Err("line and column start at 1".to_string());
    }
    Ok(Position::new(line - 1, column - 1))
}

fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

fn load(options_path: Option<&Path>) -> Result<EditorOptions> {
    match options_path {
        Some(path) => load_options_from(path),
        None => Ok(load_options()),
    }
}

/// Save `options` into `dir` (or the config directory), refusing to
/// replace an existing file unless `force` is set.
fn init_options(options: &EditorOptions, dir: Option<&Path>, force: bool) -> Result<PathBuf> {
    let target = match dir {
        Some(dir) => options_file_in(dir),
        None => get_options_file_path()?,
    };
    if target.exists() && !force {
        return Err(Error::Application(format!(
            "{} already exists, pass --force to overwrite",
            target.display()
        )));
    }
    match dir {
        Some(dir) => save_options_in(dir, options)?,
        None => save_options(options)?,
    }
    Ok(target)
}

struct ApplyRequest<'a> {
    action: &'a str,
    range: Range,
    url: Option<&'a str>,
}

fn apply<B: TextBuffer>(
    buffer: B,
    mut options: EditorOptions,
    request: &ApplyRequest<'_>,
) -> Result<(Outcome, String)> {
    let url = request.url.map(str::to_string);
    if url.is_some() && request.action != UPLOAD_ACTION {
        options.prompt_urls = true;
    }

    let answer = url.clone();
    let mut editor = Editor::new(buffer, options).with_prompt(
        move |message: &str, _default: &str| -> Option<String> {
            info!("{} {}", message, answer.as_deref().unwrap_or(""));
            answer.clone()
        },
    );
    editor.buffer_mut().set_selection(request.range);

    let outcome = if request.action == UPLOAD_ACTION {
        let url = url.ok_or_else(|| {
            Error::Application(format!("{} needs --url", UPLOAD_ACTION))
        })?;
        editor.draw_uploaded_image(&url)?
    } else {
        editor.run(request.action)?
    };

    let selection = editor.buffer().selection();
    info!(
        "{} -> {:?}, selection {}..{}",
        request.action,
        outcome,
        mdtoggle::stats::cursor_label(selection.start),
        mdtoggle::stats::cursor_label(selection.end)
    );
    Ok((outcome, editor.buffer().text()))
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Apply {
            action,
            file,
            from,
            to,
            url,
            tree,
            in_place,
        } => {
            let options = load(args.options.as_deref())?;
            let text = read_file(&file)?;
            let request = ApplyRequest {
                action: &action,
                range: Range::new(from, to.unwrap_or(from)),
                url: url.as_deref(),
            };

            let (outcome, result) = if tree {
                apply(TreeBuffer::from_text(&text), options, &request)?
            } else {
                apply(ModeBuffer::from_text(&text), options, &request)?
            };
            if outcome == Outcome::Declined {
                warn!("{} declined; document unchanged", action);
            }

            if in_place {
                fs::write(&file, &result)?;
                info!("Wrote {}", file.display());
            } else {
                println!("{}", result);
            }
        }
        Commands::Render { file, allow_html } => {
            let text = read_file(&file)?;
            let options = RenderOptions {
                safe: !allow_html,
                ..RenderOptions::default()
            };
            print!("{}", render_html(&text, &options));
        }
        Commands::Stats { file } => {
            let text = read_file(&file)?;
            println!("{}", TextStats::from_text(&text).format_compact());
        }
        Commands::Actions => {
            let options = load(args.options.as_deref())?;
            let registry = ActionRegistry::from_options(&options);
            for action in registry.iter() {
                println!(
                    "{:<24} {:<14} {}",
                    action.name,
                    action.shortcut.as_deref().unwrap_or("-"),
                    action.title
                );
            }
            println!("{:<24} {:<14} {}", UPLOAD_ACTION, "-", "Insert uploaded file (needs --url)");
        }
        Commands::InitOptions { dir, force } => {
            let options = load(args.options.as_deref())?;
            let path = init_options(&options, dir.as_deref(), force)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
