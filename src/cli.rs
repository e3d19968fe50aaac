//! CLI parsing and orchestration. Parses args, runs the finder on one archive or
//! every e-book in the current directory, maps errors to the exit code.

use crate::book::EbookFormat;
use crate::booklist::DEFAULT_SUFFIX;
use crate::cleanup::{Disposer, SystemTrash, TrashDir};
use crate::finder::{FindSummary, Finder, FinderError};
use clap::{CommandFactory, Parser};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Exit status for every failure kind.
pub const EXIT_FAILURE: i32 = 1;

/// CLI error carrying the message; every variant exits with [`EXIT_FAILURE`].
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Finder(#[from] FinderError),

    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::Usage(_) | CliRunError::Finder(_) | CliRunError::CurrentDir(_) => {
                EXIT_FAILURE
            }
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bklst", version)]
#[command(about = "Collect 《》-bracketed book titles from EPUB/MOBI e-books into <name>.bklst")]
pub struct Args {
    /// E-book to scan (.epub or .mobi).
    #[arg(conflicts_with = "all")]
    pub archive: Option<PathBuf>,

    /// Scan every .epub and .mobi file in the current directory.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Suffix of the title-list file written next to the e-book name.
    #[arg(long, default_value = DEFAULT_SUFFIX, value_parser = parse_suffix)]
    pub suffix: String,

    /// Move working directories into this folder instead of the system trash.
    #[arg(long)]
    pub trash_dir: Option<PathBuf>,

    /// Suppress progress output (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Print verbose error chain and debug logs.
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_suffix(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("Invalid --suffix: must not be empty.".to_string());
    }
    if s.contains('/') || s.contains('\\') {
        return Err(format!(
            "Invalid --suffix: '{}' must not contain a path separator.",
            s
        ));
    }
    if EbookFormat::from_name(s).is_some() {
        return Err(format!(
            "Invalid --suffix: '{}' would name an e-book; the list could overwrite the input.",
            s
        ));
    }
    Ok(s.to_string())
}

fn usage() -> String {
    Args::command().render_usage().to_string()
}

/// Handle an argument parse failure: help and version exit 0, anything else
/// prints the error and usage to stdout and exits with [`EXIT_FAILURE`].
pub fn exit_with_usage(e: clap::Error) -> ! {
    use clap::error::ErrorKind;
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            println!("{}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Entry point for the CLI. Works relative to the current directory.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let cwd = std::env::current_dir().map_err(CliRunError::CurrentDir)?;
    run_in(args, &cwd)
}

/// Run with `base_dir` as the directory for working directories, list files and `-a` discovery.
pub fn run_in(args: &Args, base_dir: &Path) -> Result<(), CliRunError> {
    if args.archive.is_none() && !args.all {
        println!("{}", usage());
        return Err(CliRunError::Usage(
            "Expected an e-book path or -a.".to_string(),
        ));
    }

    let system_trash = SystemTrash;
    let trash_dir = args.trash_dir.as_ref().map(TrashDir::new);
    let disposer: &dyn Disposer = match &trash_dir {
        Some(dir) => dir,
        None => &system_trash,
    };

    let progress_state: RefCell<Option<indicatif::ProgressBar>> = RefCell::new(None);
    let progress_cb = |n: u32, total: u32| {
        let mut state = progress_state.borrow_mut();
        if n == 0 {
            if let Some(old) = state.take() {
                old.finish_and_clear();
            }
            if total == 0 {
                return;
            }
            let style = indicatif::ProgressStyle::default_bar()
                .template("{spinner} {msg} [{bar:40}] {pos}/{len} ({elapsed})")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .progress_chars("█▉▊▋▌▍▎▏ ");
            let bar = indicatif::ProgressBar::new(total as u64);
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(80));
            *state = Some(bar);
        }
        if let Some(pb) = state.as_ref() {
            pb.set_position(n as u64);
            pb.set_message(format!("Scanning document {}/{}", n, total));
        }
    };

    let clear_progress = || {
        if let Some(pb) = progress_state.borrow_mut().take() {
            pb.disable_steady_tick();
            pb.finish_and_clear();
        }
    };
    let finished_cb = |summary: &FindSummary| {
        clear_progress();
        eprintln!("{}", summary_line(summary));
    };

    let mut finder = Finder::new(base_dir, disposer).suffix(args.suffix.clone());
    if !args.quiet {
        finder = finder.progress(&progress_cb).on_finished(&finished_cb);
    }

    let result = match &args.archive {
        Some(archive) => finder.run(archive).map(|_| ()),
        None => finder.run_all(base_dir).map(|_| ()),
    };
    clear_progress();
    result.map_err(CliRunError::from)
}

fn summary_line(summary: &FindSummary) -> String {
    match summary.unique_titles {
        Some(n) => format!("Wrote {} ({} titles)", summary.list_path.display(), n),
        None => format!("No titles found in {}", summary.archive.display()),
    }
}
