//! Logging init.
//!
//! Everything down to `debug` for this crate goes to `cc4d.log` under the XDG
//! state dir. Warnings and errors (failed attempts, failed files) are echoed to
//! stderr as well so they show up next to the progress lines. `RUST_LOG`
//! overrides the file filter only.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const FILE_FILTER: &str = "info,cc4d=debug,cc4d_core=debug";

/// Minimum level echoed to stderr while logging to the file.
const CONSOLE_LEVEL: LevelFilter = LevelFilter::WARN;

fn file_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(FILE_FILTER))
}

/// Path of the log file: `~/.local/state/cc4d/cc4d.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cc4d")?;
    Ok(xdg_dirs.place_state_file("cc4d.log")?)
}

/// Opens `path` for appending, creating it and its directory as needed.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log dir {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Log to the state file plus warnings on stderr. Returns the log file path.
/// On failure (e.g. log dir unwritable) the caller falls back to `init_logging_stderr`.
pub fn init_logging() -> Result<PathBuf> {
    let path = log_file_path()?;
    let file = open_log_file(&path)?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(file_filter());
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(CONSOLE_LEVEL);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::info!("cc4d logging initialized at {}", path.display());
    Ok(path)
}

/// Everything to stderr with the file filter. Used when the state dir is unusable.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(file_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_file_filter_parses() {
        assert!(EnvFilter::try_new(FILE_FILTER).is_ok());
    }

    #[test]
    fn log_file_is_created_with_parents_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/cc4d/cc4d.log");
        open_log_file(&path)
            .unwrap()
            .write_all(b"first\n")
            .unwrap();
        open_log_file(&path)
            .unwrap()
            .write_all(b"second\n")
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn unusable_log_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("state");
        fs::write(&blocker, b"file").unwrap();
        let err = open_log_file(&blocker.join("cc4d.log")).unwrap_err();
        assert!(format!("{:#}", err).contains("log dir"));
    }
}
