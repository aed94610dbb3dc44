//! Tracing subscriber setup.
//!
//! The terminal belongs to the tree view, so log output never goes to
//! stdout or stderr. With `--debug` it is written to a file that is
//! truncated on every start; otherwise it is discarded.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter(debug: bool) -> EnvFilter {
    let fallback = if debug { "codely=debug,info" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber. Returns an error only when the debug log
/// file cannot be created.
pub fn init(debug: bool, log_file: &Path) -> io::Result<()> {
    if !debug {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter(false))
            .with_writer(io::sink)
            .try_init();
        return Ok(());
    }
    if let Some(parent) = log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(true))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    tracing::info!(path = %log_file.display(), "debug logging enabled");
    Ok(())
}
