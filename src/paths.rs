//! Filesystem locations and `~` expansion.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "codely";

/// Expand a leading `~` to the home directory. Other paths pass through.
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, dirs::home_dir())
}

fn expand_tilde_with(path: &str, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home;
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// `$XDG_CONFIG_HOME`, falling back to `~/.config`.
pub fn config_root_dir() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_STATE_HOME`, falling back to `~/.local/state`.
pub fn state_root_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state")
}

fn xdg_dir(var: &str, fallback: &str) -> Option<PathBuf> {
    if let Ok(path) = std::env::var(var) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir().map(|home| home.join(fallback))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join(APP_DIR).join("codely.toml"))
}

pub fn default_state_path() -> PathBuf {
    state_dir().join("session.json")
}

pub fn default_log_path() -> PathBuf {
    state_dir().join("debug.log")
}

fn state_dir() -> PathBuf {
    state_root_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Last path component, used as a project's display name.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
