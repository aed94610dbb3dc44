//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`CODELY_POLL_INTERVAL_MS`,
//!    `CODELY_MANAGER_WIDTH`, `CODELY_DEFAULT_COMMAND`)
//! 2. TOML file specified via --config CLI flag
//! 3. $XDG_CONFIG_HOME/codely/codely.toml (or ~/.config/codely/codely.toml)
//! 4. Built-in defaults
//!
//! Commands missing from the file are filled in from the built-in set, so a
//! file that only adds `[commands.aider]` still offers `claude` and `bash`.

use crate::error::ConfigError;
use crate::paths;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

mod defaults;
mod env;
mod types;

use defaults::{default_commands, MIN_POLL_INTERVAL_MS};
use env::apply_env_overrides;
pub use types::{CommandConfig, Config, ShedConfig, UiConfig};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        paths::default_config_path,
    )
}

fn load_config_from_sources<FRead, FEnv, FPath>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    default_path: FPath,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FPath: Fn() -> Option<PathBuf>,
{
    let text = read_config_text(path_override, &read_file, &default_path)?;
    let mut config = parse_config(&text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    Ok(config)
}

fn read_config_text<FRead, FPath>(
    path_override: Option<&str>,
    read_file: &FRead,
    default_path: &FPath,
) -> Result<String, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FPath: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        let path = paths::expand_tilde(p);
        debug!(path = %path.display(), "loading config");
        return Ok(read_file(&path)?);
    }
    let Some(path) = default_path() else {
        return Ok(String::new());
    };
    match read_file(&path) {
        Ok(text) => {
            debug!(path = %path.display(), "loading config");
            Ok(text)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Parse TOML text and fill in built-in commands the file leaves out.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(text)?;
    for (id, command) in default_commands() {
        config.commands.entry(id).or_insert(command);
    }
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if !config.commands.contains_key(&config.default_command) {
        return Err(ConfigError::Invalid(format!(
            "default_command `{}` is not defined under [commands]",
            config.default_command
        )));
    }
    if let Some((id, _)) = config.commands.iter().find(|(_, c)| c.exec.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "command `{id}` has an empty exec"
        )));
    }
    if config.ui.manager_width == 0 {
        return Err(ConfigError::Invalid(
            "ui.manager_width must be positive".into(),
        ));
    }
    Ok(())
}

impl Config {
    /// Interval between status polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.ui.status_poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    /// Workspace roots with `~` expanded.
    pub fn expanded_workspace_roots(&self) -> Vec<PathBuf> {
        self.workspace_roots
            .iter()
            .map(|root| paths::expand_tilde(root))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
