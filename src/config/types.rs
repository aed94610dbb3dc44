//! Configuration data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::defaults::{
    default_commands, default_workspace_roots, DEFAULT_COMMAND, DEFAULT_MANAGER_WIDTH,
    DEFAULT_POLL_INTERVAL_MS,
};
use crate::domain::{Command, ToolMode};

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directories whose children are offered by the folder picker.
    pub workspace_roots: Vec<String>,
    /// Command preselected when adding a terminal.
    pub default_command: String,
    pub commands: BTreeMap<String, CommandConfig>,
    pub ui: UiConfig,
    pub shed: ShedConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_roots: default_workspace_roots(),
            default_command: DEFAULT_COMMAND.to_string(),
            commands: default_commands(),
            ui: UiConfig::default(),
            shed: ShedConfig::default(),
        }
    }
}

impl Config {
    /// The launchable command for `id`, if configured.
    pub fn command(&self, id: &str) -> Option<Command> {
        self.commands.get(id).map(|c| c.to_command(id))
    }

    /// Command ids in picker order.
    pub fn command_ids(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }
}

/// One entry under `[commands.<id>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandConfig {
    pub display_name: String,
    pub exec: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub status_detection: ToolMode,
}

impl CommandConfig {
    pub fn to_command(&self, id: &str) -> Command {
        let display_name = if self.display_name.is_empty() {
            id.to_string()
        } else {
            self.display_name.clone()
        };
        Command {
            id: id.to_string(),
            display_name,
            exec: self.exec.clone(),
            args: self.args.clone(),
            env: self.env.clone(),
            status_detection: self.status_detection,
        }
    }
}

/// `[ui]` preferences.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Width of the manager pane in columns.
    pub manager_width: u16,
    pub status_poll_interval_ms: u64,
    pub show_directory: bool,
    pub auto_expand_projects: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            manager_width: DEFAULT_MANAGER_WIDTH,
            status_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            show_directory: true,
            auto_expand_projects: true,
        }
    }
}

/// `[shed]` remote-container integration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShedConfig {
    pub enabled: bool,
    /// Server passed to `shed create` when none is chosen.
    pub default_server: String,
}

impl Default for ShedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_server: String::new(),
        }
    }
}
