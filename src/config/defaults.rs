//! Built-in configuration values.

use std::collections::BTreeMap;

use super::CommandConfig;
use crate::domain::ToolMode;

pub(super) const DEFAULT_COMMAND: &str = "claude";
pub(super) const DEFAULT_MANAGER_WIDTH: u16 = 38;
pub(super) const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Polling faster than this only burns tmux calls.
pub(super) const MIN_POLL_INTERVAL_MS: u64 = 100;

pub(super) fn default_workspace_roots() -> Vec<String> {
    ["~/work", "~/projects", "~/src"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn command(display_name: &str, exec: &str, args: &[&str]) -> CommandConfig {
    CommandConfig {
        display_name: display_name.to_string(),
        exec: exec.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        env: BTreeMap::new(),
        status_detection: ToolMode::Auto,
    }
}

/// Commands added when the file does not define them.
pub(super) fn default_commands() -> BTreeMap<String, CommandConfig> {
    let mut commands = BTreeMap::new();
    commands.insert(
        "claude".to_string(),
        command("Claude Code", "claude", &["--dangerously-skip-permissions"]),
    );
    commands.insert("opencode".to_string(), command("OpenCode", "opencode", &[]));
    commands.insert("codex".to_string(), command("Codex", "codex", &[]));
    commands.insert("lazygit".to_string(), command("Lazygit", "lazygit", &[]));
    commands.insert("bash".to_string(), command("Bash Shell", "bash", &[]));
    commands
}
