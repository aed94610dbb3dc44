//! Closed status and tool-mode enumerations.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Semantic state of a session's terminal, derived from captured pane text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Idle,
    Waiting,
    Thinking,
    Executing,
    Error,
    Exited,
    Stopped,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Idle => "idle",
            Self::Waiting => "waiting",
            Self::Thinking => "thinking",
            Self::Executing => "executing",
            Self::Error => "error",
            Self::Exited => "exited",
            Self::Stopped => "stopped",
        }
    }

    /// Glyph shown next to a session row.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Unknown => "❓",
            Self::Idle => "💤",
            Self::Waiting => "⏳",
            Self::Thinking => "🤔",
            Self::Executing => "⚡",
            Self::Error => "❌",
            Self::Exited => "⏹️",
            Self::Stopped => "⏸️",
        }
    }

    /// Whether the session wants the user to look at it.
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Waiting | Self::Error)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule set the classifier applies to a session's pane text.
///
/// Deserializes leniently: empty means `auto`, unknown names fall back to
/// `generic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Auto,
    Generic,
    Claude,
    #[serde(rename = "opencode")]
    OpenCode,
    Codex,
    Shell,
}

impl ToolMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Generic => "generic",
            Self::Claude => "claude",
            Self::OpenCode => "opencode",
            Self::Codex => "codex",
            Self::Shell => "shell",
        }
    }

    /// Resolve `Auto` against the command identity, then the executable
    /// basename. Explicit modes are returned unchanged.
    pub fn resolve(self, command_id: &str, exec: &str) -> ToolMode {
        if self != Self::Auto {
            return self;
        }
        let basename = exec.rsplit('/').next().unwrap_or(exec);
        known_tool(command_id)
            .or_else(|| known_tool(basename))
            .unwrap_or(Self::Generic)
    }
}

fn known_tool(value: &str) -> Option<ToolMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "claude" => Some(ToolMode::Claude),
        "opencode" => Some(ToolMode::OpenCode),
        "codex" => Some(ToolMode::Codex),
        "shell" => Some(ToolMode::Shell),
        _ => None,
    }
}

impl FromStr for ToolMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "generic" => Ok(Self::Generic),
            other => known_tool(other).ok_or_else(|| {
                format!("unknown status detection mode `{s}` (expected auto|generic|claude|opencode|codex|shell)")
            }),
        }
    }
}

impl<'de> Deserialize<'de> for ToolMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "using generic status detection");
            Self::Generic
        }))
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
